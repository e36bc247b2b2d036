//! Plain-text rendering of jobs, articles and watch progress.

use std::fmt::Write as _;
use std::path::Path;

use pubmed_core::{
    format_date, format_file_size, truncate_text, Article, ArticleStats, Job, JobStatus,
    JobWatchView, StageProgress,
};

pub fn job_summary(job: &Job) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Job {} - {}", job.id, job.name);
    let _ = writeln!(out, "  Status:      {}", status_with_progress(job));
    let _ = writeln!(out, "  Created:     {}", format_date(&job.created_at));
    let _ = writeln!(out, "  Query:       {}", job.query);
    let _ = writeln!(
        out,
        "  Limits:      {} results, concurrency {}",
        job.max_results, job.concurrency
    );
    if job.date_from.is_some() || job.date_to.is_some() {
        let _ = writeln!(
            out,
            "  Dates:       {} .. {}",
            job.date_from.as_deref().unwrap_or("any"),
            job.date_to.as_deref().unwrap_or("any")
        );
    }
    let _ = writeln!(
        out,
        "  Sources:     {}",
        match (job.pmc_only, job.allow_external) {
            (true, _) => "PMC only",
            (false, true) => "PMC and external",
            (false, false) => "PMC and PubMed links",
        }
    );
    if let Some(error) = &job.error_msg {
        let _ = writeln!(out, "  Error:       {error}");
    }
    out.trim_end().to_string()
}

fn status_with_progress(job: &Job) -> String {
    if job.status == JobStatus::Failed {
        return job.status.label().to_string();
    }
    let progress = StageProgress::for_status(job.status);
    format!(
        "{} (stage {}/{}, {:.0}%)",
        job.status.label(),
        progress.stage_index + 1,
        progress.stage_count,
        progress.percent
    )
}

pub fn article_table(articles: &[&Article], title_width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16} {:<10} {:<15} {:>7}  TITLE",
        "ID", "PMID", "STATUS", "RETRIES"
    );
    for article in articles {
        let _ = writeln!(
            out,
            "{:<16} {:<10} {:<15} {:>7}  {}",
            article.id,
            article.pmid,
            article.status.label(),
            article.retries,
            truncate_text(&article.title, title_width)
        );
        if let Some(reason) = &article.failure_reason {
            let _ = writeln!(out, "{:<51}  ! {}", "", reason);
        }
    }
    out.trim_end().to_string()
}

pub fn stats_line(stats: &ArticleStats) -> String {
    format!(
        "{} articles: {} downloaded, {} downloading, {} resolved, {} pending, {} failed, {} skipped",
        stats.total,
        stats.downloaded,
        stats.downloading,
        stats.resolved,
        stats.pending,
        stats.failed,
        stats.skipped
    )
}

pub fn watch_line(view: &JobWatchView) -> String {
    let Some(job) = &view.job else {
        return match &view.last_error {
            Some(error) => format!("Waiting for job: {error}"),
            None => "Waiting for job...".to_string(),
        };
    };
    let mut line = format!("[{}] {}", status_with_progress(job), stats_line(&view.stats));
    if let Some(error) = &view.last_error {
        let _ = write!(line, " (last poll failed: {error})");
    }
    line
}

pub fn saved(path: &Path, bytes: usize) -> String {
    format!("Saved {} ({})", path.display(), format_file_size(bytes as u64))
}
