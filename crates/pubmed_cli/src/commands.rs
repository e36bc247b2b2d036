use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use client_logging::{client_info, client_warn};
use pubmed_client::{
    retry_failed, AtomicFileWriter, ExportFormat, ExportKind, JobWatcher, JobsService, WatchSink,
};
use pubmed_core::validation::{validate_job_config, validate_pubmed_query};
use pubmed_core::{Article, ArticleFilter, ArticleStats, Job, JobWatchView};
use tokio_util::sync::CancellationToken;

use crate::backend::Backend;
use crate::cli::{Command, CreateArgs, ResultsArgs};
use crate::render;

#[derive(Debug, Clone, Copy)]
enum Phase {
    Search,
    Resolve,
    Download,
}

impl Phase {
    const ALL: [Phase; 3] = [Phase::Search, Phase::Resolve, Phase::Download];

    fn name(self) -> &'static str {
        match self {
            Phase::Search => "search",
            Phase::Resolve => "resolve",
            Phase::Download => "download",
        }
    }

    async fn start(self, jobs: &dyn JobsService, job_id: &str) -> pubmed_client::Result<Job> {
        match self {
            Phase::Search => jobs.search_job(job_id).await,
            Phase::Resolve => jobs.resolve_job(job_id).await,
            Phase::Download => jobs.download_job(job_id).await,
        }
    }
}

pub async fn run(
    command: Command,
    backend: &Backend,
    out: &mut (dyn Write + Send),
) -> Result<()> {
    match command {
        Command::Create(args) => create(backend, &args, out).await,
        Command::Show { job_id } => {
            let job = backend.jobs.get_job(&job_id).await?;
            writeln!(out, "{}", render::job_summary(&job))?;
            Ok(())
        }
        Command::Search { job_id } => start_phase(backend, &job_id, Phase::Search, out).await,
        Command::Resolve { job_id } => start_phase(backend, &job_id, Phase::Resolve, out).await,
        Command::Download { job_id } => start_phase(backend, &job_id, Phase::Download, out).await,
        Command::Results(args) => results(backend, &args, out).await,
        Command::Export {
            job_id,
            format,
            dir,
        } => export(backend, &job_id, format, &dir, out).await,
        Command::ExportZip { job_id, dir } => {
            let blob = backend.jobs.export_job_zip(&job_id).await?;
            let writer = AtomicFileWriter::new(dir);
            let path = writer.save_export(&job_id, ExportKind::PdfArchive, &blob)?;
            writeln!(out, "{}", render::saved(&path, blob.len()))?;
            Ok(())
        }
        Command::Retry { article_id } => {
            let article = backend.articles.retry_article(&article_id).await?;
            print_article(&article, "Retried", out)
        }
        Command::Crawl { article_id } => {
            let article = backend.articles.crawl_article(&article_id).await?;
            print_article(&article, "Crawled", out)
        }
        Command::RetryFailed { job_id } => {
            let report = retry_failed(backend.articles.as_ref(), &job_id).await?;
            if report.attempted() == 0 {
                writeln!(out, "No failed articles in job {job_id}.")?;
            }
            for article in &report.retried {
                print_article(article, "Retried", out)?;
            }
            for (article_id, err) in &report.failed {
                writeln!(out, "Could not retry {article_id}: {err}")?;
            }
            if !report.is_complete() {
                bail!(
                    "{} of {} retries failed",
                    report.failed.len(),
                    report.attempted()
                );
            }
            Ok(())
        }
        Command::Watch {
            job_id,
            interval_ms,
        } => {
            let cancel = CancellationToken::new();
            let trigger = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    trigger.cancel();
                }
            });
            watch(
                backend,
                &job_id,
                interval_ms.map(Duration::from_millis),
                cancel,
                out,
            )
            .await
        }
    }
}

async fn create(backend: &Backend, args: &CreateArgs, out: &mut dyn Write) -> Result<()> {
    let request = args.to_request();
    validate_pubmed_query(&request.query).map_err(|reason| anyhow!(reason))?;
    if let Err(errors) = validate_job_config(&request) {
        bail!("invalid job options: {}", errors.join("; "));
    }

    let mut job = backend.jobs.create_job(&request).await?;
    writeln!(out, "Created job {} ({})", job.id, job.status.label())?;

    if args.run {
        for phase in Phase::ALL {
            job = phase.start(backend.jobs.as_ref(), &job.id).await?;
            writeln!(out, "Started {}: {}", phase.name(), job.status.label())?;
        }
    }
    writeln!(out, "{}", render::job_summary(&job))?;
    Ok(())
}

async fn start_phase(
    backend: &Backend,
    job_id: &str,
    phase: Phase,
    out: &mut dyn Write,
) -> Result<()> {
    let job = phase.start(backend.jobs.as_ref(), job_id).await?;
    client_info!("Started {} for job {}", phase.name(), job.id);
    writeln!(out, "Job {} is now {}", job.id, job.status.label())?;
    Ok(())
}

async fn results(backend: &Backend, args: &ResultsArgs, out: &mut dyn Write) -> Result<()> {
    let articles = backend.articles.get_job_articles(&args.job_id).await?;
    let filter = ArticleFilter {
        status: args.status,
        search: args.search.clone(),
    };
    let shown = filter.apply(&articles);

    writeln!(out, "{}", render::article_table(&shown, args.title_width))?;
    writeln!(out)?;
    if shown.len() != articles.len() {
        writeln!(out, "Showing {} of {} articles.", shown.len(), articles.len())?;
    }
    let stats = ArticleStats::from_articles(&articles);
    writeln!(out, "{}", render::stats_line(&stats))?;
    if stats.has_errors() {
        writeln!(
            out,
            "Run `pubmed retry-failed {}` to retry failed articles.",
            args.job_id
        )?;
    }
    Ok(())
}

async fn export(
    backend: &Backend,
    job_id: &str,
    format: ExportFormat,
    dir: &Path,
    out: &mut dyn Write,
) -> Result<()> {
    let blob = backend.jobs.export_job(job_id, format).await?;
    if let Some(content_type) = blob.content_type.as_deref() {
        if !content_type.contains(format.as_str()) {
            client_warn!(
                "Export of job {} as {} came back as {}",
                job_id,
                format,
                content_type
            );
        }
    }
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    let path = writer.save_export(job_id, ExportKind::Metadata(format), &blob)?;
    writeln!(out, "{}", render::saved(&path, blob.len()))?;
    Ok(())
}

fn print_article(article: &Article, action: &str, out: &mut dyn Write) -> Result<()> {
    writeln!(
        out,
        "{} {} ({}): {}, {} retries",
        action,
        article.id,
        article.pmid,
        article.status.label(),
        article.retries
    )?;
    if let Some(url) = &article.chosen_pdf_url {
        writeln!(out, "  PDF: {url}")?;
    }
    Ok(())
}

/// Writes each fresh view as one status line.
struct LineSink<'a> {
    out: Mutex<&'a mut (dyn Write + Send)>,
}

impl<'a> LineSink<'a> {
    fn new(out: &'a mut (dyn Write + Send)) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    fn into_inner(self) -> &'a mut (dyn Write + Send) {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WatchSink for LineSink<'_> {
    fn emit(&self, view: JobWatchView) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = writeln!(out, "{}", render::watch_line(&view)) {
            client_warn!("Could not write watch progress: {}", err);
        }
    }
}

async fn watch(
    backend: &Backend,
    job_id: &str,
    interval: Option<Duration>,
    cancel: CancellationToken,
    out: &mut (dyn Write + Send),
) -> Result<()> {
    if job_id.trim().is_empty() {
        bail!("job_id must be a non-empty string.");
    }
    let mut watcher = JobWatcher::new(Arc::clone(&backend.jobs), Arc::clone(&backend.articles));
    if let Some(interval) = interval {
        watcher = watcher.with_poll_interval(interval);
    }

    let sink = LineSink::new(out);
    let view = watcher.watch(job_id, &sink, cancel).await;
    let out = sink.into_inner();
    let Some(job) = &view.job else {
        bail!(
            "job {job_id} could not be loaded: {}",
            view.last_error.as_deref().unwrap_or("no response")
        );
    };

    writeln!(out, "{}", render::job_summary(job))?;
    writeln!(out, "{}", render::stats_line(&view.stats))?;
    if view.closed {
        writeln!(out, "Watch stopped before the job finished.")?;
    }
    Ok(())
}
