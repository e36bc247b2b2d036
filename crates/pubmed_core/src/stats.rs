use crate::{Article, ArticleStatus, JobStatus};

/// Per-bucket article counts shown next to a job's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArticleStats {
    pub total: usize,
    pub pending: usize,
    pub resolved: usize,
    pub downloading: usize,
    pub downloaded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl ArticleStats {
    pub fn from_articles(articles: &[Article]) -> Self {
        let mut stats = Self {
            total: articles.len(),
            ..Self::default()
        };
        for article in articles {
            match article.status {
                ArticleStatus::PendingUrls => stats.pending += 1,
                ArticleStatus::Resolved => stats.resolved += 1,
                ArticleStatus::Downloading => stats.downloading += 1,
                ArticleStatus::Downloaded => stats.downloaded += 1,
                ArticleStatus::FailedSearch | ArticleStatus::FailedPaywall => stats.failed += 1,
                ArticleStatus::SkippedNoPmc | ArticleStatus::SkippedRobots => stats.skipped += 1,
            }
        }
        stats
    }

    pub fn has_errors(&self) -> bool {
        self.failed > 0
    }
}

/// Position of a job on the queued..completed track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageProgress {
    pub stage_index: usize,
    pub stage_count: usize,
    pub percent: f64,
}

const STAGE_TRACK: [JobStatus; 5] = [
    JobStatus::Queued,
    JobStatus::Searching,
    JobStatus::Resolving,
    JobStatus::Downloading,
    JobStatus::Completed,
];

impl StageProgress {
    /// `failed` is off the track and reports stage 0.
    pub fn for_status(status: JobStatus) -> Self {
        let stage_index = STAGE_TRACK
            .iter()
            .position(|stage| *stage == status)
            .unwrap_or(0);
        let last = STAGE_TRACK.len() - 1;
        Self {
            stage_index,
            stage_count: STAGE_TRACK.len(),
            percent: stage_index as f64 / last as f64 * 100.0,
        }
    }

    pub fn stages() -> &'static [JobStatus] {
        &STAGE_TRACK
    }
}

/// Status and free-text filter over an article list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArticleFilter {
    pub status: Option<ArticleStatus>,
    pub search: Option<String>,
}

impl ArticleFilter {
    pub fn matches(&self, article: &Article) -> bool {
        if let Some(status) = self.status {
            if article.status != status {
                return false;
            }
        }

        let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return true;
        };
        let term = term.to_lowercase();
        article.title.to_lowercase().contains(&term)
            || article.pmid.to_lowercase().contains(&term)
            || article
                .pmc_id
                .as_deref()
                .is_some_and(|pmc| pmc.to_lowercase().contains(&term))
    }

    pub fn apply<'a>(&self, articles: &'a [Article]) -> Vec<&'a Article> {
        articles.iter().filter(|article| self.matches(article)).collect()
    }
}
