use std::time::Duration;

use crate::stats::{ArticleStats, StageProgress};
use crate::view_model::JobWatchView;
use crate::{Article, Generation, Job};

/// Fixed delay between polls of a non-terminal job.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// State of one job-detail watch.
///
/// Every fetch carries a generation. A result is applied only if its
/// generation is newer than the last one applied for the same resource, so a
/// slow response from an earlier poll can never overwrite fresher data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WatchState {
    job_id: Option<String>,
    job: Option<Job>,
    articles: Vec<Article>,
    polling: bool,
    closed: bool,
    issued_generation: Generation,
    job_generation: Generation,
    articles_generation: Generation,
    job_error: Option<String>,
    articles_error: Option<String>,
    discarded: usize,
    dirty: bool,
}

impl WatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> JobWatchView {
        JobWatchView {
            job_id: self.job_id.clone(),
            job: self.job.clone(),
            articles: self.articles.clone(),
            stats: ArticleStats::from_articles(&self.articles),
            progress: self.job.as_ref().map(|job| StageProgress::for_status(job.status)),
            polling: self.polling,
            closed: self.closed,
            last_error: self.last_error().map(str::to_string),
            discarded_responses: self.discarded,
            dirty: self.dirty,
        }
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    pub fn job(&self) -> Option<&Job> {
        self.job.as_ref()
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn is_polling(&self) -> bool {
        self.polling
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The most recent unresolved failure, job first. Each resource's error
    /// is cleared only by a later success of that same resource.
    pub fn last_error(&self) -> Option<&str> {
        self.job_error.as_deref().or(self.articles_error.as_deref())
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Resets to a fresh watch of `job_id` and returns the generation for the
    /// initial load. Everything issued before this call becomes stale.
    pub(crate) fn open(&mut self, job_id: String) -> Generation {
        let floor = self.issued_generation;
        *self = Self {
            job_id: Some(job_id),
            issued_generation: floor,
            job_generation: floor,
            articles_generation: floor,
            dirty: true,
            ..Self::default()
        };
        self.issue_generation()
    }

    pub(crate) fn issue_generation(&mut self) -> Generation {
        self.issued_generation += 1;
        self.issued_generation
    }

    pub(crate) fn accept_job_generation(&mut self, generation: Generation) -> bool {
        accept(&mut self.job_generation, generation)
    }

    pub(crate) fn accept_articles_generation(&mut self, generation: Generation) -> bool {
        accept(&mut self.articles_generation, generation)
    }

    pub(crate) fn set_job(&mut self, job: Job) {
        self.job = Some(job);
        self.job_error = None;
        self.dirty = true;
    }

    pub(crate) fn set_articles(&mut self, articles: Vec<Article>) {
        self.articles = articles;
        self.articles_error = None;
        self.dirty = true;
    }

    pub(crate) fn set_job_error(&mut self, message: String) {
        self.job_error = Some(message);
        self.dirty = true;
    }

    pub(crate) fn set_articles_error(&mut self, message: String) {
        self.articles_error = Some(message);
        self.dirty = true;
    }

    pub(crate) fn set_polling(&mut self, polling: bool) {
        if self.polling != polling {
            self.polling = polling;
            self.dirty = true;
        }
    }

    pub(crate) fn close(&mut self) {
        self.closed = true;
        self.polling = false;
        self.dirty = true;
    }

    pub(crate) fn note_discarded(&mut self) {
        self.discarded += 1;
    }
}

fn accept(applied: &mut Generation, generation: Generation) -> bool {
    if generation <= *applied {
        return false;
    }
    *applied = generation;
    true
}
