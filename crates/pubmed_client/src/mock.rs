//! In-memory stand-in for the backend, for development without a server.
//!
//! A [`MockBackend`] owns exactly one [`MockStore`]: a single current job plus
//! lazily synthesized article lists keyed by job id. Separate backends never
//! share state. Every value handed out is a copy.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use client_logging::client_info;
use pubmed_core::{Article, ArticleStatus, CreateJobRequest, Job, JobStatus};

use crate::articles::ArticlesService;
use crate::error::{ApiError, ClientError, ErrorPayload, Result};
use crate::executor::{Blob, JSON_CONTENT_TYPE};
use crate::jobs::{ExportFormat, JobsService};
use crate::mock_data;
use crate::validate::{ensure_id, ensure_query};

/// Artificial latency applied to every mock response by default.
pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_millis(200);

const ZIP_CONTENT_TYPE: &str = "application/zip";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockStore {
    current_job: Job,
    articles: BTreeMap<String, Vec<Article>>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::with_job(mock_data::seed_job())
    }
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_job(job: Job) -> Self {
        Self {
            current_job: job,
            articles: BTreeMap::new(),
        }
    }

    /// Pre-populates the article list for `job_id` instead of the synthetic set.
    pub fn with_articles(mut self, job_id: impl Into<String>, articles: Vec<Article>) -> Self {
        self.articles.insert(job_id.into(), articles);
        self
    }

    pub fn current_job(&self) -> &Job {
        &self.current_job
    }

    /// Article lists synthesized so far.
    pub fn article_lists(&self) -> &BTreeMap<String, Vec<Article>> {
        &self.articles
    }

    fn replace_job(&mut self, request: &CreateJobRequest) -> Job {
        let seed = mock_data::seed_job();
        let now = Utc::now();
        self.current_job = Job {
            id: format!("job_{}", now.timestamp_millis()),
            created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            name: request.name.clone(),
            query: request.query.clone(),
            max_results: request.max_results.unwrap_or(seed.max_results),
            date_from: request.date_from.clone().or(seed.date_from),
            date_to: request.date_to.clone().or(seed.date_to),
            pmc_only: request.pmc_only.unwrap_or(seed.pmc_only),
            allow_external: request.allow_external.unwrap_or(seed.allow_external),
            concurrency: request.concurrency.unwrap_or(seed.concurrency),
            status: JobStatus::Queued,
            error_msg: None,
        };
        self.current_job.clone()
    }

    fn set_status(&mut self, status: JobStatus) -> Job {
        client_info!(
            "Mock job {} {} -> {}",
            self.current_job.id,
            self.current_job.status,
            status
        );
        self.current_job.status = status;
        self.current_job.clone()
    }

    /// Generated on first access for a job id, then reused.
    fn articles_for(&mut self, job_id: &str) -> &mut Vec<Article> {
        self.articles
            .entry(job_id.to_string())
            .or_insert_with(|| mock_data::articles_for_job(job_id))
    }

    fn find_article(&mut self, article_id: &str) -> Result<&mut Article> {
        self.articles
            .values_mut()
            .flat_map(|articles| articles.iter_mut())
            .find(|article| article.id == article_id)
            .ok_or_else(|| ClientError::NotFound {
                entity: "Article",
                id: article_id.to_string(),
            })
    }
}

pub struct MockBackend {
    store: Mutex<MockStore>,
    delay: Duration,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new(MockStore::default(), DEFAULT_MOCK_DELAY)
    }
}

impl MockBackend {
    pub fn new(store: MockStore, delay: Duration) -> Self {
        Self {
            store: Mutex::new(store),
            delay,
        }
    }

    /// Seeded backend that answers immediately.
    pub fn without_delay() -> Self {
        Self::new(MockStore::default(), Duration::ZERO)
    }

    /// Copy of the current internal state.
    pub fn snapshot(&self) -> MockStore {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockStore> {
        // A panic while holding the lock leaves plain data behind; keep serving it.
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn settle<T>(&self, value: T) -> T {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        value
    }

    async fn transition(&self, job_id: &str, status: JobStatus) -> Result<Job> {
        ensure_id(job_id, "job_id")?;
        let job = self.lock().set_status(status);
        Ok(self.settle(job).await)
    }
}

#[async_trait]
impl JobsService for MockBackend {
    async fn create_job(&self, request: &CreateJobRequest) -> Result<Job> {
        ensure_query(request)?;
        let job = self.lock().replace_job(request);
        client_info!("Mock job {} created (queued)", job.id);
        Ok(self.settle(job).await)
    }

    /// There is only one job; the id is checked but not matched.
    async fn get_job(&self, job_id: &str) -> Result<Job> {
        ensure_id(job_id, "job_id")?;
        let job = self.lock().current_job.clone();
        Ok(self.settle(job).await)
    }

    async fn search_job(&self, job_id: &str) -> Result<Job> {
        self.transition(job_id, JobStatus::Searching).await
    }

    async fn resolve_job(&self, job_id: &str) -> Result<Job> {
        self.transition(job_id, JobStatus::Resolving).await
    }

    async fn download_job(&self, job_id: &str) -> Result<Job> {
        self.transition(job_id, JobStatus::Downloading).await
    }

    /// Always the seed article set as pretty JSON, whatever the format.
    async fn export_job(&self, job_id: &str, _format: ExportFormat) -> Result<Blob> {
        ensure_id(job_id, "job_id")?;
        let body = serde_json::to_vec_pretty(&mock_data::seed_articles()).map_err(|err| {
            ApiError::new(
                500,
                "Internal Server Error",
                Some(ErrorPayload::text(err.to_string())),
            )
        })?;
        Ok(self.settle(Blob::new(body, Some(JSON_CONTENT_TYPE))).await)
    }

    async fn export_job_zip(&self, job_id: &str) -> Result<Blob> {
        ensure_id(job_id, "job_id")?;
        Ok(self
            .settle(Blob::new(Vec::new(), Some(ZIP_CONTENT_TYPE)))
            .await)
    }
}

#[async_trait]
impl ArticlesService for MockBackend {
    async fn get_job_articles(&self, job_id: &str) -> Result<Vec<Article>> {
        ensure_id(job_id, "job_id")?;
        let articles = self.lock().articles_for(job_id).clone();
        Ok(self.settle(articles).await)
    }

    async fn retry_article(&self, article_id: &str) -> Result<Article> {
        ensure_id(article_id, "article_id")?;
        let article = {
            let mut store = self.lock();
            let article = store.find_article(article_id)?;
            article.status = ArticleStatus::Downloading;
            article.retries += 1;
            article.failure_reason = None;
            article.clone()
        };
        client_info!("Mock article {} retried ({} retries)", article.id, article.retries);
        Ok(self.settle(article).await)
    }

    async fn crawl_article(&self, article_id: &str) -> Result<Article> {
        ensure_id(article_id, "article_id")?;
        let article = {
            let mut store = self.lock();
            let article = store.find_article(article_id)?;
            article.status = ArticleStatus::Resolved;
            if article.chosen_pdf_url.as_deref().map_or(true, str::is_empty) {
                article.chosen_pdf_url = Some(pdf_url_for(&article.pubmed_url));
            }
            article.failure_reason = None;
            article.clone()
        };
        Ok(self.settle(article).await)
    }
}

/// `https://pubmed.ncbi.nlm.nih.gov/123/` -> `https://pubmed.ncbi.nlm.nih.gov/123.pdf`
fn pdf_url_for(pubmed_url: &str) -> String {
    let base = pubmed_url.strip_suffix('/').unwrap_or(pubmed_url);
    format!("{base}.pdf")
}
