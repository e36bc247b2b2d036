use std::sync::Arc;

use async_trait::async_trait;
use client_logging::{client_info, client_warn};
use pubmed_core::Article;

use crate::config::ClientConfig;
use crate::error::{ApiError, ClientError, Result};
use crate::executor::ApiExecutor;
use crate::transport::{ReqwestTransport, Transport};
use crate::validate::{ensure_id, segment};

/// Article-level operations of the backend REST surface.
#[async_trait]
pub trait ArticlesService: Send + Sync {
    /// Every article currently known for the job.
    async fn get_job_articles(&self, job_id: &str) -> Result<Vec<Article>>;
    async fn retry_article(&self, article_id: &str) -> Result<Article>;
    /// Manually trigger the crawl flow for one article.
    async fn crawl_article(&self, article_id: &str) -> Result<Article>;
}

#[derive(Clone)]
pub struct ArticlesApi {
    executor: ApiExecutor,
}

impl ArticlesApi {
    pub fn new(executor: ApiExecutor) -> Self {
        Self { executor }
    }

    pub fn with_transport(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self::new(ApiExecutor::new(base_url, transport))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.transport)
            .map_err(|failure| ClientError::Transport(ApiError::network(failure.message)))?;
        Ok(Self::with_transport(config.base_url.clone(), Arc::new(transport)))
    }
}

#[async_trait]
impl ArticlesService for ArticlesApi {
    async fn get_job_articles(&self, job_id: &str) -> Result<Vec<Article>> {
        ensure_id(job_id, "job_id")?;
        self.executor
            .get_json(&format!("/jobs/{}/results", segment(job_id)))
            .await
    }

    async fn retry_article(&self, article_id: &str) -> Result<Article> {
        ensure_id(article_id, "article_id")?;
        self.executor
            .post_json(&format!("/articles/{}/retry", segment(article_id)), None)
            .await
    }

    async fn crawl_article(&self, article_id: &str) -> Result<Article> {
        ensure_id(article_id, "article_id")?;
        self.executor
            .post_json(&format!("/articles/{}/crawl", segment(article_id)), None)
            .await
    }
}

/// Outcome of [`retry_failed`]: the articles the backend accepted for retry
/// and, for each one it refused, the article id with the error.
#[derive(Debug, Default)]
pub struct RetryReport {
    pub retried: Vec<Article>,
    pub failed: Vec<(String, ClientError)>,
}

impl RetryReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.retried.len() + self.failed.len()
    }
}

/// Retries every failed article of a job, one at a time. A refused retry is
/// recorded in the report and does not stop the rest; only a failure to list
/// the job's articles is returned as an error.
pub async fn retry_failed(service: &dyn ArticlesService, job_id: &str) -> Result<RetryReport> {
    let articles = service.get_job_articles(job_id).await?;
    let mut report = RetryReport::default();
    for article in articles.iter().filter(|article| article.status.is_failure()) {
        client_info!("Retrying article {} ({})", article.id, article.status);
        match service.retry_article(&article.id).await {
            Ok(updated) => report.retried.push(updated),
            Err(err) => {
                client_warn!("Retry of article {} failed: {}", article.id, err);
                report.failed.push((article.id.clone(), err));
            }
        }
    }
    Ok(report)
}
