use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use pubmed_core::{CreateJobRequest, Job};
use url::form_urlencoded;

use crate::config::ClientConfig;
use crate::error::{ApiError, ClientError, Result};
use crate::executor::{ApiExecutor, Blob};
use crate::transport::{ReqwestTransport, Transport};
use crate::validate::{ensure_id, ensure_query, segment};

/// Format of a metadata export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unsupported export format {other:?} (expected csv or json)")),
        }
    }
}

/// Job operations of the backend REST surface.
#[async_trait]
pub trait JobsService: Send + Sync {
    async fn create_job(&self, request: &CreateJobRequest) -> Result<Job>;
    async fn get_job(&self, job_id: &str) -> Result<Job>;
    async fn search_job(&self, job_id: &str) -> Result<Job>;
    async fn resolve_job(&self, job_id: &str) -> Result<Job>;
    async fn download_job(&self, job_id: &str) -> Result<Job>;
    async fn export_job(&self, job_id: &str, format: ExportFormat) -> Result<Blob>;
    /// ZIP archive of every downloaded PDF for the job.
    async fn export_job_zip(&self, job_id: &str) -> Result<Blob>;
}

#[derive(Clone)]
pub struct JobsApi {
    executor: ApiExecutor,
}

impl JobsApi {
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

    async fn transition(&self, job_id: &str, phase: &str) -> Result<Job> {
        ensure_id(job_id, "job_id")?;
        self.executor
            .post_json(&format!("/jobs/{}/{}", segment(job_id), phase), None)
            .await
    }
}

#[async_trait]
impl JobsService for JobsApi {
    async fn create_job(&self, request: &CreateJobRequest) -> Result<Job> {
        ensure_query(request)?;
        let body = serde_json::to_value(request)
            .map_err(|err| ClientError::validation("request", err.to_string()))?;
        self.executor.post_json("/jobs", Some(body)).await
    }

    async fn get_job(&self, job_id: &str) -> Result<Job> {
        ensure_id(job_id, "job_id")?;
        self.executor
            .get_json(&format!("/jobs/{}", segment(job_id)))
            .await
    }

    async fn search_job(&self, job_id: &str) -> Result<Job> {
        self.transition(job_id, "search").await
    }

    async fn resolve_job(&self, job_id: &str) -> Result<Job> {
        self.transition(job_id, "resolve").await
    }

    async fn download_job(&self, job_id: &str) -> Result<Job> {
        self.transition(job_id, "download").await
    }

    async fn export_job(&self, job_id: &str, format: ExportFormat) -> Result<Blob> {
        ensure_id(job_id, "job_id")?;
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("format", format.as_str())
            .finish();
        self.executor
            .get_blob(&format!("/jobs/{}/export?{}", segment(job_id), query))
            .await
    }

    async fn export_job_zip(&self, job_id: &str) -> Result<Blob> {
        ensure_id(job_id, "job_id")?;
        self.executor
            .get_blob(&format!("/jobs/{}/export-zip", segment(job_id)))
            .await
    }
}
