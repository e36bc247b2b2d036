use std::sync::Arc;

use bytes::Bytes;
use client_logging::{client_debug, client_warn};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, ClientError, ErrorPayload, Result};
use crate::transport::{
    CacheMode, FormData, Transport, TransportBody, TransportRequest, TransportResponse,
};

pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized to a JSON string; `Content-Type` defaults to JSON.
    Json(Value),
    /// Passed through untouched.
    Form(FormData),
}

/// Per-call request options. An unset cache mode becomes [`CacheMode::NoStore`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
    pub cache: Option<CacheMode>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self {
            method: Method::POST,
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_cache(mut self, cache: CacheMode) -> Self {
        self.cache = Some(cache);
        self
    }
}

/// Raw response body for downloads and exports.
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

impl Blob {
    pub fn new(bytes: impl Into<Bytes>, content_type: Option<&str>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.map(str::to_string),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The single path every outgoing call takes: URL composition, default
/// headers, body encoding, status classification and response decoding.
///
/// One attempt per call; there is no retry or backoff here.
#[derive(Clone)]
pub struct ApiExecutor {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl ApiExecutor {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base_url` followed by `path` with exactly one leading slash.
    pub fn build_url(&self, path: &str) -> Result<String> {
        if path.is_empty() {
            return Err(ClientError::validation(
                "path",
                "Path is required for API requests.",
            ));
        }
        let path = path.trim_start_matches('/');
        Ok(format!("{}/{}", self.base_url, path))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request_json(path, RequestOptions::get()).await
    }

    pub async fn post_json<T: DeserializeOwned>(&self, path: &str, body: Option<Value>) -> Result<T> {
        let mut options = RequestOptions::post();
        options.body = body.map(RequestBody::Json);
        self.request_json(path, options).await
    }

    pub async fn get_blob(&self, path: &str) -> Result<Blob> {
        self.request_blob(path, RequestOptions::get()).await
    }

    pub async fn post_for_blob(&self, path: &str, body: Option<Value>) -> Result<Blob> {
        let mut options = RequestOptions::post();
        options.body = body.map(RequestBody::Json);
        self.request_blob(path, options).await
    }

    pub async fn request_json<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let response = self.execute(path, options, true).await?;
        serde_json::from_slice(&response.body).map_err(|err| {
            ClientError::Transport(ApiError::new(
                response.status,
                response.status_text.clone(),
                Some(ErrorPayload::text(format!("Invalid JSON response body: {err}"))),
            ))
        })
    }

    pub async fn request_blob(&self, path: &str, options: RequestOptions) -> Result<Blob> {
        let response = self.execute(path, options, false).await?;
        let content_type = response.content_type().map(str::to_string);
        Ok(Blob {
            bytes: response.body,
            content_type,
        })
    }

    async fn execute(
        &self,
        path: &str,
        options: RequestOptions,
        expect_json: bool,
    ) -> Result<TransportResponse> {
        let request = self.prepare(path, options, expect_json)?;
        client_debug!("{} {}", request.method, request.url);
        let method = request.method.clone();
        let url = request.url.clone();

        let response = self.transport.execute(request).await.map_err(|failure| {
            client_warn!("{} {} failed before a response: {}", method, url, failure);
            ClientError::Transport(ApiError::network(failure.message))
        })?;

        if !response.is_success() {
            let err = ApiError::new(
                response.status,
                response.status_text.clone(),
                ErrorPayload::from_body(&response.body),
            );
            client_warn!("{} {} -> {}: {}", method, url, err.status, err.message());
            return Err(err.into());
        }

        if expect_json {
            let content_type = response.content_type().unwrap_or("");
            if !content_type.to_ascii_lowercase().contains(JSON_CONTENT_TYPE) {
                client_warn!("{} {} returned non-JSON content-type {:?}", method, url, content_type);
                return Err(ApiError::new(
                    response.status,
                    response.status_text.clone(),
                    Some(ErrorPayload::text(format!(
                        "Expected JSON response but received content-type: {content_type}"
                    ))),
                )
                .into());
            }
        }

        Ok(response)
    }

    fn prepare(
        &self,
        path: &str,
        options: RequestOptions,
        expect_json: bool,
    ) -> Result<TransportRequest> {
        let url = self.build_url(path)?;
        let RequestOptions {
            method,
            mut headers,
            body,
            cache,
        } = options;

        if expect_json && !headers.contains_key(ACCEPT) {
            headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }

        let body = match body {
            Some(RequestBody::Json(value)) => {
                if !headers.contains_key(CONTENT_TYPE) {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
                }
                Some(TransportBody::Bytes(Bytes::from(value.to_string())))
            }
            Some(RequestBody::Form(form)) => Some(TransportBody::Multipart(form)),
            None => None,
        };

        Ok(TransportRequest {
            method,
            url,
            headers,
            body,
            cache: cache.unwrap_or(CacheMode::NoStore),
        })
    }
}
