#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use pubmed_client::{Transport, TransportFailure, TransportRequest, TransportResponse};

pub const BASE_URL: &str = "http://backend.test/api";

/// Replays queued responses and records every request it receives.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<TransportResponse, TransportFailure>>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, response: TransportResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn fail(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(TransportFailure::new(message)));
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> TransportRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("at least one request")
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportFailure> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportFailure::new("no scripted response")))
    }
}

pub fn job_json(id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "created_at": "2024-05-01T09:30:00Z",
        "name": "AF",
        "query": "malnutrition AND afib",
        "max_results": 50,
        "pmc_only": false,
        "allow_external": true,
        "concurrency": 3,
        "status": status
    })
}

pub fn article_json(id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "job_id": "jobA",
        "pmid": "123",
        "title": "Title",
        "pubmed_url": "https://pubmed.ncbi.nlm.nih.gov/123/",
        "status": status,
        "retries": 1
    })
}
