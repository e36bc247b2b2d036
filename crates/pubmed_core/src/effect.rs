use std::time::Duration;

use crate::Generation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchJob { job_id: String, generation: Generation },
    FetchArticles { job_id: String, generation: Generation },
    StartPolling { interval: Duration },
    StopPolling,
}
