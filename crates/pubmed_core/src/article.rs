use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseStatusError;

/// Resolution/download lifecycle of a single article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    PendingUrls,
    Resolved,
    Downloading,
    Downloaded,
    FailedSearch,
    FailedPaywall,
    SkippedNoPmc,
    SkippedRobots,
}

impl ArticleStatus {
    pub const ALL: [ArticleStatus; 8] = [
        ArticleStatus::PendingUrls,
        ArticleStatus::Resolved,
        ArticleStatus::Downloading,
        ArticleStatus::Downloaded,
        ArticleStatus::FailedSearch,
        ArticleStatus::FailedPaywall,
        ArticleStatus::SkippedNoPmc,
        ArticleStatus::SkippedRobots,
    ];

    pub fn is_failure(self) -> bool {
        matches!(self, ArticleStatus::FailedSearch | ArticleStatus::FailedPaywall)
    }

    pub fn is_skipped(self) -> bool {
        matches!(self, ArticleStatus::SkippedNoPmc | ArticleStatus::SkippedRobots)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArticleStatus::PendingUrls => "pending_urls",
            ArticleStatus::Resolved => "resolved",
            ArticleStatus::Downloading => "downloading",
            ArticleStatus::Downloaded => "downloaded",
            ArticleStatus::FailedSearch => "failed_search",
            ArticleStatus::FailedPaywall => "failed_paywall",
            ArticleStatus::SkippedNoPmc => "skipped_no_pmc",
            ArticleStatus::SkippedRobots => "skipped_robots",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ArticleStatus::PendingUrls => "Pending URLs",
            ArticleStatus::Resolved => "Resolved",
            ArticleStatus::Downloading => "Downloading",
            ArticleStatus::Downloaded => "Downloaded",
            ArticleStatus::FailedSearch => "Search Failed",
            ArticleStatus::FailedPaywall => "Paywall Blocked",
            ArticleStatus::SkippedNoPmc => "Skipped (No PMC)",
            ArticleStatus::SkippedRobots => "Skipped (Robots)",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArticleStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError {
                value: s.to_string(),
            })
    }
}

/// A candidate publication discovered for a job.
///
/// `chosen_pdf_url` is expected once the article is `resolved` or later, but
/// that is up to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub job_id: String,
    pub pmid: String,
    pub title: String,
    pub pubmed_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmc_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chosen_pdf_url: Option<String>,
    pub status: ArticleStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub retries: u32,
}
