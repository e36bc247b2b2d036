//! Advisory validation for job-creation input.
//!
//! These checks mirror what the job form enforces before submission. The
//! client layer itself only insists on a non-empty query.

use chrono::NaiveDate;

use crate::CreateJobRequest;

pub const MAX_RESULTS_MIN: u32 = 1;
pub const MAX_RESULTS_MAX: u32 = 1000;
pub const CONCURRENCY_MIN: u32 = 1;
pub const CONCURRENCY_MAX: u32 = 10;
pub const QUERY_MAX_LENGTH: usize = 2000;

pub const DEFAULT_MAX_RESULTS: u32 = 100;
pub const DEFAULT_CONCURRENCY: u32 = 3;
pub const DEFAULT_PMC_ONLY: bool = false;
pub const DEFAULT_ALLOW_EXTERNAL: bool = true;

const FORBIDDEN_QUERY_CHARS: &[char] = &['<', '>', '{', '}', '[', ']', '\\'];

/// Checks a PubMed query string. Returns the first problem found.
pub fn validate_pubmed_query(query: &str) -> Result<(), String> {
    if query.trim().is_empty() {
        return Err("Query cannot be empty".to_string());
    }
    if query.chars().count() > QUERY_MAX_LENGTH {
        return Err(format!(
            "Query is too long (max {QUERY_MAX_LENGTH} characters)"
        ));
    }
    if query.contains(FORBIDDEN_QUERY_CHARS) {
        return Err("Query contains invalid characters".to_string());
    }
    Ok(())
}

/// Checks the numeric and date options of a job request, collecting every error.
pub fn validate_job_config(request: &CreateJobRequest) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(max_results) = request.max_results {
        if !(MAX_RESULTS_MIN..=MAX_RESULTS_MAX).contains(&max_results) {
            errors.push(format!(
                "Max results must be between {MAX_RESULTS_MIN} and {MAX_RESULTS_MAX}"
            ));
        }
    }

    if let Some(concurrency) = request.concurrency {
        if !(CONCURRENCY_MIN..=CONCURRENCY_MAX).contains(&concurrency) {
            errors.push(format!(
                "Concurrency must be between {CONCURRENCY_MIN} and {CONCURRENCY_MAX}"
            ));
        }
    }

    let from = parse_date("date_from", request.date_from.as_deref(), &mut errors);
    let to = parse_date("date_to", request.date_to.as_deref(), &mut errors);
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            errors.push("Start date must be before end date".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn parse_date(field: &str, value: Option<&str>, errors: &mut Vec<String>) -> Option<NaiveDate> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(format!("{field} must be a date in YYYY-MM-DD format"));
            None
        }
    }
}
