use std::borrow::Cow;

use pubmed_core::CreateJobRequest;

use crate::error::{ClientError, Result};

/// Rejects blank identifiers before anything touches the network.
pub(crate) fn ensure_id(value: &str, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClientError::validation(
            field,
            format!("{field} must be a non-empty string."),
        ));
    }
    Ok(())
}

pub(crate) fn ensure_query(request: &CreateJobRequest) -> Result<()> {
    if request.query.trim().is_empty() {
        return Err(ClientError::validation("query", "Job query is required."));
    }
    Ok(())
}

/// Percent-encodes an identifier for use as one path segment.
pub(crate) fn segment(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id)
}
