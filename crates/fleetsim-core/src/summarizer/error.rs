//! Summarizer errors

use thiserror::Error;

/// Errors from the text-generation backend
///
/// These never leave [`super::FleetSummarizer`]; they are logged and
/// replaced with a fallback message.
#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("API key missing (expected in ${0})")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),
}
