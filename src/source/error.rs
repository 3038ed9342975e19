//! Error types for the setlist source.

use thiserror::Error;

/// Errors that can occur while asking the generative API for a set.
///
/// None of these reach the player: `generate_setlist` and `describe_vibe`
/// recover them into an empty setlist or the fallback caption.
#[derive(Error, Debug)]
pub enum SourceError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API is offline or unreachable
    #[error("API unreachable: {0}")]
    Unreachable(String),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// No API key configured
    #[error("no API key configured")]
    MissingApiKey,

    /// Response had no candidate text
    #[error("response contained no text")]
    EmptyResponse,

    /// Failed to parse the response payload
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Invalid API base URL
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

/// Result type for setlist source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
