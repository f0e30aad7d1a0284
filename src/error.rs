//! Error types for klartext.
//!
//! This module defines the error types returned by extraction operations.

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A filter rule was malformed (e.g. an empty tag name). Raised at
    /// construction time, before any fragment is processed.
    #[error("invalid filter rule: {0}")]
    InvalidRule(String),

    /// The expected article region was not found in the markup.
    #[error("no article content found")]
    NoContent,

    /// The fetched resource is permanently unavailable (deleted page,
    /// pagination past the last page).
    #[error("resource unavailable: {0}")]
    Unavailable(String),

    /// Fetching a resource failed for a transient or unexpected reason.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Character encoding label was not recognized.
    #[error("unknown encoding label: {0}")]
    UnknownEncoding(String),

    /// A composed URL was invalid.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
