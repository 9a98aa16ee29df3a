//! Error types for the reader core.
//!
//! Every variant here is recoverable: callers either fall back to a degraded
//! layout or surface a terminal "no content" state to the host.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReaderError {
    /// Story content was empty or whitespace-only after normalization.
    #[error("story has no readable content")]
    NoContent,

    /// The authored image plan could not be interpreted.
    #[error("invalid image plan: {0}")]
    InvalidImagePlan(String),

    /// The session was torn down before a deferred step ran.
    #[error("operation cancelled at stage={stage}")]
    Cancelled { stage: &'static str },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReaderError>;
