//! Error types shared by both store backends.
//!
//! # Design
//! `NotFound` gets a dedicated variant because handlers map it to 404 while
//! everything else is an upstream failure. Upstream statuses and bodies are
//! kept verbatim for the logs; they are never shown to HTTP callers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No todo with the requested id exists.
    #[error("todo not found")]
    NotFound,

    /// The upstream answered with a non-2xx status.
    #[error("upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The upstream could not be reached or the response could not be read.
    #[error("upstream transport failed: {0}")]
    Transport(String),

    /// An outbound payload could not be serialized.
    #[error("serialization failed: {0}")]
    Encode(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}
