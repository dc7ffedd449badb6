//! Request-level errors and their HTTP rendering.
//!
//! Every failure ends the request with a status and a short plain-text
//! message. Upstream details stay in the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use todo_core::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    /// The request body is not a todo-shaped JSON document.
    #[error("invalid request body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The `{id}` path segment is not an integer.
    #[error("invalid id {0:?}")]
    InvalidId(String),

    /// The store rejected the operation. `action` completes the sentence
    /// "Failed to ..." shown to the caller.
    #[error("failed to {action}: {source}")]
    Store {
        action: &'static str,
        #[source]
        source: StoreError,
    },
}

impl AppError {
    pub fn store(action: &'static str) -> impl FnOnce(StoreError) -> AppError {
        move |source| AppError::Store { action, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Decode(_) | AppError::InvalidId(_) => StatusCode::BAD_REQUEST,
            AppError::Store {
                source: StoreError::NotFound,
                ..
            } => StatusCode::NOT_FOUND,
            AppError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the caller.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Decode(_) => "Invalid request body".to_string(),
            AppError::InvalidId(_) => "Invalid ID".to_string(),
            AppError::Store {
                source: StoreError::NotFound,
                ..
            } => "Todo not found".to_string(),
            AppError::Store { action, .. } => format!("Failed to {action}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, self.public_message()).into_response()
    }
}
