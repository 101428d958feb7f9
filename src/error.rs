//! Application error types and HTTP response mapping.
//!
//! Defines `AppError` for every failure condition and implements axum's
//! `IntoResponse` to convert each into the wire envelope the panel
//! understands. Every envelope ships with HTTP 200; clients dispatch on
//! the `status` field, not on the HTTP status code.
//!
//! Envelope mappings:
//! - `NoRepository` → `{"status": "NO_REPOSITORY"}`
//! - everything else → `{"status": "FAILURE", "message": ...}`

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// The configured metadata directory does not exist on disk.
    #[error("no git repository found at the configured path")]
    NoRepository,

    /// A git invocation exited non-zero; payload is the captured output.
    #[error("{0}")]
    Command(String),

    /// Commit attempted without a resolvable user.name/user.email.
    #[error("git user.name and user.email must be configured before committing")]
    MissingIdentity,

    /// An operation needed a remote URL and none is configured.
    #[error("no remote configured for this repository")]
    NoRemote,

    /// Spawn or filesystem failure, distinct from a non-zero exit.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            AppError::NoRepository => json!({ "status": "NO_REPOSITORY" }),
            other => json!({ "status": "FAILURE", "message": other.to_string() }),
        };
        (StatusCode::OK, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
