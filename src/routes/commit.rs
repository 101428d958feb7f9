//! Commit and revert endpoints.
//!
//! - POST /api/v1/commit { comment: string }
//!   Stages everything and commits it, authored by the repository's
//!   configured identity. Rejected before staging when no identity is
//!   configured.
//!
//! - POST /api/v1/revert
//!   Discards pending changes by rewinding to HEAD's recorded state.
//!   Untracked files are removed as part of the reset. Destructive.
//!
//! Both respond with a fresh full snapshot.

use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;

use crate::error::Result;
use crate::git::SharedFacade;
use crate::models::{CommitIntent, InfoResponse};
use crate::routes::info::snapshot;

pub fn routes(facade: SharedFacade) -> Router {
    Router::new()
        .route("/api/v1/commit", post(commit_changes))
        .route("/api/v1/revert", post(revert_changes))
        .with_state(facade)
}

#[derive(Debug, Deserialize)]
struct CommitRequest {
    comment: String,
}

async fn commit_changes(
    State(facade): State<SharedFacade>,
    Json(request): Json<CommitRequest>,
) -> Result<Json<InfoResponse>> {
    facade.ensure_repo()?;
    let intent = CommitIntent {
        message: request.comment,
        author: None,
    };
    facade.stage_and_commit(&intent).await?;
    snapshot(&facade).await
}

async fn revert_changes(State(facade): State<SharedFacade>) -> Result<Json<InfoResponse>> {
    facade.ensure_repo()?;
    facade.revert("HEAD").await?;
    snapshot(&facade).await
}
