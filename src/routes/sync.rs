//! Remote synchronization endpoints.
//!
//! - POST /api/v1/pull
//!   Pulls the current branch; incoming hunks win on conflict, by policy.
//!
//! - POST /api/v1/push
//!   Pushes HEAD to the configured remote, with a per-call credential for
//!   HTTPS remotes when one is configured.
//!
//! - GET /api/v1/getPullRequestUrl
//!   Derives the remote's compare-view URL for the current branch; fails
//!   distinctly when no remote is configured.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::error::Result;
use crate::git::SharedFacade;
use crate::models::{ApiStatus, InfoResponse, PullRequestUrlResponse};
use crate::routes::info::snapshot;

pub fn routes(facade: SharedFacade) -> Router {
    Router::new()
        .route("/api/v1/pull", post(pull_changes))
        .route("/api/v1/push", post(push_changes))
        .route("/api/v1/getPullRequestUrl", get(get_pull_request_url))
        .with_state(facade)
}

async fn pull_changes(State(facade): State<SharedFacade>) -> Result<Json<InfoResponse>> {
    facade.ensure_repo()?;
    let branch = facade.current_branch().await?;
    facade.pull(&branch).await?;
    snapshot(&facade).await
}

async fn push_changes(State(facade): State<SharedFacade>) -> Result<Json<InfoResponse>> {
    facade.ensure_repo()?;
    facade.push().await?;
    snapshot(&facade).await
}

async fn get_pull_request_url(
    State(facade): State<SharedFacade>,
) -> Result<Json<PullRequestUrlResponse>> {
    facade.ensure_repo()?;
    let url = facade.pull_request_url().await?;
    Ok(Json(PullRequestUrlResponse {
        status: ApiStatus::Ok,
        url,
    }))
}
