//! Branch listing, switching and creation endpoints.
//!
//! - GET /api/v1/branches
//!   Lists remote branches (`branch -r`), trimmed, in git's order.
//!   Used by: the branch selector in the panel.
//!
//! - POST /api/v1/checkout { branch: string }
//!   Switches to an existing local or trackable branch.
//!
//! - POST /api/v1/branch { branch: string }
//!   Creates a new branch and switches to it; fails if the name exists.
//!
//! Both mutating routes respond with a fresh full snapshot.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;

use crate::error::Result;
use crate::git::SharedFacade;
use crate::models::{ApiStatus, BranchesResponse, InfoResponse};
use crate::routes::info::snapshot;

pub fn routes(facade: SharedFacade) -> Router {
    Router::new()
        .route("/api/v1/branches", get(list_branches))
        .route("/api/v1/checkout", post(checkout_branch))
        .route("/api/v1/branch", post(create_branch))
        .with_state(facade)
}

async fn list_branches(State(facade): State<SharedFacade>) -> Result<Json<BranchesResponse>> {
    facade.ensure_repo()?;
    let branches = facade.remote_branches().await?;
    Ok(Json(BranchesResponse {
        status: ApiStatus::Ok,
        branches,
    }))
}

#[derive(Debug, Deserialize)]
struct CheckoutRequest {
    branch: String,
}

async fn checkout_branch(
    State(facade): State<SharedFacade>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<InfoResponse>> {
    facade.ensure_repo()?;
    facade.checkout(&request.branch).await?;
    snapshot(&facade).await
}

#[derive(Debug, Deserialize)]
struct BranchRequest {
    branch: String,
}

async fn create_branch(
    State(facade): State<SharedFacade>,
    Json(request): Json<BranchRequest>,
) -> Result<Json<InfoResponse>> {
    facade.ensure_repo()?;
    facade.create_branch(&request.branch).await?;
    snapshot(&facade).await
}
