//! Repository snapshot endpoint.
//!
//! GET /api/v1/info
//!   Fetches from the configured remote (best effort), then returns the
//!   current branch and the unpulled/unpushed/untracked counts.
//!   Used by: the panel header and both sync buttons.

use axum::{Json, Router, extract::State, routing::get};

use crate::error::Result;
use crate::git::SharedFacade;
use crate::models::InfoResponse;

pub fn routes(facade: SharedFacade) -> Router {
    Router::new()
        .route("/api/v1/info", get(get_info))
        .with_state(facade)
}

async fn get_info(State(facade): State<SharedFacade>) -> Result<Json<InfoResponse>> {
    facade.ensure_repo()?;
    snapshot(&facade).await
}

/// Re-derives the full snapshot; mutating endpoints call this after their
/// operation succeeds.
pub(crate) async fn snapshot(facade: &SharedFacade) -> Result<Json<InfoResponse>> {
    let info = facade.info().await?;
    Ok(Json(InfoResponse::ok(info)))
}
