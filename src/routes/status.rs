//! Changed-file listing endpoint.
//!
//! GET /api/v1/status
//!   Returns the `status --short --untracked-files=all` lines in git's
//!   order.
//!   Used by: the pending-changes list in the panel.

use axum::{Json, Router, extract::State, routing::get};

use crate::error::Result;
use crate::git::SharedFacade;
use crate::models::{ApiStatus, StatusResponse};

pub fn routes(facade: SharedFacade) -> Router {
    Router::new()
        .route("/api/v1/status", get(get_status))
        .with_state(facade)
}

async fn get_status(State(facade): State<SharedFacade>) -> Result<Json<StatusResponse>> {
    facade.ensure_repo()?;
    let files = facade.status().await?;
    Ok(Json(StatusResponse {
        status: ApiStatus::Ok,
        files,
    }))
}
