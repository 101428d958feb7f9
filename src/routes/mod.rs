//! API route handlers - maps HTTP endpoints to façade operations.
//!
//! Each submodule covers a feature area:
//! - `info`: full repository snapshot (GET /api/v1/info)
//! - `status`: changed-file listing
//! - `branches`: remote branch listing, checkout, branch creation
//! - `commit`: staging/commit and revert
//! - `sync`: pull, push, pull-request URL
//!
//! Every handler short-circuits to the NO_REPOSITORY envelope when the
//! metadata directory is missing, before any git process is spawned.
//! Mutating handlers respond with a fresh full snapshot on success, so
//! every write has the same response shape as GET /info.

pub mod branches;
pub mod commit;
pub mod info;
pub mod status;
pub mod sync;

use axum::Router;

use crate::git::SharedFacade;

pub fn create_router(facade: SharedFacade) -> Router {
    Router::new()
        .merge(info::routes(facade.clone()))
        .merge(status::routes(facade.clone()))
        .merge(branches::routes(facade.clone()))
        .merge(commit::routes(facade.clone()))
        .merge(sync::routes(facade))
}
