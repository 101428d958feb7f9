//! Data transfer objects (DTOs) for API responses.
//!
//! These structs are serialized to JSON for panel consumption.
//! - `info`: RepositoryInfo snapshot and CommitIntent
//! - `response`: the OK/FAILURE/NO_REPOSITORY wire envelopes

pub mod info;
pub mod response;

pub use info::*;
pub use response::*;
