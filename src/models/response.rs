use serde::{Deserialize, Serialize};

use crate::models::RepositoryInfo;

/// Wire status discriminant. Clients dispatch on this field; the HTTP
/// status code is always 200.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiStatus {
    Ok,
    Failure,
    NoRepository,
}

/// Success body of GET /info and of every mutating endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoResponse {
    pub status: ApiStatus,
    #[serde(flatten)]
    pub info: RepositoryInfo,
}

impl InfoResponse {
    pub fn ok(info: RepositoryInfo) -> Self {
        Self {
            status: ApiStatus::Ok,
            info,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: ApiStatus,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchesResponse {
    pub status: ApiStatus,
    pub branches: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestUrlResponse {
    pub status: ApiStatus,
    pub url: String,
}
