use serde::{Deserialize, Serialize};

/// Snapshot of the working tree relative to its remote. Recomputed on
/// every request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub branch: String,
    pub count_unpulled: usize,
    pub count_unpushed: usize,
    pub count_untracked: usize,
}

/// Transient input to the commit operation.
#[derive(Debug, Clone)]
pub struct CommitIntent {
    pub message: String,
    /// `Name <email>` override; derived from the configured identity
    /// when absent.
    pub author: Option<String>,
}
