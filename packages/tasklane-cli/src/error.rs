use std::path::PathBuf;

use tasklane_core::snapshot::SnapshotError;
use tasklane_core::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No snapshot at {0} (run `tasklane init`)")]
    NoSnapshot(PathBuf),

    #[error("Snapshot already exists at {0} (use --force to overwrite)")]
    SnapshotExists(PathBuf),

    #[error("No board given and no active board")]
    NoActiveBoard,
}
