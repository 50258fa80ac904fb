use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatuslineError {
    #[error("invalid session input: {0}")]
    InvalidSession(#[source] serde_json::Error),

    #[error("failed to write config {}: {source}", path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
