//! Error types for the pv-app service layer.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::registry::TableKey;

/// Application error type wrapping failures from the manifest and table
/// crates into the two kinds the UI distinguishes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed manifest or data file; the action is aborted.
    #[error("Could not read {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// The action needs state that is not there yet.
    #[error("{0}")]
    Precondition(String),

    #[error("{key} is not listed in the manifest")]
    NotInManifest { key: TableKey },

    #[error("Failed to access settings file: {path}: {source}")]
    SettingsIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Core(#[from] pv_core::PvError),

    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),
}

/// Result type for pv-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn parse(path: &Path, err: impl fmt::Display) -> Self {
        AppError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        AppError::Precondition(message.into())
    }
}

/// Non-fatal message; the action goes on with a documented default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWarning(pub String);

impl UserWarning {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for UserWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
