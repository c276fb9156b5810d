//! pv-manifest: PEtab YAML manifest format and validation.

pub mod manifest;
pub mod schema;
pub mod validate;

pub use manifest::{Manifest, ManifestEntry};
pub use schema::*;
pub use validate::{ValidationError, validate_doc};

use std::path::{Path, PathBuf};
use tracing::info;

pub type ManifestResult<T> = Result<T, ManifestError>;

#[derive(thiserror::Error, Debug)]
pub enum ManifestError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to read manifest: {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub fn load_manifest(path: &Path) -> ManifestResult<Manifest> {
    let content = std::fs::read_to_string(path).map_err(|e| ManifestError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let manifest = parse_manifest(&content, path)?;
    info!(
        path = %path.display(),
        categories = manifest.entries().count(),
        "opened manifest"
    );
    Ok(manifest)
}

/// Parses manifest text; `path` anchors the relative filenames.
pub fn parse_manifest(content: &str, path: &Path) -> ManifestResult<Manifest> {
    let doc: ManifestDoc = serde_yaml::from_str(content)?;
    validate_doc(&doc)?;
    Ok(Manifest::from_doc(doc, path)?)
}
