//! Resolved manifest: category to ordered filenames.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pv_core::TableCategory;

use crate::schema::ManifestDoc;
use crate::validate::ValidationError;

/// One category with its filenames in manifest order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub category: TableCategory,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    path: PathBuf,
    base_dir: PathBuf,
    entries: BTreeMap<TableCategory, ManifestEntry>,
    sbml_files: Vec<String>,
}

impl Manifest {
    /// Builds the category map from the first problem of a validated document.
    pub fn from_doc(doc: ManifestDoc, path: &Path) -> Result<Self, ValidationError> {
        let problem = doc
            .problems
            .into_iter()
            .next()
            .ok_or(ValidationError::NoProblems)?;

        let mut entries = BTreeMap::new();
        for category in TableCategory::ALL {
            let files = problem.files(category).map(|f| f.to_vec()).unwrap_or_default();
            if !files.is_empty() {
                entries.insert(category, ManifestEntry { category, files });
            }
        }

        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            base_dir,
            entries,
            sbml_files: problem.sbml_files.map(|f| f.to_vec()).unwrap_or_default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn entry(&self, category: TableCategory) -> Option<&ManifestEntry> {
        self.entries.get(&category)
    }

    /// Entries in category order; absent categories are skipped.
    pub fn entries(&self) -> impl Iterator<Item = &ManifestEntry> + '_ {
        self.entries.values()
    }

    pub fn first_file(&self, category: TableCategory) -> Option<&str> {
        self.entry(category)
            .and_then(|e| e.files.first())
            .map(String::as_str)
    }

    pub fn contains(&self, category: TableCategory, filename: &str) -> bool {
        self.entry(category)
            .is_some_and(|e| e.files.iter().any(|f| f == filename))
    }

    /// Filenames are relative to the manifest directory.
    pub fn resolve(&self, filename: &str) -> PathBuf {
        self.base_dir.join(filename)
    }

    pub fn sbml_files(&self) -> &[String] {
        &self.sbml_files
    }
}
