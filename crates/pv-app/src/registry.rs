//! Lazily loaded tables referenced by a manifest.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use pv_core::TableCategory;
use pv_manifest::Manifest;
use pv_table::{LoadedTable, load_table};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Identity of a table in the registry: its category and manifest filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableKey {
    pub category: TableCategory,
    pub filename: String,
}

impl TableKey {
    pub fn new(category: TableCategory, filename: impl Into<String>) -> Self {
        Self {
            category,
            filename: filename.into(),
        }
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} file '{}'", self.category, self.filename)
    }
}

/// One leaf of the registry tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryLeaf {
    pub key: TableKey,
    pub loaded: bool,
    /// Attached from outside the manifest; `key.filename` is a full path.
    pub attached: bool,
}

/// Manifest plus a load-on-first-access cache of its tables.
///
/// An attached simulation file is not part of the manifest. It lives outside
/// the cache under its full path, so it never shadows a manifest file with
/// the same name.
#[derive(Debug)]
pub struct TableRegistry {
    manifest: Manifest,
    cache: HashMap<TableKey, Arc<LoadedTable>>,
    attached: Option<(TableKey, Arc<LoadedTable>)>,
}

impl TableRegistry {
    pub fn new(manifest: Manifest) -> Self {
        Self {
            manifest,
            cache: HashMap::new(),
            attached: None,
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Returns the cached table or loads it from disk.
    pub fn get_or_load(&mut self, key: &TableKey) -> AppResult<Arc<LoadedTable>> {
        if let Some(table) = self.cache.get(key) {
            debug!(%key, "registry cache hit");
            return Ok(Arc::clone(table));
        }
        if !self.manifest.contains(key.category, &key.filename) {
            return match &self.attached {
                Some((attached, table)) if attached == key => Ok(Arc::clone(table)),
                _ => Err(AppError::NotInManifest { key: key.clone() }),
            };
        }

        let path = self.manifest.resolve(&key.filename);
        let table = load_table(&path, key.category).map_err(|e| AppError::parse(&path, e))?;
        let table = Arc::new(table);
        self.cache.insert(key.clone(), Arc::clone(&table));
        Ok(table)
    }

    /// Registers an attached simulation table, replacing a previous one.
    pub fn attach(&mut self, key: TableKey, table: Arc<LoadedTable>) {
        self.attached = Some((key, table));
    }

    pub fn attached(&self) -> Option<&TableKey> {
        self.attached.as_ref().map(|(key, _)| key)
    }

    /// Manifest leaves in category and file order, then the attached file.
    /// Nothing is loaded while iterating.
    pub fn leaves(&self) -> impl Iterator<Item = RegistryLeaf> + '_ {
        let manifest_leaves = self
            .manifest
            .entries()
            .flat_map(|entry| {
                entry
                    .files
                    .iter()
                    .map(move |file| TableKey::new(entry.category, file.clone()))
            })
            .map(|key| RegistryLeaf {
                loaded: self.cache.contains_key(&key),
                attached: false,
                key,
            });
        let attached_leaf = self
            .attached()
            .filter(|key| !self.manifest.contains(key.category, &key.filename))
            .map(|key| RegistryLeaf {
                key: key.clone(),
                loaded: true,
                attached: true,
            });
        manifest_leaves.chain(attached_leaf)
    }
}
