//! Manifest schema definitions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_version: Option<FormatVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_file: Option<FileList>,
    #[serde(default)]
    pub problems: Vec<ProblemDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FormatVersion {
    Number(u32),
    Text(String),
}

/// A list of filenames; a bare string is accepted as a one-element list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FileList {
    One(String),
    Many(Vec<String>),
}

impl FileList {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            FileList::One(file) => vec![file.clone()],
            FileList::Many(files) => files.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProblemDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_files: Option<FileList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_files: Option<FileList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observable_files: Option<FileList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visualization_files: Option<FileList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation_files: Option<FileList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sbml_files: Option<FileList>,
}

impl ProblemDef {
    pub fn files(&self, category: pv_core::TableCategory) -> Option<&FileList> {
        use pv_core::TableCategory;
        match category {
            TableCategory::Measurement => self.measurement_files.as_ref(),
            TableCategory::Condition => self.condition_files.as_ref(),
            TableCategory::Observable => self.observable_files.as_ref(),
            TableCategory::Visualization => self.visualization_files.as_ref(),
            TableCategory::Simulation => self.simulation_files.as_ref(),
        }
    }
}
