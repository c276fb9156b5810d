//! Manifest validation logic.

use pv_core::TableCategory;

use crate::schema::ManifestDoc;

/// Categories a problem must list at least one file for.
pub const REQUIRED_CATEGORIES: [TableCategory; 2] =
    [TableCategory::Measurement, TableCategory::Condition];

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Manifest has no problems")]
    NoProblems,

    #[error("Missing required key: {key}")]
    MissingCategory { key: &'static str },

    #[error("No files listed for: {key}")]
    EmptyCategory { key: &'static str },

    #[error("Empty filename in {key}")]
    EmptyFilename { key: &'static str },
}

/// Checks the first problem, the only one that is used.
pub fn validate_doc(doc: &ManifestDoc) -> Result<(), ValidationError> {
    let problem = doc.problems.first().ok_or(ValidationError::NoProblems)?;

    for category in REQUIRED_CATEGORIES {
        let key = category.manifest_key();
        let files = problem
            .files(category)
            .ok_or(ValidationError::MissingCategory { key })?;
        if files.to_vec().is_empty() {
            return Err(ValidationError::EmptyCategory { key });
        }
    }

    for category in TableCategory::ALL {
        if let Some(files) = problem.files(category)
            && files.to_vec().iter().any(|f| f.trim().is_empty())
        {
            return Err(ValidationError::EmptyFilename {
                key: category.manifest_key(),
            });
        }
    }

    Ok(())
}
