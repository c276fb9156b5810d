//! pv-core: shared vocabulary for petabvis.
//!
//! Contains:
//! - category (the fixed set of PEtab table categories)
//! - columns (PEtab column names used across crates)
//! - error (shared error types)

pub mod category;
pub mod columns;
pub mod error;

// Re-exports
pub use category::TableCategory;
pub use error::{PvError, PvResult};
