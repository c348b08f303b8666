//! Storage abstractions for crawl output.
//!
//! ## Directory Structure
//!
//! ```text
//! {output.dir}/
//! ├── output.json   # JSON array of project records
//! └── output.csv    # Name,URL,Team Members table
//! ```

pub mod format;
pub mod local;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ProjectRecord;

// Re-export for convenience
pub use local::LocalStorage;

/// Trait for project output backends.
///
/// The two outputs are written independently so that a failure in one does
/// not prevent the other.
#[async_trait]
pub trait ProjectStorage: Send + Sync {
    /// Write the JSON export, returning where it was written.
    async fn write_json(&self, records: &[ProjectRecord]) -> Result<PathBuf>;

    /// Write the CSV export, returning where it was written.
    async fn write_csv(&self, records: &[ProjectRecord]) -> Result<PathBuf>;
}
