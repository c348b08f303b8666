//! Local filesystem storage implementation.
//!
//! Files are written atomically: the bytes go to a `<name>.tmp` sibling first and
//! are renamed into place, so a failed export never leaves a truncated file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::{OutputConfig, ProjectRecord};
use crate::storage::{ProjectStorage, format};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    json_file: String,
    csv_file: String,
}

impl LocalStorage {
    /// Create a LocalStorage from output settings.
    pub fn new(output: &OutputConfig) -> Self {
        Self {
            root_dir: PathBuf::from(&output.dir),
            json_file: output.json_file.clone(),
            csv_file: output.csv_file.clone(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(path)
    }
}

#[async_trait]
impl ProjectStorage for LocalStorage {
    async fn write_json(&self, records: &[ProjectRecord]) -> Result<PathBuf> {
        let bytes = format::to_json(records)?;
        let path = self.write_bytes(&self.json_file, &bytes).await?;
        log::info!("JSON: {} records written to {}", records.len(), path.display());
        Ok(path)
    }

    async fn write_csv(&self, records: &[ProjectRecord]) -> Result<PathBuf> {
        let bytes = format::to_csv(records)?;
        let path = self.write_bytes(&self.csv_file, &bytes).await?;
        log::info!("CSV: {} records written to {}", records.len(), path.display());
        Ok(path)
    }
}
