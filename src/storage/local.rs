//! Local filesystem storage implementation.
//!
//! Keys are paths relative to the storage root. A default storage has an
//! empty root, so keys are used as given.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{FlattenedOutput, School};
use crate::storage::{CatalogStorage, Dataset, OneOrMany, school_file_name};

/// Local filesystem storage backend.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    pub fn path(&self, key: impl AsRef<Path>) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    pub async fn write_bytes(&self, key: impl AsRef<Path>, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(path)
    }

    /// Write pretty-printed JSON.
    pub async fn write_json<T: Serialize + ?Sized + Sync>(
        &self,
        key: impl AsRef<Path>,
        value: &T,
    ) -> Result<PathBuf> {
        let mut bytes = serde_json::to_vec_pretty(value)?;
        bytes.push(b'\n');
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    pub async fn read_bytes(&self, key: impl AsRef<Path>) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    pub async fn read_json<T: DeserializeOwned>(&self, key: impl AsRef<Path>) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Read a dataset holding one record or an array of them.
    pub async fn read_dataset<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.read_json::<OneOrMany<T>>(key).await? {
            Some(data) => Ok(data.into_vec()),
            None => Err(AppError::Io(std::io::Error::new(
                ErrorKind::NotFound,
                format!("dataset not found: {}", self.path(key).display()),
            ))),
        }
    }

    /// Read a dataset of either shape, gathered or flattened.
    pub async fn load_dataset(&self, key: &str) -> Result<Dataset> {
        let records = self.read_dataset::<serde_json::Value>(key).await?;
        Dataset::from_records(records)
    }
}

#[async_trait]
impl CatalogStorage for LocalStorage {
    async fn save_school(&self, school: &School) -> Result<PathBuf> {
        let key = school_file_name(&school.school_name);
        let path = self.write_json(&key, school).await?;
        log::info!(
            "Saved {} majors across {} colleges to {}",
            school.major_count(),
            school.colleges.len(),
            path.display()
        );
        Ok(path)
    }

    async fn load_schools(&self, key: &str) -> Result<Vec<School>> {
        self.read_dataset(key).await
    }

    async fn save_flattened(&self, key: &str, outputs: &[FlattenedOutput]) -> Result<PathBuf> {
        let path = match outputs {
            [single] => self.write_json(key, single).await?,
            many => self.write_json(key, many).await?,
        };
        log::info!("Saved flattened output to {}", path.display());
        Ok(path)
    }

    async fn load_flattened(&self, key: &str) -> Result<Vec<FlattenedOutput>> {
        self.read_dataset(key).await
    }
}
