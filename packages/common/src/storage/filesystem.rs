use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::path::{random_file_name, validate_extension, validate_namespace, validate_relative_path};
use super::traits::FileStore;

/// Filesystem-backed file store.
///
/// Files live at `{root}/{namespace}/{generated name}` and are served publicly
/// under `{url_prefix}/{namespace}/{generated name}`.
pub struct LocalFileStore {
    root: PathBuf,
    url_prefix: String,
    max_size: u64,
}

impl LocalFileStore {
    /// Create a new local file store, creating the root directory if needed.
    pub async fn new(
        root: PathBuf,
        url_prefix: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join(".tmp")).await?;
        Ok(Self {
            root,
            url_prefix: url_prefix.into(),
            max_size,
        })
    }

    /// Root directory on disk.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Absolute filesystem path for a validated relative path.
    fn file_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        Ok(self.root.join(validate_relative_path(path)?))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.root.join(".tmp").join(random_file_name("part"))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn store(
        &self,
        namespace: &str,
        extension: &str,
        data: &[u8],
    ) -> Result<String, StorageError> {
        let namespace = validate_namespace(namespace)?;
        let extension = validate_extension(extension)?;

        if data.len() as u64 > self.max_size {
            return Err(StorageError::TooLarge {
                size: data.len() as u64,
                max: self.max_size,
            });
        }

        let relative = format!("{namespace}/{}", random_file_name(extension));
        let file_path = self.root.join(&relative);

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, &file_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!(path = %relative, size = data.len(), "Stored file");
        Ok(relative)
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let file_path = self.file_path(path)?;
        match fs::read(&file_path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::Missing(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let file_path = self.file_path(path)?;
        Ok(fs::try_exists(&file_path).await?)
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        let file_path = self.file_path(path)?;
        match fs::remove_file(&file_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn url_prefix(&self) -> &str {
        &self.url_prefix
    }
}
