use async_trait::async_trait;

use super::error::StorageError;

/// Namespaced file storage with publicly servable URLs.
///
/// Files are addressed by storage-relative paths (`brands/abc.png`). Public
/// URLs are the relative path behind a fixed prefix (`/storage/brands/abc.png`).
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store bytes under `namespace` with a generated file name and return the
    /// relative path of the new file.
    async fn store(
        &self,
        namespace: &str,
        extension: &str,
        data: &[u8],
    ) -> Result<String, StorageError>;

    /// Retrieve all bytes of a stored file.
    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Check whether a file exists.
    async fn exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Delete a file by its relative path.
    ///
    /// Returns `true` if the file was deleted, `false` if it did not exist.
    async fn delete(&self, path: &str) -> Result<bool, StorageError>;

    /// The public URL prefix files are served under, without trailing slash.
    fn url_prefix(&self) -> &str;

    /// Public URL for a relative path.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.url_prefix().trim_end_matches('/'), path)
    }

    /// Recover the relative path from a public URL produced by [`FileStore::url`].
    ///
    /// Returns `None` when the URL does not carry this store's prefix.
    fn path_from_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(self.url_prefix().trim_end_matches('/'))?
            .strip_prefix('/')
            .filter(|path| !path.is_empty())
    }
}
