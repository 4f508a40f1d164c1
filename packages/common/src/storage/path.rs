use rand::Rng;
use rand::distr::Alphanumeric;

use super::error::StorageError;

/// Length of generated file names, excluding the extension.
const FILE_NAME_LEN: usize = 40;

/// Generate a random alphanumeric file name with the given extension.
pub fn random_file_name(extension: &str) -> String {
    let stem: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(FILE_NAME_LEN)
        .map(char::from)
        .collect();
    format!("{stem}.{extension}")
}

/// Validates a storage-relative path such as `brands/abc.png`.
///
/// Rejects empty paths, absolute paths, backslashes, null bytes and any
/// `.`/`..`/empty component, so the path can never leave the storage root.
pub fn validate_relative_path(path: &str) -> Result<&str, StorageError> {
    if path.is_empty() {
        return Err(StorageError::RejectedPath("path cannot be empty".into()));
    }

    if path.contains('\0') {
        return Err(StorageError::RejectedPath(
            "path must not contain null bytes".into(),
        ));
    }

    if path.contains('\\') {
        return Err(StorageError::RejectedPath(
            "path must not contain backslashes".into(),
        ));
    }

    if path.starts_with('/') {
        return Err(StorageError::RejectedPath(
            "path must not start with '/'".into(),
        ));
    }

    if path
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(StorageError::RejectedPath(format!(
            "path '{path}' contains an empty or relative segment"
        )));
    }

    Ok(path)
}

/// Validates a namespace directory name (one path segment).
pub(crate) fn validate_namespace(namespace: &str) -> Result<&str, StorageError> {
    validate_relative_path(namespace)?;
    if namespace.contains('/') {
        return Err(StorageError::RejectedPath(format!(
            "namespace '{namespace}' must be a single segment"
        )));
    }
    Ok(namespace)
}

/// Validates a file extension (ASCII alphanumeric, 1-10 characters).
pub(crate) fn validate_extension(extension: &str) -> Result<&str, StorageError> {
    if extension.is_empty()
        || extension.len() > 10
        || !extension.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(StorageError::RejectedPath(format!(
            "invalid file extension '{extension}'"
        )));
    }
    Ok(extension)
}
