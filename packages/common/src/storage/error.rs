use std::{fmt, io};

/// Failure of a [`FileStore`](super::FileStore) operation.
#[derive(Debug)]
pub enum StorageError {
    /// No file is stored at this relative path.
    Missing(String),
    Io(io::Error),
    /// A path, namespace or extension that would escape or corrupt the store.
    RejectedPath(String),
    /// Upload larger than the store accepts, both in bytes.
    TooLarge { size: u64, max: u64 },
}

impl StorageError {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing(_))
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(path) => write!(f, "no stored file at '{path}'"),
            Self::Io(err) => write!(f, "file store I/O failed: {err}"),
            Self::RejectedPath(reason) => write!(f, "rejected storage path: {reason}"),
            Self::TooLarge { size, max } => {
                write!(f, "{size} byte upload is over the {max} byte store limit")
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
