mod error;
mod path;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use path::{random_file_name, validate_relative_path};
pub use traits::FileStore;
