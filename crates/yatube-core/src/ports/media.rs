//! Media storage port - where uploaded images live.

use async_trait::async_trait;

/// Storage for uploaded files, addressed by paths relative to the media root.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store `bytes` as `folder/file_name`, returning the path actually used.
    /// A taken name gets a random suffix instead of overwriting.
    async fn save(&self, folder: &str, file_name: &str, bytes: &[u8])
    -> Result<String, MediaError>;

    /// Read a stored file back.
    async fn open(&self, path: &str) -> Result<Vec<u8>, MediaError>;

    async fn delete(&self, path: &str) -> Result<(), MediaError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Storage error: {0}")]
    Io(String),
}

/// Reject absolute paths and any `..` component.
pub fn check_relative_path(path: &str) -> Result<(), MediaError> {
    let invalid = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(|part| part == ".." || part == ".");
    if invalid {
        return Err(MediaError::InvalidPath(path.to_string()));
    }
    Ok(())
}
