//! Uploads stored under a directory on the local filesystem.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use yatube_core::ports::{MediaError, MediaStorage, check_relative_path};

use super::with_random_suffix;

/// Files live at `<root>/<folder>/<name>`.
pub struct FileSystemMediaStorage {
    root: PathBuf,
}

impl FileSystemMediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, MediaError> {
        check_relative_path(path)?;
        Ok(self.root.join(path))
    }
}

fn io_error(path: &str, err: std::io::Error) -> MediaError {
    match err.kind() {
        ErrorKind::NotFound => MediaError::NotFound(path.to_string()),
        _ => MediaError::Io(format!("{}: {}", path, err)),
    }
}

/// Write `bytes` to a freshly created file at `full`, removing the file if
/// the write does not complete.
async fn write_new<W>(mut file: W, full: &Path, bytes: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = match file.write_all(bytes).await {
        Ok(()) => file.flush().await,
        Err(e) => Err(e),
    };
    if written.is_err() {
        drop(file);
        if let Err(e) = tokio::fs::remove_file(full).await {
            tracing::warn!(path = %full.display(), error = %e, "Partial media file left behind");
        }
    }
    written
}

#[async_trait]
impl MediaStorage for FileSystemMediaStorage {
    async fn save(&self, folder: &str, file_name: &str, bytes: &[u8]) -> Result<String, MediaError> {
        let dir = self.resolve(folder)?;
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| io_error(folder, e))?;

        let mut name = file_name.to_string();
        loop {
            let relative = format!("{}/{}", folder, name);
            let full = self.resolve(&relative)?;

            // `create_new` makes the existence check and the write a single step.
            let opened = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&full)
                .await;

            match opened {
                Ok(file) => {
                    write_new(file, &full, bytes)
                        .await
                        .map_err(|e| io_error(&relative, e))?;
                    tracing::debug!(path = %relative, size = bytes.len(), "Media file stored");
                    return Ok(relative);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    name = with_random_suffix(file_name);
                }
                Err(e) => return Err(io_error(&relative, e)),
            }
        }
    }

    async fn open(&self, path: &str) -> Result<Vec<u8>, MediaError> {
        let full = self.resolve(path)?;
        tokio::fs::read(&full).await.map_err(|e| io_error(path, e))
    }

    async fn delete(&self, path: &str) -> Result<(), MediaError> {
        let full = self.resolve(path)?;
        tokio::fs::remove_file(&full)
            .await
            .map_err(|e| io_error(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("yatube-media-{}", uuid::Uuid::new_v4().simple()))
    }

    #[tokio::test]
    async fn test_save_open_and_collide() {
        let root = temp_root();
        let storage = FileSystemMediaStorage::new(&root);

        let first = storage.save("posts", "small.gif", b"GIF89a").await.unwrap();
        assert_eq!(first, "posts/small.gif");
        assert_eq!(storage.open(&first).await.unwrap(), b"GIF89a");

        let second = storage.save("posts", "small.gif", b"GIF87a").await.unwrap();
        assert_ne!(second, first);
        assert!(second.starts_with("posts/small_"));
        assert_eq!(storage.open(&first).await.unwrap(), b"GIF89a");

        storage.delete(&first).await.unwrap();
        assert!(matches!(storage.open(&first).await, Err(MediaError::NotFound(_))));

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    /// Accepts nothing, like a full disk.
    struct FullDisk;

    impl AsyncWrite for FullDisk {
        fn poll_write(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            _buf: &[u8],
        ) -> std::task::Poll<std::io::Result<usize>> {
            std::task::Poll::Ready(Err(std::io::Error::from_raw_os_error(28)))
        }

        fn poll_flush(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }

        fn poll_shutdown(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_failed_write_removes_the_file() {
        let root = temp_root();
        tokio::fs::create_dir_all(&root).await.unwrap();
        let full = root.join("partial.gif");
        tokio::fs::write(&full, b"GIF").await.unwrap();

        assert!(write_new(FullDisk, &full, b"GIF89a").await.is_err());
        assert!(!tokio::fs::try_exists(&full).await.unwrap());

        let complete = root.join("complete.gif");
        let file = tokio::fs::File::create(&complete).await.unwrap();
        write_new(file, &complete, b"GIF89a").await.unwrap();
        assert_eq!(tokio::fs::read(&complete).await.unwrap(), b"GIF89a");

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn test_escaping_the_root_is_rejected() {
        let storage = FileSystemMediaStorage::new(temp_root());
        assert!(matches!(
            storage.open("../secret").await,
            Err(MediaError::InvalidPath(_))
        ));
    }
}
