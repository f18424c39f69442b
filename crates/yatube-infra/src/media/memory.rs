//! In-memory media storage, for tests and storage-less deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use yatube_core::ports::{MediaError, MediaStorage, check_relative_path};

use super::with_random_suffix;

#[derive(Default)]
pub struct InMemoryMediaStorage {
    files: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryMediaStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }
}

#[async_trait]
impl MediaStorage for InMemoryMediaStorage {
    async fn save(&self, folder: &str, file_name: &str, bytes: &[u8]) -> Result<String, MediaError> {
        let mut files = self.files.write().await;
        let mut path = format!("{}/{}", folder, file_name);
        check_relative_path(&path)?;
        while files.contains_key(&path) {
            path = format!("{}/{}", folder, with_random_suffix(file_name));
        }
        files.insert(path.clone(), bytes.to_vec());
        Ok(path)
    }

    async fn open(&self, path: &str) -> Result<Vec<u8>, MediaError> {
        check_relative_path(path)?;
        self.files
            .read()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| MediaError::NotFound(path.to_string()))
    }

    async fn delete(&self, path: &str) -> Result<(), MediaError> {
        self.files
            .write()
            .await
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| MediaError::NotFound(path.to_string()))
    }
}
