//! MemoryFileStorage - storage di oggetti in memoria

use super::{FileStorage, StorageError, UploadOptions};
use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, instrument};

pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

pub struct MemoryFileStorage {
    public_base: String,
    objects: DashMap<String, StoredObject>,
}

impl MemoryFileStorage {
    pub fn new(public_base: impl Into<String>) -> Self {
        Self {
            public_base: public_base.into().trim_end_matches('/').to_string(),
            objects: DashMap::new(),
        }
    }

    pub fn content_type(&self, path: &str) -> Option<String> {
        self.objects.get(path).map(|o| o.content_type.clone())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects.contains_key(path)
    }
}

#[async_trait]
impl FileStorage for MemoryFileStorage {
    #[instrument(skip(self, bytes, options), fields(path = %path, size = bytes.len()))]
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<(), StorageError> {
        if !options.upsert && self.objects.contains_key(path) {
            return Err(StorageError::AlreadyExists(path.to_string()));
        }
        self.objects.insert(
            path.to_string(),
            StoredObject {
                bytes,
                content_type: options.content_type.clone(),
            },
        );
        debug!("Stored object");
        Ok(())
    }

    async fn get_url(&self, path: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .objects
            .contains_key(path)
            .then(|| format!("{}/{}", self.public_base, path)))
    }
}
