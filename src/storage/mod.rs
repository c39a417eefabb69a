//! File storage - client verso lo storage di oggetti del backend
//!
//! Due sole operazioni: caricare un file a un path e risolvere un path in un URL.

pub mod memory;
pub mod rest;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryFileStorage;
pub use rest::RestFileStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("object already exists at {0}")]
    AlreadyExists(String),
    #[error("storage rejected upload ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub content_type: String,
    /// Sovrascrive l'oggetto se il path è già occupato
    pub upsert: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            content_type: "application/octet-stream".to_string(),
            upsert: false,
        }
    }
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<(), StorageError>;

    /// URL risolto per il path, `None` se l'oggetto non esiste o non è risolvibile
    async fn get_url(&self, path: &str) -> Result<Option<String>, StorageError>;
}
