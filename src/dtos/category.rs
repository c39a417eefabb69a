//! Category DTOs - Data Transfer Objects per la pagina messaggi

use crate::entities::MessageCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Testo mostrato quando l'account non ha ancora categorie
pub const EMPTY_STATE_TEXT: &str = "No message categories yet. Messages are imported from your connected integration; they are not written in this app. Once the integration syncs, categories will show up here.";

/// Categoria annotata con il conteggio dei messaggi
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CategoryDTO {
    pub id: String,
    pub name: String,
    pub thumbnail_path: Option<String>,
    pub thumbnail_url: Option<String>,
    pub message_count: usize,
    pub browse_url: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl CategoryDTO {
    pub fn new(value: MessageCategory, message_count: usize) -> Self {
        Self {
            browse_url: browse_url(&value.id),
            id: value.id,
            name: value.name,
            thumbnail_path: value.thumbnail_path,
            thumbnail_url: None, // va risolto tramite lo storage
            message_count,
            created_at: value.created_at,
        }
    }
}

/// `/message-category?id={category_id}`
pub fn browse_url(category_id: &str) -> String {
    format!("/message-category?id={}", category_id)
}

/// Snapshot della pagina messaggi
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessagesPageDTO {
    pub account_id: String,
    pub categories: Vec<CategoryDTO>,
    pub empty_state: Option<String>,
}

/// Body della richiesta di rinomina categoria
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct RenameCategoryDTO {
    #[validate(length(max = 100, message = "Category name must be at most 100 characters"))]
    pub name: String,
}

/// DTO per aggiornare una categoria
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UpdateCategoryDTO {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
