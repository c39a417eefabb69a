//! CategoryRepository - Repository per le categorie di messaggi

use super::{Read, Update, decode, decode_all, encode};
use crate::dtos::UpdateCategoryDTO;
use crate::entities::MessageCategory;
use crate::store::{MESSAGE_CATEGORIES, Query, RecordStore, StoreError};
use std::sync::Arc;

pub struct CategoryRepository {
    store: Arc<dyn RecordStore>,
}

impl CategoryRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Categorie di un account, dalla più recente
    pub async fn find_many_by_account_id(
        &self,
        account_id: &str,
    ) -> Result<Vec<MessageCategory>, StoreError> {
        let rows = self
            .store
            .select(
                MESSAGE_CATEGORIES,
                &Query::new()
                    .eq("account_id", account_id)
                    .order_by("created_at", false),
            )
            .await?;
        decode_all(rows)
    }
}

impl Read<MessageCategory, String> for CategoryRepository {
    async fn read(&self, id: &String) -> Result<Option<MessageCategory>, StoreError> {
        self.store
            .get(MESSAGE_CATEGORIES, id)
            .await?
            .map(decode)
            .transpose()
    }
}

impl Update<MessageCategory, UpdateCategoryDTO, String> for CategoryRepository {
    async fn update(
        &self,
        id: &String,
        data: &UpdateCategoryDTO,
    ) -> Result<MessageCategory, StoreError> {
        let saved = self
            .store
            .update(MESSAGE_CATEGORIES, id, encode(data)?)
            .await?;
        decode(saved)
    }
}
