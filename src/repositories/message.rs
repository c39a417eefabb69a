//! MessageRepository - Repository per i messaggi importati (sola lettura)

use super::decode_all;
use crate::entities::Message;
use crate::store::{MESSAGES, Query, RecordStore, StoreError};
use std::sync::Arc;

pub struct MessageRepository {
    store: Arc<dyn RecordStore>,
}

impl MessageRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn find_many_by_account_id(&self, account_id: &str) -> Result<Vec<Message>, StoreError> {
        let rows = self
            .store
            .select(MESSAGES, &Query::new().eq("account_id", account_id))
            .await?;
        decode_all(rows)
    }
}
