//! AccountRepository - Repository per la gestione degli account

use super::{Read, Update, decode, encode};
use crate::dtos::UpdateAccountDTO;
use crate::entities::Account;
use crate::store::{ACCOUNTS, RecordStore, StoreError};
use std::sync::Arc;

pub struct AccountRepository {
    store: Arc<dyn RecordStore>,
}

impl AccountRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

impl Read<Account, String> for AccountRepository {
    async fn read(&self, id: &String) -> Result<Option<Account>, StoreError> {
        self.store
            .get(ACCOUNTS, id)
            .await?
            .map(decode)
            .transpose()
    }
}

impl Update<Account, UpdateAccountDTO, String> for AccountRepository {
    async fn update(&self, id: &String, data: &UpdateAccountDTO) -> Result<Account, StoreError> {
        let saved = self.store.update(ACCOUNTS, id, encode(data)?).await?;
        decode(saved)
    }
}
