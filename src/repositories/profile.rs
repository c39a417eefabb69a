//! ProfileRepository - Repository per i profili utente (sola lettura)

use super::{Read, decode};
use crate::entities::Profile;
use crate::store::{PROFILES, RecordStore, StoreError};
use std::sync::Arc;

pub struct ProfileRepository {
    store: Arc<dyn RecordStore>,
}

impl ProfileRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

impl Read<Profile, String> for ProfileRepository {
    async fn read(&self, id: &String) -> Result<Option<Profile>, StoreError> {
        self.store.get(PROFILES, id).await?.map(decode).transpose()
    }
}
