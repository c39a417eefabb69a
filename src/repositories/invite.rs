//! InviteRepository - Repository per la gestione degli inviti

use super::{Create, Read, Update, decode, decode_all, encode};
use crate::dtos::{CreateInviteDTO, UpdateInviteDTO};
use crate::entities::AccountInvite;
use crate::store::{ACCOUNT_INVITES, Filters, Query, RecordStore, StoreError};
use serde_json::Value;
use std::sync::Arc;

pub struct InviteRepository {
    store: Arc<dyn RecordStore>,
}

impl InviteRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Inviti attivi di un account, dal più recente
    pub async fn find_active_by_account_id(
        &self,
        account_id: &str,
    ) -> Result<Vec<AccountInvite>, StoreError> {
        let rows = self
            .store
            .select(
                ACCOUNT_INVITES,
                &Query::new()
                    .eq("account_id", account_id)
                    .eq("active", true)
                    .order_by("created_at", false),
            )
            .await?;
        decode_all(rows)
    }

    pub async fn find_by_code(&self, invite_code: &str) -> Result<Option<AccountInvite>, StoreError> {
        let rows = self
            .store
            .select(
                ACCOUNT_INVITES,
                &Query::new().eq("invite_code", invite_code).limit(1),
            )
            .await?;
        rows.into_iter().next().map(decode).transpose()
    }

    /// Applica `data` solo se l'invito è ancora aperto. `None` se un'altra
    /// richiesta lo ha già chiuso, revocato o se non esiste.
    pub async fn claim_open(
        &self,
        id: &str,
        data: &UpdateInviteDTO,
    ) -> Result<Option<AccountInvite>, StoreError> {
        let mut filters = Filters::new();
        filters.insert("id".to_string(), Value::String(id.to_string()));
        filters.insert("active".to_string(), Value::Bool(true));
        filters.insert("accepted_at".to_string(), Value::Null);
        filters.insert("declined_at".to_string(), Value::Null);

        let rows = self
            .store
            .update_matching(ACCOUNT_INVITES, &filters, encode(data)?)
            .await?;
        rows.into_iter().next().map(decode).transpose()
    }
}

impl Create<AccountInvite, CreateInviteDTO> for InviteRepository {
    async fn create(&self, data: &CreateInviteDTO) -> Result<AccountInvite, StoreError> {
        let saved = self.store.insert(ACCOUNT_INVITES, encode(data)?).await?;
        decode(saved)
    }
}

impl Read<AccountInvite, String> for InviteRepository {
    async fn read(&self, id: &String) -> Result<Option<AccountInvite>, StoreError> {
        self.store
            .get(ACCOUNT_INVITES, id)
            .await?
            .map(decode)
            .transpose()
    }
}

impl Update<AccountInvite, UpdateInviteDTO, String> for InviteRepository {
    async fn update(&self, id: &String, data: &UpdateInviteDTO) -> Result<AccountInvite, StoreError> {
        let saved = self.store.update(ACCOUNT_INVITES, id, encode(data)?).await?;
        decode(saved)
    }
}
