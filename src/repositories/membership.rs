//! MembershipRepository - Repository per le membership utente-account

use super::{Create, Delete, Read, Update, decode, decode_all, encode};
use crate::dtos::{CreateMembershipDTO, UpdateMembershipDTO};
use crate::entities::AccountMembership;
use crate::store::{ACCOUNT_MEMBERSHIPS, Filters, Query, RecordStore, StoreError};
use serde_json::Value;
use std::sync::Arc;

pub struct MembershipRepository {
    store: Arc<dyn RecordStore>,
}

impl MembershipRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Tutte le membership di un account, dalla più vecchia
    pub async fn find_many_by_account_id(
        &self,
        account_id: &str,
    ) -> Result<Vec<AccountMembership>, StoreError> {
        let rows = self
            .store
            .select(
                ACCOUNT_MEMBERSHIPS,
                &Query::new()
                    .eq("account_id", account_id)
                    .order_by("created_at", true),
            )
            .await?;
        decode_all(rows)
    }

    /// Tutte le membership di un utente
    pub async fn find_many_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Vec<AccountMembership>, StoreError> {
        let rows = self
            .store
            .select(
                ACCOUNT_MEMBERSHIPS,
                &Query::new()
                    .eq("user_id", user_id)
                    .order_by("created_at", true),
            )
            .await?;
        decode_all(rows)
    }

    pub async fn find_by_account_and_user(
        &self,
        account_id: &str,
        user_id: &str,
    ) -> Result<Option<AccountMembership>, StoreError> {
        let rows = self
            .store
            .select(
                ACCOUNT_MEMBERSHIPS,
                &Query::new()
                    .eq("account_id", account_id)
                    .eq("user_id", user_id)
                    .limit(1),
            )
            .await?;
        rows.into_iter().next().map(decode).transpose()
    }
}

impl Create<AccountMembership, CreateMembershipDTO> for MembershipRepository {
    async fn create(&self, data: &CreateMembershipDTO) -> Result<AccountMembership, StoreError> {
        let saved = self.store.insert(ACCOUNT_MEMBERSHIPS, encode(data)?).await?;
        decode(saved)
    }
}

impl Read<AccountMembership, String> for MembershipRepository {
    async fn read(&self, id: &String) -> Result<Option<AccountMembership>, StoreError> {
        self.store
            .get(ACCOUNT_MEMBERSHIPS, id)
            .await?
            .map(decode)
            .transpose()
    }
}

impl Update<AccountMembership, UpdateMembershipDTO, String> for MembershipRepository {
    async fn update(
        &self,
        id: &String,
        data: &UpdateMembershipDTO,
    ) -> Result<AccountMembership, StoreError> {
        let saved = self
            .store
            .update(ACCOUNT_MEMBERSHIPS, id, encode(data)?)
            .await?;
        decode(saved)
    }
}

impl Delete<String> for MembershipRepository {
    async fn delete(&self, id: &String) -> Result<(), StoreError> {
        let mut filters = Filters::new();
        filters.insert("id".to_string(), Value::String(id.clone()));
        self.store.delete(ACCOUNT_MEMBERSHIPS, &filters).await?;
        Ok(())
    }
}
