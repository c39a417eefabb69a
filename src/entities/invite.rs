//! AccountInvite entity - Invito condivisibile e revocabile

use super::enums::AccountRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AccountInvite {
    pub id: String,
    pub account_id: String,
    pub inviter_id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: AccountRole,
    pub invite_code: String,
    pub active: bool,
    #[serde(default)]
    pub accepted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub declined_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl AccountInvite {
    /// Un invito è utilizzabile solo se attivo e non ancora accettato o rifiutato
    pub fn is_open(&self) -> bool {
        self.active && self.accepted_at.is_none() && self.declined_at.is_none()
    }
}
