//! AccountMembership entity - Legame utente-account con ruolo

use super::enums::AccountRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AccountMembership {
    pub id: String,
    pub account_id: String,
    pub user_id: String,
    pub role: AccountRole,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
