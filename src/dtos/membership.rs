//! Membership DTOs - Data Transfer Objects per membri dell'account

use crate::entities::{AccountMembership, AccountRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Un membro come mostrato nella lista della pagina account
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MemberDTO {
    pub membership_id: String,
    pub user_id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: AccountRole,
    pub member_since: Option<DateTime<Utc>>,
    pub is_self: bool,
    pub can_change_role: bool,
    pub can_remove: bool,
}

impl From<AccountMembership> for MemberDTO {
    fn from(value: AccountMembership) -> Self {
        Self {
            membership_id: value.id,
            user_id: value.user_id,
            email: None, // popolati dal profilo
            full_name: None,
            role: value.role,
            member_since: value.created_at,
            is_self: false,
            can_change_role: false,
            can_remove: false,
        }
    }
}

/// DTO per creare una nuova membership (senza id e created_at)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateMembershipDTO {
    pub account_id: String,
    pub user_id: String,
    pub role: AccountRole,
}

/// DTO per aggiornare una membership (solo il ruolo è modificabile)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateMembershipDTO {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<AccountRole>,
}
