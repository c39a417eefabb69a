//! Invite DTOs - Data Transfer Objects per inviti

use crate::entities::{AccountInvite, AccountRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Invito come mostrato dalla pagina, con l'URL condivisibile.
///
/// Codice e URL bastano per entrare nell'account: sono `None` per chi
/// non può gestire gli inviti.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InviteDTO {
    pub id: String,
    pub email: Option<String>,
    pub role: AccountRole,
    pub invite_code: Option<String>,
    pub active: bool,
    pub url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl InviteDTO {
    pub fn from_invite(value: AccountInvite, origin: &str) -> Self {
        Self {
            url: Some(invite_url(origin, &value.invite_code)),
            id: value.id,
            email: value.email,
            role: value.role,
            invite_code: Some(value.invite_code),
            active: value.active,
            created_at: value.created_at,
        }
    }

    /// Toglie codice e URL
    pub fn redacted(self) -> Self {
        Self {
            invite_code: None,
            url: None,
            ..self
        }
    }
}

/// `{origin}/accept-account-invite/{code}`
pub fn invite_url(origin: &str, invite_code: &str) -> String {
    format!(
        "{}/accept-account-invite/{}",
        origin.trim_end_matches('/'),
        invite_code
    )
}

/// Body della richiesta di creazione invito
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateInviteRequestDTO {
    #[serde(default)]
    #[validate(email(message = "Invite email is not a valid address"))]
    pub email: Option<String>,
    pub role: AccountRole,
}

/// DTO per creare un nuovo invito (senza id e timestamp)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateInviteDTO {
    pub account_id: String,
    pub inviter_id: String,
    pub email: Option<String>,
    pub role: AccountRole,
    pub invite_code: String,
    pub active: bool,
}

/// DTO per aggiornare un invito (stato e timestamp di risposta)
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UpdateInviteDTO {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declined_at: Option<DateTime<Utc>>,
}
