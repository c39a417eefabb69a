//! Account DTOs - Data Transfer Objects per la pagina account

use crate::core::Capabilities;
use crate::dtos::{InviteDTO, MemberDTO};
use crate::entities::{Account, AccountRole};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Account come mostrato dalla pagina, con il logo già risolto in URL
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AccountDTO {
    pub id: String,
    pub name: String,
    pub logo_path: Option<String>,
    pub logo_url: Option<String>,
}

impl From<Account> for AccountDTO {
    fn from(value: Account) -> Self {
        Self {
            id: value.id,
            name: value.name,
            logo_path: value.logo_path,
            logo_url: None, // va risolto tramite lo storage
        }
    }
}

/// Body della richiesta di rinomina
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct RenameAccountDTO {
    #[validate(length(max = 100, message = "Account name must be at most 100 characters"))]
    pub name: String,
}

/// DTO per aggiornare un account (solo i campi `Some` vengono inviati)
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UpdateAccountDTO {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_path: Option<String>,
}

/// Snapshot completo della pagina account
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AccountPageDTO {
    pub account: AccountDTO,
    pub my_role: AccountRole,
    pub capabilities: Capabilities,
    pub members: Vec<MemberDTO>,
    pub invites: Vec<InviteDTO>,
}

/// Una voce di "i miei account"
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MyAccountDTO {
    pub account_id: String,
    pub name: Option<String>,
    pub role: AccountRole,
}
