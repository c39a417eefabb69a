//! Repositories module - Coordinatore per tutti i repository del progetto
//!
//! Ogni repository traduce le operazioni su una specifica entità in chiamate
//! al record store generico (tipo di record + filtri) e decodifica i record JSON.

pub mod account;
pub mod category;
pub mod invite;
pub mod membership;
pub mod message;
pub mod profile;
pub mod traits;

// Re-esportazione dei trait per facilitare l'import
pub use traits::{Create, Delete, Read, Update};

// Re-esportazione delle struct dei repository per facilitare l'import
pub use account::AccountRepository;
pub use category::CategoryRepository;
pub use invite::InviteRepository;
pub use membership::MembershipRepository;
pub use message::MessageRepository;
pub use profile::ProfileRepository;

use crate::store::StoreError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub(crate) fn decode<T: DeserializeOwned>(record: Value) -> Result<T, StoreError> {
    Ok(serde_json::from_value(record)?)
}

pub(crate) fn decode_all<T: DeserializeOwned>(records: Vec<Value>) -> Result<Vec<T>, StoreError> {
    records.into_iter().map(decode).collect()
}

pub(crate) fn encode<T: Serialize>(data: &T) -> Result<Value, StoreError> {
    Ok(serde_json::to_value(data)?)
}
