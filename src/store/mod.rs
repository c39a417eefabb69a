//! Record store - client generico verso il backend-as-a-service
//!
//! Ogni record è un oggetto JSON identificato da un tipo (la "tabella") e da un `id`.
//! Le query supportano solo filtri di uguaglianza, ordinamento e paginazione:
//! è tutto quello che serve alle due pagine.

pub mod memory;
pub mod rest;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

pub use memory::MemoryRecordStore;
pub use rest::RestRecordStore;

// ********************* IDENTIFICATORI DEI TIPI DI RECORD **********************//

pub const ACCOUNTS: &str = "accounts";
pub const ACCOUNT_MEMBERSHIPS: &str = "account_memberships";
pub const ACCOUNT_INVITES: &str = "account_invites";
pub const MESSAGE_CATEGORIES: &str = "message_categories";
pub const MESSAGES: &str = "messages";
pub const PROFILES: &str = "profiles";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("conflicting record: {0}")]
    Conflict(String),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("backend rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Filtri di uguaglianza campo -> valore. `Value::Null` corrisponde a "campo assente o nullo".
pub type Filters = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub field: String,
    pub ascending: bool,
}

/// Query su un tipo di record: filtri più opzioni di ordinamento e paginazione
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Filters,
    pub order: Option<Order>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(Order {
            field: field.into(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Contratto del record store esterno.
///
/// Tutte le operazioni sono parametrizzate dal tipo di record (`table`).
/// `update` riceve un payload parziale: solo i campi presenti vengono modificati.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Elenca i record che soddisfano la query
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, StoreError>;

    /// Legge un record per id
    async fn get(&self, table: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Inserisce un record e restituisce la rappresentazione salvata (con `id` assegnato)
    async fn insert(&self, table: &str, record: Value) -> Result<Value, StoreError>;

    /// Aggiorna parzialmente un record; `StoreError::NotFound` se non esiste
    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<Value, StoreError>;

    /// Aggiorna solo i record che soddisfano ancora i filtri e li restituisce.
    /// Filtro e modifica avvengono in un'unica operazione: un vettore vuoto
    /// significa che nessun record era nello stato atteso.
    async fn update_matching(
        &self,
        table: &str,
        filters: &Filters,
        patch: Value,
    ) -> Result<Vec<Value>, StoreError>;

    /// Cancella i record che soddisfano i filtri e restituisce quanti ne sono stati rimossi
    async fn delete(&self, table: &str, filters: &Filters) -> Result<u64, StoreError>;
}
