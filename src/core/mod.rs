//! Core Module - Componenti infrastrutturali dell'applicazione
//!
//! Questo modulo contiene tutti i componenti "core" dell'applicazione:
//! - Autenticazione della sessione e membership dell'account
//! - Risoluzione ruolo -> capacità
//! - Configurazione
//! - Gestione errori
//! - Stato applicazione

pub mod access;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;

// Re-exports per facilitare l'import
pub use access::{AccessPolicy, AccountContext, Capabilities, Capability, require_capability};
pub use auth::{
    Claims, Session, account_membership_middleware, authentication_middleware,
    decode_session_token, encode_session_token,
};
pub use config::{Config, StoreBackend};
pub use error::AppError;
pub use state::AppState;
