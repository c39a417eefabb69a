//! Entities module - Entità del dominio applicativo
//!
//! Questo modulo contiene i record letti e scritti tramite il record store esterno.
//! Ogni entity corrisponde a un tipo di record del backend.

pub mod account;
pub mod category;
pub mod enums;
pub mod invite;
pub mod membership;
pub mod message;
pub mod profile;

// Re-exports per facilitare l'import
pub use account::Account;
pub use category::MessageCategory;
pub use enums::AccountRole;
pub use invite::AccountInvite;
pub use membership::AccountMembership;
pub use message::Message;
pub use profile::Profile;
