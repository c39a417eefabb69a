//! Application State - Stato globale dell'applicazione
//!
//! Contiene tutti i repository, il client dello storage e la configurazione
//! necessaria per servire le pagine.

use crate::core::access::AccessPolicy;
use crate::core::config::Config;
use crate::repositories::{
    AccountRepository, CategoryRepository, InviteRepository, MembershipRepository,
    MessageRepository, ProfileRepository,
};
use crate::storage::FileStorage;
use crate::store::RecordStore;
use std::sync::Arc;

/// Stato globale dell'applicazione condiviso tra tutte le route e middleware
pub struct AppState {
    /// Repository degli account
    pub accounts: AccountRepository,

    /// Repository delle membership utente-account
    pub memberships: MembershipRepository,

    /// Repository degli inviti
    pub invites: InviteRepository,

    /// Repository delle categorie di messaggi
    pub categories: CategoryRepository,

    /// Repository dei messaggi importati
    pub messages: MessageRepository,

    /// Repository dei profili utente
    pub profiles: ProfileRepository,

    /// Storage dei file (logo, thumbnail)
    pub files: Arc<dyn FileStorage>,

    /// Secret per verificare i token di sessione
    pub jwt_secret: String,

    /// Origine pubblica dell'applicazione, usata negli URL di invito
    pub app_origin: String,

    pub access_policy: AccessPolicy,
}

impl AppState {
    /// Crea una nuova istanza di AppState inizializzando tutti i repository
    /// sullo stesso record store.
    pub fn new(store: Arc<dyn RecordStore>, files: Arc<dyn FileStorage>, config: &Config) -> Self {
        Self {
            accounts: AccountRepository::new(store.clone()),
            memberships: MembershipRepository::new(store.clone()),
            invites: InviteRepository::new(store.clone()),
            categories: CategoryRepository::new(store.clone()),
            messages: MessageRepository::new(store.clone()),
            profiles: ProfileRepository::new(store),
            files,
            jwt_secret: config.jwt_secret.clone(),
            app_origin: config.app_origin.trim_end_matches('/').to_string(),
            access_policy: AccessPolicy {
                standard_members_can_invite: config.standard_members_can_invite,
            },
        }
    }
}
