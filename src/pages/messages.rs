//! MessagesPage - stato locale della pagina categorie di messaggi

use crate::core::{AccountContext, AppState};
use crate::dtos::{CategoryDTO, MessagesPageDTO};
use crate::services::{self, normalize_name};
use std::sync::Arc;
use tracing::debug;

/// Modale di rinomina. Possiede i propri campi modificabili: ogni modifica
/// passa da un suo metodo, così input ed errori sono sempre visibili.
#[derive(Debug, Clone, PartialEq)]
pub struct RenameCategoryModal {
    category_id: String,
    name: String,
    saving: bool,
    error: Option<String>,
}

impl RenameCategoryModal {
    pub fn new(category: &CategoryDTO) -> Self {
        Self {
            category_id: category.id.clone(),
            name: category.name.clone(),
            saving: false,
            error: None,
        }
    }

    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn saving(&self) -> bool {
        self.saving
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
        self.error = None;
    }

    /// Salva il nuovo nome. Un nome vuoto resta un errore locale, senza chiamate al backend.
    pub async fn save(&mut self, state: &AppState, ctx: &AccountContext) -> Option<CategoryDTO> {
        if normalize_name(&self.name).is_none() {
            self.error = Some("Category name cannot be empty".to_string());
            return None;
        }

        self.saving = true;
        self.error = None;
        let result = services::rename_category(state, ctx, &self.category_id, &self.name).await;
        self.saving = false;

        match result {
            Ok(category) => Some(category),
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }
}

pub struct MessagesPage {
    state: Arc<AppState>,
    ctx: AccountContext,
    pub snapshot: Option<MessagesPageDTO>,
    pub error: Option<String>,
    pub rename_modal: Option<RenameCategoryModal>,
}

impl MessagesPage {
    pub fn new(state: Arc<AppState>, ctx: AccountContext) -> Self {
        Self {
            state,
            ctx,
            snapshot: None,
            error: None,
            rename_modal: None,
        }
    }

    pub async fn open(state: Arc<AppState>, ctx: AccountContext) -> Self {
        let mut page = Self::new(state, ctx);
        page.refresh().await;
        page
    }

    pub async fn refresh(&mut self) {
        match services::load_messages_page(&self.state, &self.ctx).await {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn categories(&self) -> &[CategoryDTO] {
        self.snapshot
            .as_ref()
            .map(|s| s.categories.as_slice())
            .unwrap_or_default()
    }

    /// Testo dello stato vuoto, se non ci sono categorie
    pub fn empty_state(&self) -> Option<&str> {
        self.snapshot.as_ref().and_then(|s| s.empty_state.as_deref())
    }

    pub fn open_rename(&mut self, category_id: &str) -> bool {
        let Some(modal) = self
            .categories()
            .iter()
            .find(|c| c.id == category_id)
            .map(RenameCategoryModal::new)
        else {
            return false;
        };
        self.rename_modal = Some(modal);
        true
    }

    pub fn close_rename(&mut self) {
        self.rename_modal = None;
    }

    /// Salva la modale aperta; se riesce la chiude e rilegge le categorie
    pub async fn save_rename(&mut self) -> bool {
        let Some(modal) = self.rename_modal.as_mut() else {
            return false;
        };

        match modal.save(&self.state, &self.ctx).await {
            Some(category) => {
                debug!("Category {} renamed", category.id);
                self.rename_modal = None;
                self.refresh().await;
                true
            }
            None => false,
        }
    }
}
