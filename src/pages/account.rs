//! AccountPage - stato locale della pagina account
//!
//! Tiene lo snapshot letto dal backend, l'editor inline del nome e il messaggio
//! d'errore da mostrare. Ogni operazione che modifica dati rilegge lo snapshot.

use crate::core::{AccountContext, AppState};
use crate::dtos::{AccountPageDTO, CreateInviteRequestDTO, MemberDTO};
use crate::entities::AccountRole;
use crate::services::{self, normalize_name};
use std::sync::Arc;
use tracing::{debug, warn};

/// Destinazione della copia dell'URL di invito
pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<(), String>;
}

/// Editor inline del nome account
#[derive(Debug, Clone, PartialEq)]
pub struct NameEditor {
    pub input: String,
}

pub struct AccountPage {
    state: Arc<AppState>,
    ctx: AccountContext,
    pub snapshot: Option<AccountPageDTO>,
    pub editing: Option<NameEditor>,
    pub saving: bool,
    pub uploading: bool,
    pub error: Option<String>,
    pub last_invite_url: Option<String>,
}

impl AccountPage {
    pub fn new(state: Arc<AppState>, ctx: AccountContext) -> Self {
        Self {
            state,
            ctx,
            snapshot: None,
            editing: None,
            saving: false,
            uploading: false,
            error: None,
            last_invite_url: None,
        }
    }

    /// Crea la pagina e carica il primo snapshot
    pub async fn open(state: Arc<AppState>, ctx: AccountContext) -> Self {
        let mut page = Self::new(state, ctx);
        page.refresh().await;
        page
    }

    pub async fn refresh(&mut self) {
        match services::load_account_page(&self.state, &self.ctx).await {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn members(&self) -> &[MemberDTO] {
        self.snapshot
            .as_ref()
            .map(|s| s.members.as_slice())
            .unwrap_or_default()
    }

    // ********************* EDIT INLINE DEL NOME **********************//

    pub fn begin_edit(&mut self) {
        let current = self
            .snapshot
            .as_ref()
            .map(|s| s.account.name.clone())
            .unwrap_or_default();
        self.editing = Some(NameEditor { input: current });
        self.error = None;
    }

    pub fn set_name_input(&mut self, value: impl Into<String>) {
        if let Some(editor) = self.editing.as_mut() {
            editor.input = value.into();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.error = None;
    }

    /// Salva il nome in modifica. Restituisce `true` se il salvataggio è riuscito.
    pub async fn save_name(&mut self) -> bool {
        let Some(editor) = self.editing.as_ref() else {
            return false;
        };

        if normalize_name(&editor.input).is_none() {
            self.error = Some("Account name cannot be empty".to_string());
            return false;
        }
        let input = editor.input.clone();

        self.saving = true;
        self.error = None;
        let result = services::rename_account(&self.state, &self.ctx, &input).await;
        self.saving = false;

        match result {
            Ok(account) => {
                debug!("Account renamed to {}", account.name);
                self.editing = None;
                self.refresh().await;
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    // ********************* LOGO **********************//

    pub async fn upload_logo(
        &mut self,
        file_name: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> bool {
        self.uploading = true;
        self.error = None;
        let result = services::upload_account_logo(
            &self.state,
            &self.ctx,
            Some(file_name),
            content_type,
            bytes,
        )
        .await;
        self.uploading = false;

        match result {
            Ok(_) => {
                self.refresh().await;
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    // ********************* MEMBRI **********************//

    fn is_self(&self, user_id: &str) -> bool {
        user_id == self.ctx.user_id
    }

    pub async fn change_role(&mut self, user_id: &str, role: AccountRole) -> bool {
        if self.is_self(user_id) {
            self.error = Some("You cannot change your own role".to_string());
            return false;
        }
        self.error = None;
        match services::change_member_role(&self.state, &self.ctx, user_id, role).await {
            Ok(_) => {
                self.refresh().await;
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    pub async fn remove_member(&mut self, user_id: &str) -> bool {
        if self.is_self(user_id) {
            self.error = Some("You cannot remove yourself".to_string());
            return false;
        }
        self.error = None;
        match services::remove_member(&self.state, &self.ctx, user_id).await {
            Ok(()) => {
                self.refresh().await;
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    // ********************* INVITI **********************//

    /// Crea un invito e ne conserva l'URL condivisibile
    pub async fn create_invite(&mut self, email: Option<&str>, role: AccountRole) -> Option<String> {
        self.error = None;
        let request = CreateInviteRequestDTO {
            email: email.map(str::to_string),
            role,
        };
        match services::create_invite(&self.state, &self.ctx, request).await {
            Ok(invite) => {
                self.last_invite_url = invite.url.clone();
                self.refresh().await;
                invite.url
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Revoca un invito; gli errori non vengono mostrati
    pub async fn revoke_invite(&mut self, invite_id: &str) {
        if let Err(e) = services::revoke_invite(&self.state, &self.ctx, invite_id).await {
            warn!("Ignoring failed invite revocation: {}", e);
        }
        self.refresh().await;
    }

    /// Copia l'ultimo URL di invito; un fallimento della clipboard viene ignorato
    pub fn copy_invite_url(&self, clipboard: &dyn Clipboard) {
        if let Some(url) = &self.last_invite_url {
            if let Err(e) = clipboard.write_text(url) {
                debug!("Clipboard copy failed: {}", e);
            }
        }
    }
}
