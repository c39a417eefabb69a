//! Services module - Operazioni delle due pagine e relativi handler HTTP
//!
//! Ogni modulo espone due livelli:
//! - operazioni (`&AppState` + contesto) usate sia dagli handler che dalle pagine
//! - handler axum che le espongono come endpoint

pub mod account;
pub mod category;
pub mod invite;
pub mod membership;

// Re-exports per facilitare l'import
pub use account::{
    get_account, list_my_accounts, load_account_page, rename_account, update_account_name,
    upload_account_logo, upload_logo,
};
pub use category::{
    count_messages_by_category, list_message_categories, load_messages_page, rename_category,
    update_category_name,
};
pub use invite::{
    accept_invite, create_invite, decline_invite, generate_invite_code, post_accept_invite,
    post_decline_invite, post_invite, post_revoke_invite, revoke_invite,
};
pub use membership::{change_member_role, delete_member, remove_member, update_member_role};

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}

/// Nome ripulito dagli spazi; `None` se resta vuoto
pub fn normalize_name(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
