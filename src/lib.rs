//! Account hub library - espone i moduli principali per il binario e per i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod pages;
pub mod repositories;
pub mod services;
pub mod storage;
pub mod store;

// Re-export dei tipi principali per facilitare l'import
pub use crate::core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, patch, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/me", configure_me_routes(state.clone()))
        .nest("/accounts", configure_account_routes(state.clone()))
        .nest("/account-invites", configure_invite_response_routes(state.clone()))
        .layer(cors_layer(&state.app_origin))
        .with_state(state)
}

/// CORS limitato all'origine dell'applicazione web
fn cors_layer(origin: &str) -> CorsLayer {
    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => {
            tracing::warn!("APP_ORIGIN is not a valid header value, allowing any origin");
            CorsLayer::permissive()
        }
    }
}

/// Routes dell'utente autenticato, senza account nel path
fn configure_me_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/accounts", get(list_my_accounts))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Routes delle due pagine: richiedono autenticazione e membership dell'account
fn configure_account_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::{account_membership_middleware, authentication_middleware};
    use services::*;

    Router::new()
        .route("/{account_id}", get(get_account).patch(update_account_name))
        .route("/{account_id}/logo", put(upload_logo))
        .route(
            "/{account_id}/members/{user_id}/role",
            patch(update_member_role),
        )
        .route("/{account_id}/members/{user_id}", delete(delete_member))
        .route("/{account_id}/invites", post(post_invite))
        .route(
            "/{account_id}/invites/{invite_id}/revoke",
            post(post_revoke_invite),
        )
        .route(
            "/{account_id}/message-categories",
            get(list_message_categories),
        )
        .route(
            "/{account_id}/message-categories/{category_id}",
            patch(update_category_name),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            account_membership_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Routes di risposta a un invito: l'utente non è ancora membro dell'account
fn configure_invite_response_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/{invite_code}/accept", post(post_accept_invite))
        .route("/{invite_code}/decline", post(post_decline_invite))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}
