#![allow(dead_code)]

use account_hub::config::Config;
use account_hub::core::{AccessPolicy, AccountContext, AppState, encode_session_token};
use account_hub::entities::{AccountMembership, AccountRole};
use account_hub::storage::MemoryFileStorage;
use account_hub::store::{
    ACCOUNT_INVITES, ACCOUNT_MEMBERSHIPS, ACCOUNTS, MESSAGE_CATEGORIES, MESSAGES,
    MemoryRecordStore, PROFILES,
};
use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;

pub const JWT_SECRET: &str = "ilmiobellissimosegretochevaassolutamentecambiato";
pub const APP_ORIGIN: &str = "https://app.example.com";

pub const ACCOUNT_ID: &str = "acc-1";
/// Account senza categorie di messaggi, di cui solo alice è membro
pub const EMPTY_ACCOUNT_ID: &str = "acc-2";

pub const ALICE: &str = "user-alice"; // admin
pub const BOB: &str = "user-bob"; // standard
pub const CAROL: &str = "user-carol"; // guest
pub const DAVE: &str = "user-dave"; // nessuna membership
pub const EVE: &str = "user-eve"; // nessuna membership, nessun profilo

pub const OPEN_INVITE_CODE: &str = "0123456789abcdef0123456789abcdef";
pub const REVOKED_INVITE_CODE: &str = "fedcba9876543210fedcba9876543210";

/// Backend in memoria condiviso tra AppState e asserzioni del test
pub struct TestBackend {
    pub store: Arc<MemoryRecordStore>,
    pub files: Arc<MemoryFileStorage>,
    pub state: Arc<AppState>,
}

/// Popola lo store con i dati usati da tutti i test
pub fn seed(store: &MemoryRecordStore) {
    store.seed(
        ACCOUNTS,
        vec![
            json!({"id": ACCOUNT_ID, "name": "Acme Inc", "logo_path": null}),
            json!({"id": EMPTY_ACCOUNT_ID, "name": "Empty Co", "logo_path": null}),
        ],
    );
    store.seed(
        ACCOUNT_MEMBERSHIPS,
        vec![
            json!({"id": "m-alice", "account_id": ACCOUNT_ID, "user_id": ALICE, "role": "admin", "created_at": "2024-01-01T10:00:00Z"}),
            json!({"id": "m-bob", "account_id": ACCOUNT_ID, "user_id": BOB, "role": "standard", "created_at": "2024-01-02T10:00:00Z"}),
            json!({"id": "m-carol", "account_id": ACCOUNT_ID, "user_id": CAROL, "role": "guest", "created_at": "2024-01-03T10:00:00Z"}),
            json!({"id": "m-alice-2", "account_id": EMPTY_ACCOUNT_ID, "user_id": ALICE, "role": "admin", "created_at": "2024-02-01T10:00:00Z"}),
        ],
    );
    store.seed(
        PROFILES,
        vec![
            json!({"id": ALICE, "email": "alice@example.com", "full_name": "Alice Rossi"}),
            json!({"id": BOB, "email": "bob@example.com", "full_name": null}),
            json!({"id": DAVE, "email": "dave@example.com", "full_name": "Dave Bianchi"}),
        ],
    );
    store.seed(
        ACCOUNT_INVITES,
        vec![
            json!({
                "id": "inv-open", "account_id": ACCOUNT_ID, "inviter_id": ALICE,
                "email": "dave@example.com", "role": "standard",
                "invite_code": OPEN_INVITE_CODE, "active": true,
                "created_at": "2024-03-01T10:00:00Z"
            }),
            json!({
                "id": "inv-revoked", "account_id": ACCOUNT_ID, "inviter_id": ALICE,
                "email": null, "role": "guest",
                "invite_code": REVOKED_INVITE_CODE, "active": false,
                "created_at": "2024-02-01T10:00:00Z"
            }),
        ],
    );
    store.seed(
        MESSAGE_CATEGORIES,
        vec![
            json!({"id": "cat-a", "account_id": ACCOUNT_ID, "name": "Support", "thumbnail_path": "accounts/acc-1/thumbs/a.png", "created_at": "2024-01-05T10:00:00Z"}),
            json!({"id": "cat-b", "account_id": ACCOUNT_ID, "name": "Billing", "thumbnail_path": null, "created_at": "2024-01-06T10:00:00Z"}),
        ],
    );
    store.seed(
        MESSAGES,
        vec![
            json!({"id": "msg-1", "account_id": ACCOUNT_ID, "category_id": "cat-a"}),
            json!({"id": "msg-2", "account_id": ACCOUNT_ID, "category_id": "cat-a"}),
            json!({"id": "msg-3", "account_id": ACCOUNT_ID, "category_id": "cat-b"}),
            json!({"id": "msg-4", "account_id": ACCOUNT_ID, "category_id": null}),
        ],
    );
}

pub fn test_config() -> Config {
    Config {
        jwt_secret: JWT_SECRET.to_string(),
        app_origin: APP_ORIGIN.to_string(),
        ..Config::default()
    }
}

/// Crea un backend in memoria già popolato con la configurazione di test
pub async fn create_test_backend() -> TestBackend {
    create_test_backend_with(test_config()).await
}

pub async fn create_test_backend_with(config: Config) -> TestBackend {
    let store = Arc::new(MemoryRecordStore::new());
    seed(&store);
    let files = Arc::new(MemoryFileStorage::new(format!("{}/files", APP_ORIGIN)));
    seed_files(&files).await;
    let state = Arc::new(AppState::new(store.clone(), files.clone(), &config));
    TestBackend {
        store,
        files,
        state,
    }
}

async fn seed_files(files: &MemoryFileStorage) {
    use account_hub::storage::{FileStorage, UploadOptions};
    files
        .upload(
            "accounts/acc-1/thumbs/a.png",
            vec![1, 2, 3],
            &UploadOptions {
                content_type: "image/png".to_string(),
                upsert: true,
            },
        )
        .await
        .expect("Failed to seed thumbnail");
}

/// Crea un TestServer per i test
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = account_hub::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Genera un token di sessione valido 24 ore per l'utente
pub fn create_test_jwt(user_id: &str) -> String {
    encode_session_token(user_id, None, JWT_SECRET).expect("Failed to create JWT token")
}

pub fn bearer(user_id: &str) -> String {
    format!("Bearer {}", create_test_jwt(user_id))
}

/// Come `bearer`, con l'email della sessione nel token
pub fn bearer_with_email(user_id: &str, email: &str) -> String {
    let token = encode_session_token(user_id, Some(email), JWT_SECRET)
        .expect("Failed to create JWT token");
    format!("Bearer {}", token)
}

/// Contesto di account costruito a mano, per usare i servizi e le pagine senza HTTP
pub fn account_context(user_id: &str, role: AccountRole) -> AccountContext {
    AccountContext::new(
        AccountMembership {
            id: format!("m-{}", user_id),
            account_id: ACCOUNT_ID.to_string(),
            user_id: user_id.to_string(),
            role,
            created_at: None,
        },
        &AccessPolicy::default(),
    )
}
