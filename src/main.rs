use account_hub::config::{Config, StoreBackend};
use account_hub::storage::{FileStorage, MemoryFileStorage, RestFileStorage};
use account_hub::store::{MemoryRecordStore, RecordStore, RestRecordStore};
use account_hub::{AppState, create_router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Inizializza la configurazione
    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;
    config.print_info();

    let (store, files): (Arc<dyn RecordStore>, Arc<dyn FileStorage>) = match config.store_backend {
        StoreBackend::Rest => {
            let client = reqwest::Client::new();
            (
                Arc::new(RestRecordStore::new(
                    client.clone(),
                    &config.backend_url,
                    &config.backend_service_key,
                )),
                Arc::new(RestFileStorage::new(
                    client,
                    &config.backend_url,
                    &config.backend_service_key,
                    &config.storage_bucket,
                    config.signed_url_ttl_secs,
                )),
            )
        }
        StoreBackend::Memory => {
            info!("Using in-memory record store, data is lost on shutdown");
            (
                Arc::new(MemoryRecordStore::new()),
                Arc::new(MemoryFileStorage::new(format!(
                    "{}/files",
                    config.app_origin.trim_end_matches('/')
                ))),
            )
        }
    };

    let state = Arc::new(AppState::new(store, files, &config));
    let app = create_router(state);

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
