use dotenv::dotenv;
use std::env;
use tracing::{info, warn};

const DEFAULT_JWT_SECRET: &str = "un segreto meno bello";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Backend-as-a-service via HTTP
    Rest,
    /// Record e file in memoria, per sviluppo locale
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub backend_url: String,
    pub backend_service_key: String,
    pub storage_bucket: String,
    pub signed_url_ttl_secs: u64,
    pub jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
    pub app_origin: String,
    pub standard_members_can_invite: bool,
    pub app_env: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_backend: StoreBackend::Memory,
            backend_url: String::new(),
            backend_service_key: String::new(),
            storage_bucket: "account-assets".to_string(),
            signed_url_ttl_secs: 3600,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
            app_origin: "http://localhost:3000".to_string(),
            standard_members_can_invite: false,
            app_env: "development".to_string(),
        }
    }
}

impl Config {
    /// Carica la configurazione dalle variabili d'ambiente
    /// Chiama dotenv() automaticamente
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();

        let store_backend = match env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "rest".to_string())
            .to_lowercase()
            .as_str()
        {
            "rest" => StoreBackend::Rest,
            "memory" => StoreBackend::Memory,
            other => {
                return Err(format!(
                    "Invalid STORE_BACKEND '{}': must be 'rest' or 'memory'",
                    other
                ));
            }
        };

        let (backend_url, backend_service_key) = match store_backend {
            StoreBackend::Rest => (
                env::var("BACKEND_URL")
                    .map_err(|_| "BACKEND_URL must be set in .env file".to_string())?,
                env::var("BACKEND_SERVICE_KEY")
                    .map_err(|_| "BACKEND_SERVICE_KEY must be set in .env file".to_string())?,
            ),
            StoreBackend::Memory => (
                env::var("BACKEND_URL").unwrap_or_default(),
                env::var("BACKEND_SERVICE_KEY").unwrap_or_default(),
            ),
        };

        let storage_bucket =
            env::var("STORAGE_BUCKET").unwrap_or_else(|_| "account-assets".to_string());

        let signed_url_ttl_secs = env::var("SIGNED_URL_TTL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse::<u64>()
            .map_err(|_| "Invalid SIGNED_URL_TTL_SECS: must be a positive number".to_string())?;

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using default (not secure for production!)");
            DEFAULT_JWT_SECRET.to_string()
        });

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| "Invalid SERVER_PORT: must be a number between 0-65535".to_string())?;

        let app_origin = env::var("APP_ORIGIN")
            .unwrap_or_else(|_| format!("http://localhost:{}", server_port))
            .trim_end_matches('/')
            .to_string();

        let standard_members_can_invite = match env::var("STANDARD_MEMBERS_CAN_INVITE") {
            Ok(value) => value
                .parse::<bool>()
                .map_err(|_| "Invalid STANDARD_MEMBERS_CAN_INVITE: must be true or false".to_string())?,
            Err(_) => false,
        };

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            store_backend,
            backend_url,
            backend_service_key,
            storage_bucket,
            signed_url_ttl_secs,
            jwt_secret,
            server_host,
            server_port,
            app_origin,
            standard_members_can_invite,
            app_env,
        })
    }

    /// Logga la configurazione (nascondendo i segreti)
    pub fn print_info(&self) {
        info!("Server configuration:");
        info!("   Environment: {}", self.app_env);
        info!("   Server Address: {}:{}", self.server_host, self.server_port);
        info!("   App Origin: {}", self.app_origin);
        info!("   Store Backend: {:?}", self.store_backend);
        if self.store_backend == StoreBackend::Rest {
            info!("   Backend URL: {}", Self::mask_url(&self.backend_url));
            info!("   Storage Bucket: {}", self.storage_bucket);
        }
        info!("   Standard members can invite: {}", self.standard_members_can_invite);
        if self.jwt_secret == DEFAULT_JWT_SECRET {
            warn!("   JWT Secret: USING DEFAULT (INSECURE!)");
        } else {
            info!("   JWT Secret: custom secret configured");
        }
    }

    /// Maschera le credenziali eventualmente presenti nell'URL
    fn mask_url(url: &str) -> String {
        if let Some(at_pos) = url.find('@') {
            if let Some(scheme_end) = url.find("://") {
                let scheme = &url[..scheme_end + 3];
                let after_at = &url[at_pos..];
                return format!("{}***{}", scheme, after_at);
            }
        }
        url.to_string()
    }
}
