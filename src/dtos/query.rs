//! Query DTOs - Data Transfer Objects per query parameters

use serde::{Deserialize, Serialize};

/// Query parameters dell'upload del logo
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct LogoUploadQuery {
    #[serde(default)]
    pub file_name: Option<String>,
}
