//! MessageCategory entity - Raggruppamento di messaggi importati

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageCategory {
    pub id: String,
    pub account_id: String,
    pub name: String,
    #[serde(default)]
    pub thumbnail_path: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
