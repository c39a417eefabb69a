//! Message entity - Messaggio importato da un'integrazione esterna

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub account_id: String,
    #[serde(default)]
    pub category_id: Option<String>,
}
