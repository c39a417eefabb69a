//! Account entity - Entità account (tenant)

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Account {
    pub id: String,
    pub name: String,
    // path nello storage, non un URL: l'URL va risolto ad ogni lettura
    #[serde(default)]
    pub logo_path: Option<String>,
}
