use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short URL owned by the account, as returned by `/api/user/urls`.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UrlInfo {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub destination: String,
    pub code: String,
    #[serde(default)]
    pub vanity: Option<String>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub max_views: Option<u64>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl UrlInfo {
    /// The path segment the server routes on: the vanity alias if one was chosen.
    pub fn slug(&self) -> &str {
        match self.vanity.as_deref() {
            Some(v) if !v.is_empty() => v,
            _ => &self.code,
        }
    }
}
