use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A file stored on the server, as returned by `/api/user/files`.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub deletes_at: Option<DateTime<Utc>>,
    pub name: String,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(rename = "type")]
    pub mime_type: String,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub max_views: Option<u64>,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub password: Option<bool>,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub url: String,
}

impl FileInfo {
    pub fn is_password_protected(&self) -> bool {
        self.password.unwrap_or(false)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Thumbnail {
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

/// One page of the paginated file listing.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FilePage {
    pub page: Vec<FileInfo>,
    pub total: u64,
    pub pages: u64,
}

/// A file together with its best-effort text preview.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RichFileInfo {
    pub file_info: FileInfo,
    pub file_content: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct RichPage {
    pub items: Vec<RichFileInfo>,
    pub page: u64,
    pub pages: u64,
    pub total: u64,
}

impl RichPage {
    pub fn has_more(&self) -> bool {
        self.page < self.pages
    }
}
