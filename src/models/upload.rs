use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to upload: inline text, or a local file.
#[derive(Debug, Clone)]
pub enum UploadContent {
    Text(String),
    File { path: PathBuf, force_image: bool },
}

/// Request modifiers sent as `x-zipline-*` headers on upload.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    pub deletes_at: Option<String>,
    pub password: Option<String>,
    pub max_views: Option<u32>,
    pub folder: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct UploadResult {
    pub url: String,
    pub id: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub files: Vec<UploadResult>,
}

#[derive(Debug, Clone, Default)]
pub struct ShortenUrlOptions {
    pub vanity: Option<String>,
    pub password: Option<String>,
    pub max_views: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ShortenUrlRequest<'a> {
    pub destination: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vanity: Option<&'a str>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ShortenUrlResult {
    pub url: String,
    pub code: String,
    pub destination: String,
}
