//! Local helpers: screenshot discovery, text/binary sniffing, MIME checks and
//! small URL/markdown builders.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::models::url::UrlInfo;

pub const DEFAULT_SAMPLE_SIZE: usize = 512;
pub const PREVIEW_CHARACTERS: usize = 10_000;
pub const BINARY_PREVIEW: &str = "## Can't display binary file";

const MD_SUPPORTED_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".bmp", ".ico", ".tiff", ".csv", ".pdf",
];

const NON_BINARY_MIME_TYPES: &[&str] = &[
    "application/javascript",
    "application/json",
    "application/xml",
    "application/rss+xml",
    "application/atom+xml",
    "application/xslt+xml",
    "application/x-yaml",
    "application/x-perl",
    "application/x-ruby",
    "application/x-shellscript",
];

/// A file in the screenshot directory.
#[derive(Debug, Clone, Serialize)]
pub struct Screenshot {
    pub file: String,
    pub path: PathBuf,
    pub last_modified_at: DateTime<Local>,
}

/// Whether a MIME type can be previewed as text.
pub fn is_displayable_mime_type(mime_type: &str) -> bool {
    let lower = mime_type.to_lowercase();
    lower.starts_with("text/") || NON_BINARY_MIME_TYPES.contains(&lower.as_str())
}

/// Whether the path ends in an extension a markdown preview can render.
pub fn contains_md_supported_extension(path: &str) -> bool {
    match path.rfind('.') {
        Some(idx) if idx + 1 < path.len() => {
            let extension = path[idx..].to_lowercase();
            MD_SUPPORTED_EXTENSIONS.contains(&extension.as_str())
        }
        _ => false,
    }
}

pub fn create_markdown_image(url: &str) -> String {
    format!("![Image Preview]({}?raycast-height=350)", url)
}

/// List regular, non-hidden files in `dir`, newest first. Symlinks are
/// followed; entries that cannot be inspected are skipped.
pub fn get_screenshots(dir: &Path) -> Result<Vec<Screenshot>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read screenshot directory {}", dir.display()))?;

    let mut screenshots = Vec::new();
    for entry in entries.flatten() {
        let file = entry.file_name().to_string_lossy().into_owned();
        if file.starts_with('.') {
            continue;
        }

        let path = entry.path();
        let modified = std::fs::metadata(&path).and_then(|metadata| {
            if metadata.is_file() {
                metadata.modified().map(Some)
            } else {
                Ok(None)
            }
        });

        match modified {
            Ok(Some(modified)) => screenshots.push(Screenshot {
                file,
                path,
                last_modified_at: modified.into(),
            }),
            Ok(None) => {}
            Err(e) => tracing::debug!("skipping {}: {}", path.display(), e),
        }
    }

    screenshots.sort_by(|a, b| b.last_modified_at.cmp(&a.last_modified_at));
    Ok(screenshots)
}

fn read_sample(path: &Path, sample_size: usize) -> std::io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut buffer = Vec::with_capacity(sample_size);
    file.take(sample_size as u64).read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Sniff the first `sample_size` bytes for control characters other than
/// tab, LF and CR. Unreadable files count as binary.
pub fn is_text_file(path: &Path, sample_size: usize) -> bool {
    match read_sample(path, sample_size) {
        Ok(sample) => sample
            .iter()
            .all(|&byte| byte >= 0x20 || matches!(byte, 0x09 | 0x0a | 0x0d)),
        Err(e) => {
            tracing::debug!("could not sniff {}: {}", path.display(), e);
            false
        }
    }
}

/// The first `sample_size` bytes of a file as (lossy) UTF-8, or "" on error.
pub fn read_first_characters(path: &Path, sample_size: usize) -> String {
    match read_sample(path, sample_size) {
        Ok(sample) => String::from_utf8_lossy(&sample).into_owned(),
        Err(e) => {
            tracing::debug!("could not read {}: {}", path.display(), e);
            String::new()
        }
    }
}

/// Percent-encode each segment of a path, keeping the separators.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// Markdown preview for a local file.
pub fn preview_for_path(path: &Path) -> String {
    let display = path.to_string_lossy();
    if contains_md_supported_extension(&display) {
        create_markdown_image(&encode_path(&display))
    } else if is_text_file(path, DEFAULT_SAMPLE_SIZE) {
        read_first_characters(path, PREVIEW_CHARACTERS)
    } else {
        BINARY_PREVIEW.to_string()
    }
}

/// Raw-content URL for a file path as returned by the server (`/u/x` → `/raw/x`).
pub fn raw_url(base_url: &str, file_url: &str) -> String {
    format!("{}{}", base_url, file_url).replace("/u/", "/raw/")
}

/// Full URL for a file path as returned by the server.
pub fn file_url(base_url: &str, file_url: &str) -> String {
    format!("{}{}", base_url, file_url)
}

pub fn short_url(base_url: &str, url: &UrlInfo) -> String {
    format!("{}/go/{}", base_url, url.slug())
}

/// `http://` or `https://` followed by at least one non-whitespace character
/// and nothing else.
pub fn is_http_url(text: &str) -> bool {
    let rest = text
        .strip_prefix("https://")
        .or_else(|| text.strip_prefix("http://"));

    match rest {
        Some(rest) => !rest.is_empty() && !rest.chars().any(char::is_whitespace),
        None => false,
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
