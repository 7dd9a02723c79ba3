//! Workflows behind the CLI commands: call the API, then hand the result to
//! the dispatcher for clipboard/browser effects.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::api::files::{get_page, get_page_rich};
use crate::api::upload::upload_content;
use crate::api::urls::shorten_url;
use crate::api::ZiplineClient;
use crate::effects::{Dispatcher, Effects};
use crate::local::{get_screenshots, is_http_url};
use crate::models::file::{RichFileInfo, RichPage};
use crate::models::upload::{
    ShortenUrlOptions, ShortenUrlResult, UploadContent, UploadOptions, UploadResult,
};

/// What a quick clipboard upload ended up doing.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum QuickOutcome {
    Uploaded(UploadResult),
    Shortened(ShortenUrlResult),
}

pub async fn upload<E: Effects>(
    client: &ZiplineClient,
    dispatcher: &Dispatcher<E>,
    content: &UploadContent,
    options: &UploadOptions,
) -> Result<UploadResult> {
    let result = upload_content(client, content, options).await?;
    dispatcher.upload_succeeded(&result);
    Ok(result)
}

/// Check a destination before sending it to the server.
pub fn validate_destination(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        anyhow::bail!("URL is required");
    }
    if !is_http_url(url.trim()) {
        anyhow::bail!("URL must start with http:// or https://");
    }
    Ok(())
}

/// The URL to shorten: the one given, or a lone http(s) URL on the clipboard.
pub fn shorten_destination<E: Effects>(
    dispatcher: &Dispatcher<E>,
    url: Option<&str>,
) -> Result<String> {
    if let Some(url) = url {
        return Ok(url.trim().to_string());
    }

    let clipboard = match dispatcher.effects().read_clipboard() {
        Ok(clipboard) => clipboard,
        Err(e) => {
            tracing::debug!("could not read clipboard: {:#}", e);
            Default::default()
        }
    };

    match clipboard.text.as_deref().map(str::trim) {
        Some(text) if is_http_url(text) => Ok(text.to_string()),
        _ => anyhow::bail!("URL is required"),
    }
}

pub async fn shorten<E: Effects>(
    client: &ZiplineClient,
    dispatcher: &Dispatcher<E>,
    destination: &str,
    options: &ShortenUrlOptions,
) -> Result<ShortenUrlResult> {
    let destination = destination.trim();
    validate_destination(destination)?;

    let result = shorten_url(client, destination, options).await?;
    dispatcher.shorten_succeeded(&result);
    Ok(result)
}

/// Images pasted from a screenshot land in a temp file under `/var` whose
/// clipboard text reads like "Image (1024x768)". Those are sent as PNG.
pub fn looks_like_clipboard_image(path: &Path, text: Option<&str>) -> bool {
    path.starts_with("/var") && text.map_or(false, |t| t.contains("Image ("))
}

/// Upload whatever the clipboard holds: a file reference is uploaded as a
/// file, a lone http(s) URL is shortened, any other text is uploaded as text.
pub async fn upload_clipboard<E: Effects>(
    client: &ZiplineClient,
    dispatcher: &Dispatcher<E>,
    force_image: bool,
    options: &UploadOptions,
) -> Result<QuickOutcome> {
    let clipboard = dispatcher.effects().read_clipboard()?;

    if clipboard.is_empty() {
        anyhow::bail!("Clipboard is empty");
    }

    if let Some(path) = clipboard.file {
        let force_image = force_image || looks_like_clipboard_image(&path, clipboard.text.as_deref());
        let content = UploadContent::File { path, force_image };
        let result = upload(client, dispatcher, &content, options).await?;
        return Ok(QuickOutcome::Uploaded(result));
    }

    let text = clipboard.text.unwrap_or_default();
    let text = text.trim();

    if is_http_url(text) {
        let result = shorten(client, dispatcher, text, &ShortenUrlOptions::default()).await?;
        return Ok(QuickOutcome::Shortened(result));
    }

    let content = UploadContent::Text(text.to_string());
    let result = upload(client, dispatcher, &content, options).await?;
    Ok(QuickOutcome::Uploaded(result))
}

/// Upload the `index`-th newest file of the screenshot directory.
pub async fn upload_screenshot<E: Effects>(
    client: &ZiplineClient,
    dispatcher: &Dispatcher<E>,
    dir: &Path,
    index: usize,
    options: &UploadOptions,
) -> Result<UploadResult> {
    let screenshots = get_screenshots(dir)?;

    let screenshot = match screenshots.into_iter().nth(index) {
        Some(s) => s,
        None => anyhow::bail!("No screenshot #{} found in {}", index, dir.display()),
    };

    let content = UploadContent::File {
        path: screenshot.path,
        force_image: false,
    };
    upload(client, dispatcher, &content, options).await
}

/// Fetch a page of the file browser, optionally with text previews.
pub async fn browse_files(
    client: &ZiplineClient,
    page: u64,
    per_page: u64,
    preview: bool,
) -> Result<RichPage> {
    if preview {
        return get_page_rich(client, page, per_page).await;
    }

    let data = get_page(client, page, per_page).await?;
    Ok(RichPage {
        items: data
            .page
            .into_iter()
            .map(|file_info| RichFileInfo {
                file_info,
                file_content: None,
            })
            .collect(),
        page,
        pages: data.pages,
        total: data.total,
    })
}
