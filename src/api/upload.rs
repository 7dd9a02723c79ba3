use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use std::path::Path;

use super::client::{status_text, ZiplineClient};
use crate::models::upload::{UploadContent, UploadOptions, UploadResponse, UploadResult};

pub const HEADER_DELETES_AT: &str = "x-zipline-deletes-at";
pub const HEADER_PASSWORD: &str = "x-zipline-password";
pub const HEADER_MAX_VIEWS: &str = "x-zipline-max-views";
pub const HEADER_FOLDER: &str = "x-zipline-folder";

const TEXT_FILE_NAME: &str = "text.txt";
const FORCED_IMAGE_NAME: &str = "image.png";

/// The `x-zipline-*` headers for the options that are actually set.
/// Empty strings and a zero view limit count as unset.
pub fn upload_headers(options: &UploadOptions) -> Vec<(&'static str, String)> {
    let mut headers = Vec::new();

    if let Some(deletes_at) = non_empty(&options.deletes_at) {
        headers.push((HEADER_DELETES_AT, deletes_at.to_string()));
    }
    if let Some(password) = non_empty(&options.password) {
        headers.push((HEADER_PASSWORD, password.to_string()));
    }
    if let Some(max_views) = options.max_views.filter(|v| *v > 0) {
        headers.push((HEADER_MAX_VIEWS, max_views.to_string()));
    }
    if let Some(folder) = non_empty(&options.folder) {
        headers.push((HEADER_FOLDER, folder.to_string()));
    }

    headers
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Filename the multipart part is sent under.
fn part_file_name(path: &Path, force_image: bool) -> String {
    if force_image {
        return FORCED_IMAGE_NAME.to_string();
    }

    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string())
}

async fn build_part(content: &UploadContent) -> Result<Part> {
    let part = match content {
        UploadContent::Text(text) => Part::text(text.clone())
            .file_name(TEXT_FILE_NAME)
            .mime_str("text/plain")?,
        UploadContent::File { path, force_image } => {
            let data = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let file_name = part_file_name(path, *force_image);
            let mime = mime_guess::from_path(&file_name).first_or_octet_stream();

            Part::bytes(data)
                .file_name(file_name)
                .mime_str(mime.essence_str())?
        }
    };

    Ok(part)
}

/// Upload text or a file to `/api/upload` and return the first stored file.
pub async fn upload_content(
    client: &ZiplineClient,
    content: &UploadContent,
    options: &UploadOptions,
) -> Result<UploadResult> {
    let form = Form::new().part("file", build_part(content).await?);

    let mut request = client.request(Method::POST, "/api/upload").multipart(form);
    for (name, value) in upload_headers(options) {
        request = request.header(name, value);
    }

    let response = client.execute(request).await?;
    let status = response.status();

    if status != reqwest::StatusCode::OK {
        anyhow::bail!("Upload failed: {}", status_text(status));
    }

    let body: UploadResponse = response
        .json()
        .await
        .context("Failed to parse upload response")?;

    body.files
        .into_iter()
        .next()
        .context("Upload failed: server returned no files")
}
