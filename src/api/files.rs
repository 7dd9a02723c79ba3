use anyhow::Result;
use futures::future::join_all;
use tracing::debug;

use super::client::ZiplineClient;
use crate::local::{is_displayable_mime_type, raw_url};
use crate::models::file::{FileInfo, FilePage, RichFileInfo, RichPage};

/// Returned by `get_file_content` whenever the raw content cannot be shown.
pub const RAW_UNSUPPORTED: &str = "Raw endpoint not supported.";
pub const PASSWORD_PROTECTED: &str = "Password protected files are not supported";

pub async fn get_page(client: &ZiplineClient, page: u64, per_page: u64) -> Result<FilePage> {
    let query = vec![("page", page.to_string()), ("perpage", per_page.to_string())];
    client
        .get_json("/api/user/files", &query, "Failed to fetch files")
        .await
}

pub async fn delete_file(client: &ZiplineClient, id: &str) -> Result<()> {
    client
        .delete(&format!("/api/user/files/{}", id), "Failed to delete file")
        .await
}

/// Best-effort fetch of raw text content. Never fails; anything that is not a
/// successful UTF-8 response yields [`RAW_UNSUPPORTED`].
pub async fn get_file_content(client: &ZiplineClient, url: &str) -> String {
    match try_get_file_content(client, url).await {
        Ok(content) => content,
        Err(e) => {
            debug!("raw fetch of {} failed: {:#}", url, e);
            RAW_UNSUPPORTED.to_string()
        }
    }
}

async fn try_get_file_content(client: &ZiplineClient, url: &str) -> Result<String> {
    let response = client.execute(client.get_external(url)).await?;
    let status = response.status();

    if !status.is_success() {
        anyhow::bail!("raw endpoint returned {}", status);
    }

    let bytes = response.bytes().await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

async fn enrich(client: &ZiplineClient, file_info: FileInfo) -> RichFileInfo {
    let file_content = if !is_displayable_mime_type(&file_info.mime_type) {
        None
    } else if file_info.is_password_protected() {
        Some(PASSWORD_PROTECTED.to_string())
    } else {
        let url = raw_url(client.base_url(), &file_info.url);
        Some(get_file_content(client, &url).await)
    };

    RichFileInfo {
        file_info,
        file_content,
    }
}

/// Fetch a page of files and, concurrently, the text preview of every file
/// whose type can be displayed as text.
pub async fn get_page_rich(client: &ZiplineClient, page: u64, per_page: u64) -> Result<RichPage> {
    let data = get_page(client, page, per_page).await?;

    let items = join_all(data.page.into_iter().map(|file| enrich(client, file))).await;

    Ok(RichPage {
        items,
        page,
        pages: data.pages,
        total: data.total,
    })
}
