use anyhow::{Context, Result};
use reqwest::Method;

use super::client::{status_text, ZiplineClient};
use super::upload::{non_empty, HEADER_MAX_VIEWS, HEADER_PASSWORD};
use crate::models::upload::{ShortenUrlOptions, ShortenUrlRequest, ShortenUrlResult};
use crate::models::url::UrlInfo;

/// Create a short URL pointing at `destination`.
pub async fn shorten_url(
    client: &ZiplineClient,
    destination: &str,
    options: &ShortenUrlOptions,
) -> Result<ShortenUrlResult> {
    let body = ShortenUrlRequest {
        destination,
        vanity: non_empty(&options.vanity),
    };

    let mut request = client.request(Method::POST, "/api/user/urls").json(&body);

    if let Some(password) = non_empty(&options.password) {
        request = request.header(HEADER_PASSWORD, password);
    }
    if let Some(max_views) = options.max_views.filter(|v| *v > 0) {
        request = request.header(HEADER_MAX_VIEWS, max_views.to_string());
    }

    let response = client.execute(request).await?;
    let status = response.status();

    if status != reqwest::StatusCode::OK {
        anyhow::bail!("URL shortening failed: {}", status_text(status));
    }

    response
        .json()
        .await
        .context("Failed to parse URL shortening response")
}

pub async fn get_urls(client: &ZiplineClient) -> Result<Vec<UrlInfo>> {
    client
        .get_json("/api/user/urls", &[], "Failed to fetch URLs")
        .await
}

pub async fn delete_url(client: &ZiplineClient, id: &str) -> Result<()> {
    client
        .delete(&format!("/api/user/urls/{}", id), "Failed to delete URL")
        .await
}
