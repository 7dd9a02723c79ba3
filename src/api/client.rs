use anyhow::{Context, Result};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, warn};

use crate::config::Preferences;

/// HTTP client bound to one Zipline instance and one API token.
#[derive(Clone)]
pub struct ZiplineClient {
    client: reqwest::Client,
    base_url: String,
    token: HeaderValue,
}

/// Human-readable status text, e.g. "Payload Too Large".
pub fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_u16().to_string())
}

impl ZiplineClient {
    pub fn new(preferences: &Preferences) -> Result<Self> {
        Self::with_base_url(&preferences.base_url, &preferences.api_token)
    }

    pub fn with_base_url(base_url: &str, token: &str) -> Result<Self> {
        // Sent verbatim: Zipline expects the raw token, not "Bearer <token>".
        let mut token = HeaderValue::from_str(token)
            .context("API token contains characters that are not valid in an HTTP header")?;
        token.set_sensitive(true);

        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/api/upload`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start an authenticated request against an API path.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.endpoint(path))
            .header(AUTHORIZATION, self.token.clone())
    }

    /// Start an unauthenticated GET against an arbitrary URL.
    pub fn get_external(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    /// Send a request, logging method, URL, status and timing.
    /// Transport errors are returned untouched.
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let request = request.build()?;
        let method = request.method().clone();
        let url = request.url().clone();

        debug!("→ {} {}", method, url);

        let start = Instant::now();
        let response = self.client.execute(request).await?;
        let duration = start.elapsed();
        let status = response.status();

        if status.is_success() {
            debug!("← {} ({}ms)", status.as_u16(), duration.as_millis());
        } else {
            warn!(
                "← {} {} ({}ms) for {} {}",
                status.as_u16(),
                status_text(status),
                duration.as_millis(),
                method,
                url
            );
        }

        Ok(response)
    }

    /// GET an API path and decode the JSON body. Non-success statuses become
    /// `"<failure>: <status text>"`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        failure: &str,
    ) -> Result<T> {
        let response = self
            .execute(self.request(Method::GET, path).query(query))
            .await?;
        let status = response.status();

        if !status.is_success() {
            anyhow::bail!("{}: {}", failure, status_text(status));
        }

        let body = response.text().await?;
        debug!("  {} bytes", body.len());

        serde_json::from_str::<T>(&body)
            .with_context(|| format!("Failed to parse API response from {}", path))
    }

    /// DELETE an API path, discarding the body.
    pub async fn delete(&self, path: &str, failure: &str) -> Result<()> {
        let response = self.execute(self.request(Method::DELETE, path)).await?;
        let status = response.status();

        if !status.is_success() {
            anyhow::bail!("{}: {}", failure, status_text(status));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text() {
        assert_eq!(status_text(StatusCode::PAYLOAD_TOO_LARGE), "Payload Too Large");
        assert_eq!(status_text(StatusCode::from_u16(599).unwrap()), "599");
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client = ZiplineClient::with_base_url("https://zip.example.com/", "tok").unwrap();
        assert_eq!(client.base_url(), "https://zip.example.com");
        assert_eq!(
            client.endpoint("/api/user/urls"),
            "https://zip.example.com/api/user/urls"
        );
    }

    #[test]
    fn test_rejects_invalid_token() {
        assert!(ZiplineClient::with_base_url("https://zip.example.com", "bad\ntoken").is_err());
    }

    #[tokio::test]
    async fn test_authorization_sent_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let client = ZiplineClient::with_base_url(&server.url(), "secret-token").unwrap();

        let mock = server
            .mock("GET", "/api/user/urls")
            .match_header("authorization", "secret-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let urls: Vec<serde_json::Value> = client
            .get_json("/api/user/urls", &[], "Failed to fetch URLs")
            .await
            .unwrap();
        assert!(urls.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_json_failure_names_status() {
        let mut server = mockito::Server::new_async().await;
        let client = ZiplineClient::with_base_url(&server.url(), "tok").unwrap();

        let _mock = server
            .mock("GET", "/api/user/urls")
            .with_status(401)
            .create_async()
            .await;

        let err = client
            .get_json::<Vec<serde_json::Value>>("/api/user/urls", &[], "Failed to fetch URLs")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch URLs: Unauthorized");
    }
}
