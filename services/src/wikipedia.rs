//! Random article summaries from the Wikipedia REST API.
//!
//! `GET {base}/api/rest_v1/page/random/summary` returns a JSON document whose
//! `extract` field holds a plain-text summary of a random page.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{DEFAULT_FETCH_TIMEOUT_SECS, FetchError, FetchResult};

pub const DEFAULT_WIKIPEDIA_BASE_URL: &str = "https://es.wikipedia.org";

#[derive(Debug, Clone)]
pub struct WikipediaConfig {
    /// Wiki host, e.g. `https://es.wikipedia.org`.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_WIKIPEDIA_BASE_URL.to_string(),
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl WikipediaConfig {
    /// Reads `WIKIPEDIA_BASE_URL`; the timeout stays at the default.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(url) = std::env::var("WIKIPEDIA_BASE_URL") {
            if !url.trim().is_empty() {
                cfg.base_url = url;
            }
        }
        cfg
    }
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    extract: Option<String>,
}

/// Client for random article summaries.
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    http: reqwest::Client,
    url: String,
}

impl WikipediaClient {
    /// # Errors
    /// `InvalidUrl` for a non-http(s) base, `Transport` if the client cannot be built.
    pub fn new(cfg: WikipediaConfig) -> FetchResult<Self> {
        let base = cfg.base_url.trim().trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(FetchError::InvalidUrl(cfg.base_url.clone()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .user_agent(concat!("paa-tutor-backend/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            url: format!("{base}/api/rest_v1/page/random/summary"),
        })
    }

    /// Fetches the summary text of a random article.
    ///
    /// # Errors
    /// `Transport` (including timeout), `Status` for non-2xx, `Decode` for bad
    /// JSON, `Empty` if the extract is missing or blank.
    pub async fn random_summary(&self) -> FetchResult<String> {
        debug!(url = %self.url, "fetching random article");

        let resp = self.http.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!(%status, url = %self.url, "random article request failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body: SummaryResponse = resp
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        let extract = body
            .extract
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| FetchError::Empty(self.url.clone()))?;

        info!(
            title = body.title.as_deref().unwrap_or(""),
            len = extract.len(),
            "random article fetched"
        );
        Ok(extract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn client(base: &str) -> WikipediaClient {
        WikipediaClient::new(WikipediaConfig {
            base_url: base.to_string(),
            timeout_secs: 2,
        })
        .unwrap()
    }

    #[test]
    fn rejects_non_http_base() {
        let err = WikipediaClient::new(WikipediaConfig {
            base_url: "es.wikipedia.org".into(),
            timeout_secs: 1,
        })
        .unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn returns_trimmed_extract() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/rest_v1/page/random/summary")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"title":"Teorema","extract":"  Un teorema es una proposición.  "}"#)
            .create_async()
            .await;

        let text = client(&server.url()).random_summary().await.unwrap();
        assert_eq!(text, "Un teorema es una proposición.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn blank_extract_is_empty_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/rest_v1/page/random/summary")
            .with_status(200)
            .with_body(r#"{"title":"Vacío","extract":"   "}"#)
            .create_async()
            .await;

        let err = client(&server.url()).random_summary().await.unwrap_err();
        assert!(matches!(err, FetchError::Empty(_)));
    }

    #[tokio::test]
    async fn server_error_is_status_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/rest_v1/page/random/summary")
            .with_status(503)
            .create_async()
            .await;

        let err = client(&server.url()).random_summary().await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }));
    }
}
