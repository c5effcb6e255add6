//! Download of user-supplied image URLs.

use std::time::Duration;

use reqwest::redirect;
use tracing::{debug, info, warn};

use crate::{DEFAULT_FETCH_TIMEOUT_SECS, FetchError, FetchResult};

pub const DEFAULT_IMAGE_MAX_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ImageDownloaderConfig {
    pub timeout_secs: u64,
    /// Hard cap on the downloaded body.
    pub max_bytes: usize,
}

impl Default for ImageDownloaderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            max_bytes: DEFAULT_IMAGE_MAX_BYTES,
        }
    }
}

impl ImageDownloaderConfig {
    /// Reads `IMAGE_MAX_BYTES`.
    ///
    /// # Errors
    /// `Config` when the variable is set but not a positive integer.
    pub fn from_env() -> FetchResult<Self> {
        let raw = std::env::var("IMAGE_MAX_BYTES").ok();
        Ok(Self {
            max_bytes: parse_max_bytes(raw.as_deref())?,
            ..Self::default()
        })
    }
}

fn parse_max_bytes(raw: Option<&str>) -> FetchResult<usize> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(DEFAULT_IMAGE_MAX_BYTES),
        Some(v) => v
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| FetchError::Config {
                var: "IMAGE_MAX_BYTES",
                reason: format!("expected a positive byte count, got `{v}`"),
            }),
    }
}

#[derive(Debug, Clone)]
pub struct ImageDownloader {
    http: reqwest::Client,
    max_bytes: usize,
}

impl ImageDownloader {
    pub fn new(cfg: ImageDownloaderConfig) -> FetchResult<Self> {
        // User-supplied URLs: redirects are not followed.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self {
            http,
            max_bytes: cfg.max_bytes,
        })
    }

    /// Downloads `url` and returns the raw body.
    ///
    /// # Errors
    /// `InvalidUrl`, `Transport` (including timeout), `Status` (redirects
    /// included), `Empty` for a zero-length body, `TooLarge` as soon as the
    /// body passes the size cap.
    pub async fn download(&self, url: &str) -> FetchResult<Vec<u8>> {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        debug!(%url, "downloading image");
        let mut resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!(%status, %url, "image download failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if let Some(len) = resp.content_length() {
            if len as usize > self.max_bytes {
                return Err(FetchError::TooLarge {
                    size: len as usize,
                    limit: self.max_bytes,
                });
            }
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = resp.chunk().await? {
            if bytes.len() + chunk.len() > self.max_bytes {
                warn!(%url, limit = self.max_bytes, "image body over size cap");
                return Err(FetchError::TooLarge {
                    size: bytes.len() + chunk.len(),
                    limit: self.max_bytes,
                });
            }
            bytes.extend_from_slice(&chunk);
        }
        if bytes.is_empty() {
            return Err(FetchError::Empty(url.to_string()));
        }

        info!(%url, size = bytes.len(), "image downloaded");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use mockito::Server;

    fn downloader(max_bytes: usize) -> ImageDownloader {
        ImageDownloader::new(ImageDownloaderConfig {
            timeout_secs: 2,
            max_bytes,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn downloads_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/img.png")
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body([0x89u8, b'P', b'N', b'G'])
            .create_async()
            .await;

        let bytes = downloader(1024)
            .download(&format!("{}/img.png", server.url()))
            .await
            .unwrap();
        assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn rejects_oversized_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/big.png")
            .with_status(200)
            .with_body(vec![0u8; 64])
            .create_async()
            .await;

        let err = downloader(16)
            .download(&format!("{}/big.png", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::TooLarge { limit: 16, .. }));
    }

    #[tokio::test]
    async fn stops_reading_chunked_body_past_cap() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/stream.png")
            .with_status(200)
            .with_chunked_body(|w| {
                for _ in 0..8 {
                    w.write_all(&[0u8; 16])?;
                }
                Ok(())
            })
            .create_async()
            .await;

        let err = downloader(24)
            .download(&format!("{}/stream.png", server.url()))
            .await
            .unwrap_err();
        match err {
            FetchError::TooLarge { size, limit } => {
                assert_eq!(limit, 24);
                assert!(size > 24 && size <= 128);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn redirects_are_not_followed() {
        let mut server = Server::new_async().await;
        let _redirect = server
            .mock("GET", "/moved.png")
            .with_status(302)
            .with_header("location", "/internal.png")
            .create_async()
            .await;
        let target = server
            .mock("GET", "/internal.png")
            .with_status(200)
            .with_body([1u8, 2, 3])
            .expect(0)
            .create_async()
            .await;

        let err = downloader(1024)
            .download(&format!("{}/moved.png", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 302, .. }));
        target.assert_async().await;
    }

    #[test]
    fn max_bytes_from_env_value() {
        assert_eq!(parse_max_bytes(None).unwrap(), DEFAULT_IMAGE_MAX_BYTES);
        assert_eq!(parse_max_bytes(Some(" 2048 ")).unwrap(), 2048);
        assert!(matches!(
            parse_max_bytes(Some("ten megs")),
            Err(FetchError::Config { var: "IMAGE_MAX_BYTES", .. })
        ));
        assert!(parse_max_bytes(Some("0")).is_err());
    }

    #[tokio::test]
    async fn not_found_is_status_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing.png")
            .with_status(404)
            .create_async()
            .await;

        let err = downloader(1024)
            .download(&format!("{}/missing.png", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn non_http_url_is_rejected_without_request() {
        let err = downloader(1024).download("file:///etc/passwd").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}
