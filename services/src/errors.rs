//! Error type for outbound fetches.

use thiserror::Error;

/// Convenient alias for fetch results.
pub type FetchResult<T> = Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Environment value could not be parsed.
    #[error("invalid {var}: {reason}")]
    Config { var: &'static str, reason: String },

    /// URL is empty or not http(s).
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Transport failure, including timeouts.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Body could not be decoded as expected.
    #[error("decode error: {0}")]
    Decode(String),

    /// Upstream answered successfully but with nothing usable.
    #[error("empty response from {0}")]
    Empty(String),

    /// Body exceeded the configured size cap.
    #[error("response too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },
}
