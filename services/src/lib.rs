//! Small outbound HTTP clients used by the tutor backend's fallback paths.
//!
//! Both clients carry a bounded timeout; nothing here retries.

pub mod errors;
pub mod image_fetch;
pub mod wikipedia;

pub use errors::{FetchError, FetchResult};
pub use image_fetch::{ImageDownloader, ImageDownloaderConfig};
pub use wikipedia::{WikipediaClient, WikipediaConfig};

/// Timeout applied to every fallback fetch unless configured otherwise.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;
