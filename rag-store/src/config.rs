//! Connection and collection configuration.

use crate::errors::RagError;

pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
pub const DEFAULT_VECTOR_SIZE: usize = 1536;

/// Configuration for retrieval against one Qdrant collection.
#[derive(Clone, Debug)]
pub struct RagConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Dimensionality of stored vectors.
    pub vector_size: usize,
}

impl RagConfig {
    /// Creates a default config for a given collection name and Qdrant endpoint.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            vector_size: DEFAULT_VECTOR_SIZE,
        }
    }

    /// Reads `QDRANT_URL`, `QDRANT_API_KEY`, `QDRANT_COLLECTION` and
    /// `EMBEDDING_DIM`, then validates the result.
    ///
    /// # Errors
    /// `RagError::Config` if the collection is missing or a number is invalid.
    pub fn from_env() -> Result<Self, RagError> {
        let url = non_empty_env("QDRANT_URL").unwrap_or_else(|| DEFAULT_QDRANT_URL.to_string());
        let collection = non_empty_env("QDRANT_COLLECTION")
            .ok_or_else(|| RagError::Config("QDRANT_COLLECTION is not set".into()))?;

        let mut cfg = Self::new_default(url, collection);
        cfg.qdrant_api_key = non_empty_env("QDRANT_API_KEY");
        if let Some(dim) = non_empty_env("EMBEDDING_DIM") {
            cfg.vector_size = dim
                .trim()
                .parse()
                .map_err(|_| RagError::Config(format!("EMBEDDING_DIM is not a number: {dim}")))?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(RagError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(RagError::Config("collection is empty".into()));
        }
        if self.vector_size == 0 {
            return Err(RagError::Config("vector_size must be > 0".into()));
        }
        Ok(())
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
