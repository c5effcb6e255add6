//! Read-only retrieval facade over Qdrant.
//!
//! Two access paths are exposed through [`RagStore::search`]:
//! - k-NN similarity search for an embedding vector;
//! - payload-filtered lookup, queried with [`RagStore::placeholder_vector`] when
//!   retrieval is by exact metadata match rather than similarity.

mod config;
mod errors;
mod filters;
mod qdrant_facade;
mod record;
mod retrieve;

pub use config::{DEFAULT_QDRANT_URL, DEFAULT_VECTOR_SIZE, RagConfig};
pub use errors::RagError;
pub use filters::to_qdrant_filter;
pub use record::{RagFilter, RagHit};

use tracing::trace;

/// High-level facade that wires configuration and the Qdrant client.
///
/// Construct once at startup and share behind an `Arc`.
pub struct RagStore {
    cfg: RagConfig,
    client: qdrant_facade::QdrantFacade,
}

impl RagStore {
    /// Constructs a new store from the given configuration.
    ///
    /// # Errors
    /// Returns `RagError::Config` / `RagError::Qdrant` if validation or client
    /// initialization fails.
    pub fn new(cfg: RagConfig) -> Result<Self, RagError> {
        trace!("RagStore::new collection={}", cfg.collection);
        let client = qdrant_facade::QdrantFacade::new(&cfg)?;
        Ok(Self { cfg, client })
    }

    pub fn config(&self) -> &RagConfig {
        &self.cfg
    }

    /// All-zero vector with the collection's dimensionality.
    pub fn placeholder_vector(&self) -> Vec<f32> {
        vec![0.0; self.cfg.vector_size]
    }

    /// Searches the collection; payloads are always returned.
    ///
    /// # Errors
    /// `VectorSizeMismatch` for wrong-sized vectors, `Qdrant` on client failures.
    pub async fn search(
        &self,
        query_vector: Vec<f32>,
        top_k: u64,
        filter: Option<&RagFilter>,
    ) -> Result<Vec<RagHit>, RagError> {
        retrieve::search(&self.cfg, &self.client, query_vector, top_k, filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn placeholder_has_collection_dimension() {
        let mut cfg = RagConfig::new_default(DEFAULT_QDRANT_URL, "paa_exams");
        cfg.vector_size = 4;
        let store = RagStore::new(cfg).unwrap();
        assert_eq!(store.placeholder_vector(), vec![0.0; 4]);
    }
}
