//! Retrieval helpers: dimension checks and hit mapping on top of the facade.

use crate::config::RagConfig;
use crate::errors::RagError;
use crate::filters::to_qdrant_filter;
use crate::qdrant_facade::QdrantFacade;
use crate::record::{RagFilter, RagHit};

use tracing::trace;

/// Runs a vector search and maps results into [`RagHit`]s.
///
/// # Errors
/// - `VectorSizeMismatch` if the query vector length differs from the collection's.
/// - `Qdrant` on client failures.
pub async fn search(
    cfg: &RagConfig,
    client: &QdrantFacade,
    query_vector: Vec<f32>,
    top_k: u64,
    filter: Option<&RagFilter>,
) -> Result<Vec<RagHit>, RagError> {
    check_dimension(cfg, &query_vector)?;
    trace!(
        "retrieve::search top_k={top_k} filter={}",
        filter.map(|f| f.must.len()).unwrap_or(0)
    );

    let qfilter = filter.filter(|f| !f.is_empty()).map(to_qdrant_filter);
    let hits = client.search(query_vector, top_k, qfilter).await?;

    Ok(hits
        .into_iter()
        .map(|(score, payload)| RagHit { score, payload })
        .collect())
}

pub(crate) fn check_dimension(cfg: &RagConfig, v: &[f32]) -> Result<(), RagError> {
    if v.len() != cfg.vector_size {
        return Err(RagError::VectorSizeMismatch {
            got: v.len(),
            want: cfg.vector_size,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_mismatch_is_reported() {
        let cfg = RagConfig::new_default("http://localhost:6334", "paa");
        let err = check_dimension(&cfg, &[0.0; 3]).unwrap_err();
        assert!(matches!(
            err,
            RagError::VectorSizeMismatch { got: 3, want: 1536 }
        ));
        assert!(check_dimension(&cfg, &vec![0.0; 1536]).is_ok());
    }
}
