//! Production implementations of the collaborator traits.

use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use rag_store::{RagFilter, RagStore};
use services::{ImageDownloader, WikipediaClient};

use crate::collaborators::{
    BoxFuture, CallResult, ChatModel, ChatProfile, CollaboratorError, Collaborators, Embedder,
    ImageFetcher, IndexMatch, MetadataFilter, ReferenceSource, VectorIndex,
};

impl Embedder for LlmServiceProfiles {
    fn embed_text<'a>(&'a self, text: &'a str) -> BoxFuture<'a, CallResult<Vec<f32>>> {
        Box::pin(async move {
            LlmServiceProfiles::embed_text(self, text)
                .await
                .map_err(CollaboratorError::new)
        })
    }

    fn embed_image<'a>(&'a self, bytes: &'a [u8]) -> BoxFuture<'a, CallResult<Vec<f32>>> {
        Box::pin(async move {
            LlmServiceProfiles::embed_image(self, bytes)
                .await
                .map_err(CollaboratorError::new)
        })
    }
}

impl ChatModel for LlmServiceProfiles {
    fn complete<'a>(
        &'a self,
        profile: ChatProfile,
        system: &'a str,
        user: &'a str,
    ) -> BoxFuture<'a, CallResult<String>> {
        Box::pin(async move {
            let out = match profile {
                ChatProfile::Formatter => self.generate_formatter(user, Some(system)).await,
                ChatProfile::Tutor => self.generate_tutor(user, Some(system)).await,
            };
            out.map_err(CollaboratorError::new)
        })
    }
}

fn to_rag_filter(filter: MetadataFilter) -> RagFilter {
    filter
        .must
        .into_iter()
        .fold(RagFilter::new(), |f, (field, value)| f.eq(field, value))
}

impl VectorIndex for RagStore {
    fn dimension(&self) -> usize {
        self.config().vector_size
    }

    fn placeholder(&self) -> Vec<f32> {
        self.placeholder_vector()
    }

    fn query<'a>(
        &'a self,
        vector: Vec<f32>,
        top_k: u64,
        filter: Option<MetadataFilter>,
    ) -> BoxFuture<'a, CallResult<Vec<IndexMatch>>> {
        Box::pin(async move {
            let filter = filter.map(to_rag_filter);
            let hits = self
                .search(vector, top_k, filter.as_ref())
                .await
                .map_err(CollaboratorError::new)?;
            Ok(hits
                .into_iter()
                .map(|h| IndexMatch {
                    score: h.score,
                    metadata: h.payload,
                })
                .collect())
        })
    }
}

impl ReferenceSource for WikipediaClient {
    fn fetch_random(&self) -> BoxFuture<'_, CallResult<String>> {
        Box::pin(async move { self.random_summary().await.map_err(CollaboratorError::new) })
    }
}

impl ImageFetcher for ImageDownloader {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, CallResult<Vec<u8>>> {
        Box::pin(async move { self.download(url).await.map_err(CollaboratorError::new) })
    }
}

impl Collaborators {
    /// Wires the production clients. The LLM profiles serve as both embedder
    /// and chat model.
    pub fn from_services(
        llm: Arc<LlmServiceProfiles>,
        store: Arc<RagStore>,
        wikipedia: WikipediaClient,
        images: ImageDownloader,
    ) -> Self {
        Self {
            embedder: llm.clone(),
            index: store,
            chat: llm,
            reference: Arc::new(wikipedia),
            images: Arc::new(images),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metadata_filter_maps_to_rag_filter() {
        let f = MetadataFilter {
            must: vec![
                ("exam".into(), json!(1)),
                ("section".into(), json!("Lectura")),
            ],
        };
        let rf = to_rag_filter(f);
        assert_eq!(rf, RagFilter::new().eq("exam", 1).eq("section", "Lectura"));
    }
}
