use std::{env, sync::Arc};

use ai_llm_service::{AiLlmError, LlmServiceProfiles};
use arbiter::{Arbiter, Collaborators};
use rag_store::{RagConfig, RagError, RagStore};
use services::{
    FetchError, ImageDownloader, ImageDownloaderConfig, WikipediaClient, WikipediaConfig,
};
use thiserror::Error;
use tracing::info;

use crate::core::exam_catalog::{DEFAULT_CATALOG_PATH, ExamCatalog};

/// Startup failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("LLM configuration: {0}")]
    Llm(#[from] AiLlmError),

    #[error("vector index configuration: {0}")]
    Index(#[from] RagError),

    #[error("HTTP client configuration: {0}")]
    Fetch(#[from] FetchError),

    #[error("exam catalog: {0}")]
    Catalog(String),
}

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub arbiter: Arbiter,
    pub catalog: Arc<ExamCatalog>,
}

impl AppState {
    pub fn new(collaborators: Collaborators, catalog: ExamCatalog) -> Self {
        Self {
            arbiter: Arbiter::new(collaborators),
            catalog: Arc::new(catalog),
        }
    }

    /// Builds every client from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let llm = Arc::new(LlmServiceProfiles::from_env()?);
        let store = Arc::new(RagStore::new(RagConfig::from_env()?)?);
        let wikipedia = WikipediaClient::new(WikipediaConfig::from_env())?;
        let images = ImageDownloader::new(ImageDownloaderConfig::from_env()?)?;

        let catalog_path =
            env::var("EXAM_CATALOG_PATH").unwrap_or_else(|_| DEFAULT_CATALOG_PATH.into());
        let catalog = ExamCatalog::load(&catalog_path)?;
        info!(
            path = %catalog_path,
            exams = catalog.exams.enabled().len(),
            sections = catalog.sections.len(),
            "exam catalog loaded"
        );

        Ok(Self::new(
            Collaborators::from_services(llm, store, wikipedia, images),
            catalog,
        ))
    }
}
