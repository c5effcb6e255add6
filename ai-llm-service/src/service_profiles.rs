//! Shared LLM service with four profiles: `formatter`, `tutor`,
//! `text_embedding` and `image_embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches underlying HTTP clients per config (endpoint+model+key+timeout).
//! - If the `tutor` profile is not provided, it falls back to `formatter`.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::LlmServiceProfiles;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = Arc::new(LlmServiceProfiles::from_env()?);
//!
//! let txt = svc.generate_formatter("Formatea la lista.", Some("Eres un formateador.")).await?;
//! println!("{txt}");
//!
//! let emb = svc.embed_text("x^2 - 4 = 0").await?;
//! println!("Embedding dim = {}", emb.len());
//! # Ok(()) }
//! ```

use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
    sync::Arc,
};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    config::{default_config, llm_model_config::LlmModelConfig},
    error_handler::AiLlmError,
    services::open_ai_service::OpenAiService,
};

/// Shared service that manages the tutor's logical LLM profiles.
pub struct LlmServiceProfiles {
    formatter: LlmModelConfig,
    tutor: LlmModelConfig,
    text_embedding: LlmModelConfig,
    image_embedding: LlmModelConfig,

    openai: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,
}

impl LlmServiceProfiles {
    /// Creates a new service.
    ///
    /// - `formatter`: chat profile used to format retrieved snippets.
    /// - `tutor_opt`: optional chat profile for exact-question explanations.
    ///   If `None`, falls back to `formatter`.
    /// - `text_embedding` / `image_embedding`: embedding profiles.
    pub fn new(
        formatter: LlmModelConfig,
        tutor_opt: Option<LlmModelConfig>,
        text_embedding: LlmModelConfig,
        image_embedding: LlmModelConfig,
    ) -> Self {
        let tutor = tutor_opt.unwrap_or_else(|| formatter.clone());

        Self {
            formatter,
            tutor,
            text_embedding,
            image_embedding,
            openai: RwLock::new(HashMap::new()),
        }
    }

    /// Builds all profiles from environment variables.
    ///
    /// See [`crate::config::default_config`] for the variables used.
    pub fn from_env() -> Result<Self, AiLlmError> {
        Ok(Self::new(
            default_config::config_openai_formatter()?,
            default_config::config_openai_tutor()?,
            default_config::config_openai_text_embedding()?,
            default_config::config_openai_image_embedding()?,
        ))
    }

    /// Generates text using the **formatter** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if generation fails.
    pub async fn generate_formatter(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, AiLlmError> {
        self.generate_with(&self.formatter, prompt, system).await
    }

    /// Generates text using the **tutor** profile.
    pub async fn generate_tutor(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, AiLlmError> {
        self.generate_with(&self.tutor, prompt, system).await
    }

    /// Embeds free text with the **text embedding** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if embedding fails.
    pub async fn embed_text(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let cli = self.get_or_init(&self.text_embedding).await?;
        cli.embeddings(input).await
    }

    /// Embeds raw image bytes with the **image embedding** profile.
    ///
    /// The bytes are sent base64-encoded as the `input` string.
    pub async fn embed_image(&self, bytes: &[u8]) -> Result<Vec<f32>, AiLlmError> {
        let encoded = BASE64.encode(bytes);
        debug!(raw_len = bytes.len(), b64_len = encoded.len(), "embedding image");
        let cli = self.get_or_init(&self.image_embedding).await?;
        cli.embeddings(&encoded).await
    }

    /* --------------------- Internals --------------------- */

    async fn generate_with(
        &self,
        cfg: &LlmModelConfig,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, AiLlmError> {
        let cli = self.get_or_init(cfg).await?;
        cli.generate(prompt, system).await
    }

    async fn get_or_init(&self, cfg: &LlmModelConfig) -> Result<Arc<OpenAiService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.openai.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.openai.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }
}

/// Internal cache key to identify unique client configs.
#[derive(Clone, Eq)]
struct ClientKey {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}

impl PartialEq for ClientKey {
    fn eq(&self, other: &Self) -> bool {
        self.endpoint == other.endpoint
            && self.model == other.model
            && self.api_key == other.api_key
            && self.timeout == other.timeout
    }
}

impl Hash for ClientKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.endpoint.hash(state);
        self.model.hash(state);
        if let Some(ref k) = self.api_key {
            k.hash(state);
        } else {
            0usize.hash(state);
        }
        self.timeout.hash(state);
    }
}
