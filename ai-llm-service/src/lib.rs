//! Shared LLM service for the tutor backend.
//!
//! - [`services::open_ai_service::OpenAiService`] talks to an OpenAI-compatible
//!   REST API (chat completions and embeddings).
//! - [`service_profiles::LlmServiceProfiles`] groups the four model roles the
//!   application needs (`formatter`, `tutor`, `text_embedding`,
//!   `image_embedding`) and caches one client per distinct config.
//! - [`config::default_config`] builds those profiles from environment variables.
//! - [`telemetry`] exposes a library-scoped `tracing` layer.

pub mod config;
pub mod error_handler;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::{AiLlmError, ConfigError, ProviderError, ProviderErrorKind};
pub use service_profiles::LlmServiceProfiles;
