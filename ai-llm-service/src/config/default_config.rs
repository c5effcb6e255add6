//! Default LLM configs loaded from environment variables.
//!
//! Four roles are used by the tutor backend:
//!
//! - **Formatter**       → turns retrieved snippets into an ordered HTML list
//! - **Tutor**           → explains an exact exam question step by step
//! - **Text embedding**  → embeds free-text questions
//! - **Image embedding** → embeds uploaded/downloaded images (base64 input)
//!
//! # Environment variables
//!
//! - `OPENAI_API_KEY`                 = bearer token (mandatory)
//! - `OPENAI_BASE_URL`                = API base (default `https://api.openai.com`)
//! - `OPENAI_CHAT_MODEL`              = formatter model (default `gpt-4o-mini`)
//! - `CUSTOM_GPT_MODEL`               = tutor model (optional, falls back to formatter)
//! - `OPENAI_TEXT_EMBEDDING_MODEL`    = default `text-embedding-3-small`
//! - `OPENAI_IMAGE_EMBEDDING_MODEL`   = default `image-embedding-001`
//! - `LLM_MAX_TOKENS`                 = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS`               = optional client timeout (u64); unset means no timeout

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{AiLlmError, env_opt_u32, env_opt_u64, env_or, must_env, validate_http_endpoint},
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEXT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_IMAGE_EMBEDDING_MODEL: &str = "image-embedding-001";

/// Shared connection settings for every OpenAI profile.
#[derive(Debug, Clone)]
struct OpenAiConnection {
    endpoint: String,
    api_key: String,
    timeout_secs: Option<u64>,
}

fn openai_connection() -> Result<OpenAiConnection, AiLlmError> {
    let endpoint = env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL);
    validate_http_endpoint("OPENAI_BASE_URL", &endpoint)?;
    let api_key = must_env("OPENAI_API_KEY")?;
    let timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?;

    Ok(OpenAiConnection {
        endpoint,
        api_key,
        timeout_secs,
    })
}

/// Constructs the **formatter** chat config.
///
/// # Defaults
/// - `temperature = Some(0.2)`
pub fn config_openai_formatter() -> Result<LlmModelConfig, AiLlmError> {
    let conn = openai_connection()?;
    Ok(LlmModelConfig {
        model: env_or("OPENAI_CHAT_MODEL", DEFAULT_CHAT_MODEL),
        endpoint: conn.endpoint,
        api_key: Some(conn.api_key),
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: Some(0.2),
        top_p: None,
        timeout_secs: conn.timeout_secs,
    })
}

/// Constructs the **tutor** chat config, or `None` when `CUSTOM_GPT_MODEL`
/// is not set (callers then reuse the formatter profile).
pub fn config_openai_tutor() -> Result<Option<LlmModelConfig>, AiLlmError> {
    let model = match std::env::var("CUSTOM_GPT_MODEL") {
        Ok(m) if !m.trim().is_empty() => m,
        _ => return Ok(None),
    };
    let conn = openai_connection()?;
    Ok(Some(LlmModelConfig {
        model,
        endpoint: conn.endpoint,
        api_key: Some(conn.api_key),
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: Some(0.3),
        top_p: None,
        timeout_secs: conn.timeout_secs,
    }))
}

/// Constructs the **text embedding** config.
pub fn config_openai_text_embedding() -> Result<LlmModelConfig, AiLlmError> {
    embedding_config("OPENAI_TEXT_EMBEDDING_MODEL", DEFAULT_TEXT_EMBEDDING_MODEL)
}

/// Constructs the **image embedding** config.
pub fn config_openai_image_embedding() -> Result<LlmModelConfig, AiLlmError> {
    embedding_config("OPENAI_IMAGE_EMBEDDING_MODEL", DEFAULT_IMAGE_EMBEDDING_MODEL)
}

fn embedding_config(var: &str, default_model: &str) -> Result<LlmModelConfig, AiLlmError> {
    let conn = openai_connection()?;
    Ok(LlmModelConfig {
        model: env_or(var, default_model),
        endpoint: conn.endpoint,
        api_key: Some(conn.api_key),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: conn.timeout_secs,
    })
}
