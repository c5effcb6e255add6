/// Configuration for an LLM model invocation against an OpenAI-compatible API.
///
/// # Fields
///
/// - `model`: The model identifier (e.g., `"gpt-4o-mini"`, `"text-embedding-3-small"`).
/// - `endpoint`: API base URL without the `/v1/...` suffix.
/// - `api_key`: Bearer token.
/// - `max_tokens`: Maximum number of tokens to generate (chat only).
/// - `temperature`: Controls randomness (0.0 = deterministic).
/// - `top_p`: Nucleus sampling cutoff (alternative to temperature).
/// - `timeout_secs`: Optional request timeout in seconds.
///
/// # Examples
///
/// ```
/// use ai_llm_service::LlmModelConfig;
///
/// let cfg = LlmModelConfig {
///     model: "gpt-4o-mini".to_string(),
///     endpoint: "https://api.openai.com".to_string(),
///     api_key: Some("sk-...".to_string()),
///     max_tokens: Some(1024),
///     temperature: Some(0.2),
///     top_p: None,
///     timeout_secs: Some(60),
/// };
/// assert_eq!(cfg.model, "gpt-4o-mini");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// Model identifier string.
    pub model: String,

    /// API base URL.
    pub endpoint: String,

    /// API key for authentication.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
