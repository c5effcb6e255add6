//! OpenAI-compatible client for chat completions and embeddings.
//!
//! Non-streaming only. Endpoints are derived from `LlmModelConfig::endpoint`:
//! - POST {endpoint}/v1/chat/completions
//! - POST {endpoint}/v1/embeddings
//!
//! Constructor validation:
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://
//! - `cfg.model` must not be empty

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, error, info};

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{
        AiLlmError, ConfigError, HttpError, Provider, ProviderError, ProviderErrorKind,
        make_snippet,
    },
};

/// Thin client for one OpenAI model.
///
/// Keeps a preconfigured `reqwest::Client` (bearer header, optional timeout).
#[derive(Debug)]
pub struct OpenAiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
    url_embeddings: String,
}

impl OpenAiService {
    /// Creates a new [`OpenAiService`] from the given config.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `MissingApiKey` if `cfg.api_key` is `None`
    /// - [`AiLlmError::Provider`] with `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`AiLlmError::Config`] with `EmptyModel` if `cfg.model` is blank
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        let api_key = cfg
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::new(Provider::OpenAI, ProviderErrorKind::MissingApiKey))?;

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                Provider::OpenAI,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        if cfg.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                ProviderError::new(
                    Provider::OpenAI,
                    ProviderErrorKind::Decode(format!("invalid API key header: {e}")),
                )
            })?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = request_timeout(&cfg) {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_chat = format!("{base}/v1/chat/completions");
        let url_embeddings = format!("{base}/v1/embeddings");

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = ?cfg.timeout_secs,
            "OpenAiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
            url_embeddings,
        })
    }

    /// Performs a non-streaming chat completion.
    ///
    /// Sends an optional system message followed by the user `prompt`.
    /// The returned text is trimmed.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client/network failures
    /// - [`AiLlmError::Provider`] with `Decode` if the JSON cannot be parsed
    /// - [`AiLlmError::Provider`] with `EmptyChoices` if no content is returned
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        let started = Instant::now();
        debug!(
            model = %self.cfg.model,
            prompt_len = prompt.len(),
            has_system = system.is_some(),
            "requesting chat completion"
        );

        let body = ChatCompletionRequest::from_cfg(&self.cfg, prompt, system);
        let out: ChatCompletionResponse = self
            .post_json(&self.url_chat, &body, "choices[0].message.content")
            .await?;

        let content = out
            .choices
            .into_iter()
            .filter_map(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .find(|c| !c.is_empty())
            .ok_or_else(|| ProviderError::new(Provider::OpenAI, ProviderErrorKind::EmptyChoices))?;

        info!(
            model = %self.cfg.model,
            chars = content.len(),
            latency_ms = started.elapsed().as_millis(),
            "chat completion done"
        );
        Ok(content)
    }

    /// Embeds `input` and returns the first vector.
    ///
    /// # Errors
    /// Same transport and status errors as [`Self::generate`];
    /// `EmptyEmbedding` when the provider returns no usable vector.
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let started = Instant::now();
        debug!(model = %self.cfg.model, input_len = input.len(), "requesting embedding");

        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            input,
        };
        let out: EmbeddingsResponse = self
            .post_json(&self.url_embeddings, &body, "data[0].embedding")
            .await?;

        let vector = out
            .data
            .into_iter()
            .next()
            .map(|item| item.embedding)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ProviderError::new(Provider::OpenAI, ProviderErrorKind::EmptyEmbedding))?;

        info!(
            model = %self.cfg.model,
            dim = vector.len(),
            latency_ms = started.elapsed().as_millis(),
            "embedding done"
        );
        Ok(vector)
    }

    /// POSTs `body` to `url` and decodes a 2xx JSON response.
    ///
    /// Non-2xx statuses become `HttpStatus` with a trimmed body snippet;
    /// undecodable bodies become `Decode` mentioning the `expected` path.
    async fn post_json<B, R>(&self, url: &str, body: &B, expected: &str) -> Result<R, AiLlmError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let resp = self.client.post(url).json(body).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            error!(%status, %url, %snippet, model = %self.cfg.model, "provider rejected request");
            return Err(ProviderError::new(
                Provider::OpenAI,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url: url.to_string(),
                    snippet,
                }),
            )
            .into());
        }

        resp.json::<R>().await.map_err(|e| {
            error!(error = %e, %url, model = %self.cfg.model, "undecodable provider response");
            ProviderError::new(
                Provider::OpenAI,
                ProviderErrorKind::Decode(format!("{e}; expected `{expected}`")),
            )
            .into()
        })
    }
}

/// Client-wide timeout; `None` leaves chat and embedding calls unbounded.
fn request_timeout(cfg: &LlmModelConfig) -> Option<Duration> {
    cfg.timeout_secs.map(Duration::from_secs)
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str, system: Option<&'a str>) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(sys) = system {
            messages.push(ChatMessage {
                role: "system",
                content: sys,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        Self {
            model: &cfg.model,
            messages,
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            max_tokens: cfg.max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn cfg(endpoint: &str, model: &str) -> LlmModelConfig {
        LlmModelConfig {
            model: model.to_string(),
            endpoint: endpoint.to_string(),
            api_key: Some("test-key".to_string()),
            max_tokens: None,
            temperature: Some(0.2),
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn timeout_is_opt_in() {
        let mut c = cfg("http://localhost:1", "gpt-4o-mini");
        assert_eq!(request_timeout(&c), Some(Duration::from_secs(5)));
        c.timeout_secs = None;
        assert_eq!(request_timeout(&c), None);
        assert!(OpenAiService::new(c).is_ok());
    }

    #[test]
    fn rejects_missing_api_key() {
        let mut c = cfg("http://localhost:1", "gpt-4o-mini");
        c.api_key = None;
        let err = OpenAiService::new(c).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::MissingApiKey,
                ..
            })
        ));
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let err = OpenAiService::new(cfg("localhost:1", "gpt-4o-mini")).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::InvalidEndpoint(_),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn generate_sends_system_and_user_messages() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [
                    { "role": "system", "content": "be strict" },
                    { "role": "user", "content": "format this" }
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"  <ol><li>ok</li></ol>\n"}}]}"#)
            .create_async()
            .await;

        let svc = OpenAiService::new(cfg(&server.url(), "gpt-4o-mini")).unwrap();
        let out = svc.generate("format this", Some("be strict")).await.unwrap();

        assert_eq!(out, "<ol><li>ok</li></ol>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn generate_maps_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let svc = OpenAiService::new(cfg(&server.url(), "gpt-4o-mini")).unwrap();
        let err = svc.generate("hi", None).await.unwrap_err();

        match err {
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::HttpStatus(http),
                ..
            }) => {
                assert_eq!(http.status.as_u16(), 429);
                assert_eq!(http.snippet, "rate limited");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn generate_rejects_empty_choices() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let svc = OpenAiService::new(cfg(&server.url(), "gpt-4o-mini")).unwrap();
        let err = svc.generate("hi", None).await.unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::EmptyChoices,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn embeddings_returns_first_vector() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/embeddings")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "text-embedding-3-small",
                "input": "x^2 - 4 = 0"
            })))
            .with_status(200)
            .with_body(r#"{"data":[{"embedding":[0.5,-0.25,1.0]}]}"#)
            .create_async()
            .await;

        let svc = OpenAiService::new(cfg(&server.url(), "text-embedding-3-small")).unwrap();
        let v = svc.embeddings("x^2 - 4 = 0").await.unwrap();

        assert_eq!(v, vec![0.5, -0.25, 1.0]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn embeddings_rejects_empty_data() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/embeddings")
            .with_status(200)
            .with_body(r#"{"data":[]}"#)
            .create_async()
            .await;

        let svc = OpenAiService::new(cfg(&server.url(), "text-embedding-3-small")).unwrap();
        assert!(svc.embeddings("hola").await.is_err());
    }
}
