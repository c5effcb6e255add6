use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use arbiter::ArbiterError;
use serde::Serialize;
use thiserror::Error;

use crate::core::app_state::ConfigError;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    #[error("solicitud inválida: {0}")]
    BadRequest(String),

    /// Malformed or oversized multipart body; keeps axum's status.
    #[error("solicitud inválida: {message}")]
    Multipart { status: StatusCode, message: String },

    #[error(transparent)]
    Arbiter(#[from] ArbiterError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Multipart { status, .. } => *status,
            AppError::Arbiter(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            AppError::Arbiter(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // startup-only
            AppError::Config(_) | AppError::Bind(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Multipart { status, .. } if *status == StatusCode::PAYLOAD_TOO_LARGE => {
                "PAYLOAD_TOO_LARGE"
            }
            AppError::Multipart { .. } => "BAD_REQUEST",
            AppError::Arbiter(e) => e.code(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::info!(code = self.error_code(), error = %self, "request rejected");
        }
        let body = ErrorBody {
            error: self.to_string(),
            code: self.error_code(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<MultipartRejection> for AppError {
    fn from(err: MultipartRejection) -> Self {
        AppError::Multipart {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Multipart {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        extract::{FromRequest, Multipart},
        http::Request,
    };

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn client_errors_map_to_400() {
        let (status, body) = body_json(ArbiterError::InputMissing.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INPUT_MISSING");
        assert_eq!(
            body["error"],
            "Proporciona texto, selecciona examen/sección/pregunta o sube una imagen."
        );
    }

    #[tokio::test]
    async fn pipeline_errors_map_to_500() {
        for (err, code) in [
            (ArbiterError::EmbeddingFailure("x".into()), "EMBEDDING_FAILURE"),
            (ArbiterError::ImageFetchFailure("x".into()), "IMAGE_FETCH_FAILURE"),
            (ArbiterError::ChatFailure("x".into()), "CHAT_FAILURE"),
            (ArbiterError::FallbackExhausted("x".into()), "FALLBACK_EXHAUSTED"),
        ] {
            let (status, body) = body_json(err.into()).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body["code"], code);
        }
    }

    #[tokio::test]
    async fn bad_request_maps_to_400() {
        let (status, body) = body_json(AppError::BadRequest("campo roto".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn oversized_multipart_field_maps_to_413() {
        let boundary = "paa-boundary";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"q.png\"\r\n\r\n"
        )
        .into_bytes();
        body.resize(body.len() + 3 * 1024 * 1024, 0u8);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        // No DefaultBodyLimit layer here, so axum's 2 MB default applies.
        let req = Request::builder()
            .method("POST")
            .uri("/preguntar")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();
        let mut multipart = Multipart::from_request(req, &()).await.unwrap();
        let err = match multipart.next_field().await {
            Ok(Some(field)) => field.bytes().await.unwrap_err(),
            Ok(None) => panic!("no field parsed"),
            Err(e) => e,
        };

        let (status, body) = body_json(err.into()).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    }
}
