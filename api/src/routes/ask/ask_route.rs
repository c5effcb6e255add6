//! POST /preguntar: answers one tutor question.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State, multipart::MultipartRejection},
    response::Html,
};
use tracing::info;

use crate::{
    core::app_state::AppState, error_handler::AppResult, routes::ask::ask_form::read_query,
};

/// Handler: POST /preguntar
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/preguntar -F 'texto=¿Qué es un número primo?'
/// ```
pub async fn preguntar(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Html<String>> {
    let query = read_query(multipart?).await?;
    info!(
        has_text = !query.text.trim().is_empty(),
        has_image = query.image.is_some(),
        exam = query.exam.as_deref().unwrap_or(""),
        "question received"
    );

    let html = state.arbiter.answer(&query).await?;
    Ok(Html(html))
}
