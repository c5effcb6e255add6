//! Multipart form → [`Query`].

use arbiter::Query;
use axum::extract::Multipart;
use tracing::debug;

use crate::error_handler::AppResult;

/// Reads the `/preguntar` form. Unknown fields are skipped; an `image` part
/// with zero bytes counts as absent.
pub async fn read_query(mut multipart: Multipart) -> AppResult<Query> {
    let mut query = Query::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match name.as_str() {
            "texto" => query.text = field.text().await?,
            "examen" => query.exam = Some(field.text().await?),
            "seccion" => query.section = Some(field.text().await?),
            "pregunta" => query.question = Some(field.text().await?),
            "image_url" => query.image_url = Some(field.text().await?),
            "image" => {
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    query.image = Some(bytes.to_vec());
                }
            }
            other => debug!(field = other, "ignoring unknown form field"),
        }
    }

    Ok(query)
}
