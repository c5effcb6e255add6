//! Typed error for the arbiter crate.

use thiserror::Error;

/// Every way a tutor request can fail.
///
/// The first four variants are detected before any external call; the rest
/// carry the underlying collaborator message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArbiterError {
    #[error(
        "Si escribes tu pregunta, no puedes usar “Examen”, “Sección”, “Pregunta” ni subir imagen al mismo tiempo."
    )]
    InputConflict,

    #[error("Proporciona texto, selecciona examen/sección/pregunta o sube una imagen.")]
    InputMissing,

    #[error("Cuando seleccionas examen, debes elegir sección y pregunta.")]
    SelectorIncomplete,

    #[error("El campo “{0}” debe ser un número entero positivo.")]
    SelectorMalformed(&'static str),

    #[error("Error al generar el embedding: {0}")]
    EmbeddingFailure(String),

    #[error("No se pudo descargar la imagen: {0}")]
    ImageFetchFailure(String),

    #[error("Error de formateo: {0}")]
    ChatFailure(String),

    #[error("No hay datos en el índice y falló la búsqueda aleatoria: {0}")]
    FallbackExhausted(String),
}

impl ArbiterError {
    /// `true` for input problems the caller can fix.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ArbiterError::InputConflict
                | ArbiterError::InputMissing
                | ArbiterError::SelectorIncomplete
                | ArbiterError::SelectorMalformed(_)
        )
    }

    /// Stable, machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ArbiterError::InputConflict => "INPUT_CONFLICT",
            ArbiterError::InputMissing => "INPUT_MISSING",
            ArbiterError::SelectorIncomplete => "SELECTOR_INCOMPLETE",
            ArbiterError::SelectorMalformed(_) => "SELECTOR_MALFORMED",
            ArbiterError::EmbeddingFailure(_) => "EMBEDDING_FAILURE",
            ArbiterError::ImageFetchFailure(_) => "IMAGE_FETCH_FAILURE",
            ArbiterError::ChatFailure(_) => "CHAT_FAILURE",
            ArbiterError::FallbackExhausted(_) => "FALLBACK_EXHAUSTED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_errors() {
        assert!(ArbiterError::InputConflict.is_client_error());
        assert!(ArbiterError::SelectorMalformed("examen").is_client_error());
        assert!(!ArbiterError::ChatFailure("boom".into()).is_client_error());
        assert!(!ArbiterError::FallbackExhausted("timeout".into()).is_client_error());
    }

    #[test]
    fn server_errors_interpolate_cause() {
        let e = ArbiterError::EmbeddingFailure("HTTP 401".into());
        assert_eq!(e.to_string(), "Error al generar el embedding: HTTP 401");
        assert_eq!(e.code(), "EMBEDDING_FAILURE");
    }
}
