//! Core data models used by the library.

use serde::Serialize;
use serde_json::Value;

/// A single retrieval hit with score and JSON payload.
#[derive(Clone, Debug, Serialize)]
pub struct RagHit {
    pub score: f32,
    /// Point payload converted to JSON (always an object).
    pub payload: Value,
}

/// Exact-match payload filter; every condition must hold.
///
/// Example: `{"exam": 1, "section": "Matemáticas", "question": 12}`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RagFilter {
    pub must: Vec<(String, Value)>,
}

impl RagFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality condition.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.must.push((field.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.must.is_empty()
    }
}
