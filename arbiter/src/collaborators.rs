//! Seams to the outside world.
//!
//! Each collaborator is an object-safe trait returning a boxed `Send` future,
//! so the pipeline can be driven by production clients or by test stubs.

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;
use thiserror::Error;

use crate::query::Selector;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Opaque failure reported by a collaborator; only its message is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CollaboratorError(pub String);

impl CollaboratorError {
    pub fn new(msg: impl std::fmt::Display) -> Self {
        Self(msg.to_string())
    }
}

pub type CallResult<T> = Result<T, CollaboratorError>;

/// Exact-match metadata conditions; all must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataFilter {
    pub must: Vec<(String, Value)>,
}

impl From<&Selector> for MetadataFilter {
    fn from(sel: &Selector) -> Self {
        Self {
            must: vec![
                ("exam".to_string(), Value::from(sel.exam)),
                ("section".to_string(), Value::from(sel.section.as_str())),
                ("question".to_string(), Value::from(sel.question)),
            ],
        }
    }
}

/// A single nearest-neighbour match with its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexMatch {
    pub score: f32,
    pub metadata: Value,
}

impl IndexMatch {
    /// `text`, else `answer`; blank strings count as missing.
    pub fn snippet(&self) -> Option<&str> {
        ["text", "answer"].iter().find_map(|key| {
            self.metadata
                .get(*key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
    }
}

/// Which chat configuration to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatProfile {
    /// Formats retrieved snippets into an HTML list.
    Formatter,
    /// Explains an exact exam question step by step.
    Tutor,
}

pub trait Embedder: Send + Sync {
    fn embed_text<'a>(&'a self, text: &'a str) -> BoxFuture<'a, CallResult<Vec<f32>>>;
    fn embed_image<'a>(&'a self, bytes: &'a [u8]) -> BoxFuture<'a, CallResult<Vec<f32>>>;
}

pub trait VectorIndex: Send + Sync {
    /// Dimensionality of the stored vectors.
    fn dimension(&self) -> usize;

    /// All-zero query vector for lookups that rely on the filter alone.
    fn placeholder(&self) -> Vec<f32> {
        vec![0.0; self.dimension()]
    }

    fn query<'a>(
        &'a self,
        vector: Vec<f32>,
        top_k: u64,
        filter: Option<MetadataFilter>,
    ) -> BoxFuture<'a, CallResult<Vec<IndexMatch>>>;
}

pub trait ChatModel: Send + Sync {
    fn complete<'a>(
        &'a self,
        profile: ChatProfile,
        system: &'a str,
        user: &'a str,
    ) -> BoxFuture<'a, CallResult<String>>;
}

/// Source of a random reference text, used when the index has nothing.
pub trait ReferenceSource: Send + Sync {
    fn fetch_random(&self) -> BoxFuture<'_, CallResult<String>>;
}

pub trait ImageFetcher: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, CallResult<Vec<u8>>>;
}

/// Everything the pipeline talks to. Built once at startup.
#[derive(Clone)]
pub struct Collaborators {
    pub embedder: Arc<dyn Embedder>,
    pub index: Arc<dyn VectorIndex>,
    pub chat: Arc<dyn ChatModel>,
    pub reference: Arc<dyn ReferenceSource>,
    pub images: Arc<dyn ImageFetcher>,
}
