//! Request arbitration for the PAA tutor.
//!
//! A [`Query`] is validated into a retrieval mode, answered through the
//! [`Collaborators`] (embedder, vector index, chat model, reference source,
//! image fetcher) and rendered as an HTML fragment.
//!
//! ```no_run
//! # async fn run(deps: arbiter::Collaborators) -> Result<(), arbiter::ArbiterError> {
//! let arbiter = arbiter::Arbiter::new(deps);
//! let query = arbiter::Query { text: "¿Qué es un polígono?".into(), ..Default::default() };
//! let html = arbiter.answer(&query).await?;
//! println!("{html}");
//! # Ok(()) }
//! ```

mod adapters;
pub mod collaborators;
mod error;
pub mod pipeline;
pub mod prompt;
mod query;
pub mod render;

pub use collaborators::{
    BoxFuture, CallResult, ChatModel, ChatProfile, CollaboratorError, Collaborators, Embedder,
    ImageFetcher, IndexMatch, MetadataFilter, ReferenceSource, VectorIndex,
};
pub use error::ArbiterError;
pub use pipeline::Arbiter;
pub use query::{Echo, Mode, Plan, Query, SearchInput, Selector};
