//! The request pipeline: validate, retrieve, fall back, format, assemble.

use tracing::{debug, info, warn};

use crate::{
    collaborators::{ChatProfile, Collaborators, MetadataFilter},
    error::ArbiterError,
    prompt,
    query::{Mode, Query, SearchInput, Selector},
    render,
};

/// Neighbours fetched in embedding-search mode.
pub const SEARCH_TOP_K: u64 = 5;
/// Exact lookup wants at most one point.
pub const LOOKUP_TOP_K: u64 = 1;

/// Answers tutor queries against a fixed set of collaborators.
#[derive(Clone)]
pub struct Arbiter {
    deps: Collaborators,
}

impl Arbiter {
    pub fn new(deps: Collaborators) -> Self {
        Self { deps }
    }

    /// Produces the HTML answer fragment for `query`.
    ///
    /// # Errors
    /// Input errors are reported before any collaborator is called. Embedding,
    /// image download, chat and exhausted-fallback failures abort the request.
    /// Index failures never surface; they lead to the fallback chain.
    pub async fn answer(&self, query: &Query) -> Result<String, ArbiterError> {
        let plan = query.validate()?;

        let body = match plan.mode {
            Mode::ExactLookup(sel) => match self.exact_lookup(&sel).await? {
                Some(body) => body,
                None => {
                    info!(selector = %sel.describe(), "no exact match; falling back to search");
                    self.embedding_search(SearchInput::Text(sel.describe()))
                        .await?
                }
            },
            Mode::EmbeddingSearch(input) => self.embedding_search(input).await?,
        };

        Ok(render::assemble(&plan.echo, &body))
    }

    /// `Ok(None)` when the index has no usable match or fails.
    async fn exact_lookup(&self, sel: &Selector) -> Result<Option<String>, ArbiterError> {
        let vector = self.deps.index.placeholder();
        let filter = MetadataFilter::from(sel);

        let matches = match self.deps.index.query(vector, LOOKUP_TOP_K, Some(filter)).await {
            Ok(m) => m,
            Err(e) => {
                warn!(error = %e, selector = %sel.describe(), "exact lookup failed");
                return Ok(None);
            }
        };

        let Some(snippet) = matches.iter().find_map(|m| m.snippet()) else {
            return Ok(None);
        };
        let snippet = render::strip_dollars(snippet);
        debug!(selector = %sel.describe(), "exact match found");

        let explanation = self
            .deps
            .chat
            .complete(
                ChatProfile::Tutor,
                prompt::TUTOR_SYSTEM,
                &prompt::tutor_user(&sel.describe(), snippet),
            )
            .await
            .map_err(|e| ArbiterError::ChatFailure(e.to_string()))?;

        Ok(Some(render::exact_body(snippet, &explanation)))
    }

    async fn embedding_search(&self, input: SearchInput) -> Result<String, ArbiterError> {
        let vector = self.embed(input).await?;

        let snippets: Vec<String> = match self.deps.index.query(vector, SEARCH_TOP_K, None).await {
            Ok(matches) => matches
                .iter()
                .filter_map(|m| m.snippet())
                .map(str::to_string)
                .collect(),
            Err(e) => {
                warn!(error = %e, "index query failed");
                Vec::new()
            }
        };

        let snippets = if snippets.is_empty() {
            info!("no snippets from index; fetching random reference");
            let text = self
                .deps
                .reference
                .fetch_random()
                .await
                .map_err(|e| ArbiterError::FallbackExhausted(e.to_string()))?;
            let text = text.trim();
            if text.is_empty() {
                return Err(ArbiterError::FallbackExhausted(
                    "artículo vacío".to_string(),
                ));
            }
            vec![text.to_string()]
        } else {
            snippets
        };

        debug!(count = snippets.len(), "formatting snippets");
        let system = prompt::formatter_system(&snippets);
        let body = self
            .deps
            .chat
            .complete(ChatProfile::Formatter, &system, prompt::FORMATTER_USER)
            .await
            .map_err(|e| ArbiterError::ChatFailure(e.to_string()))?;

        Ok(body.trim().to_string())
    }

    async fn embed(&self, input: SearchInput) -> Result<Vec<f32>, ArbiterError> {
        let embedded = match input {
            SearchInput::Text(text) => self.deps.embedder.embed_text(&text).await,
            SearchInput::ImageBytes(bytes) => self.deps.embedder.embed_image(&bytes).await,
            SearchInput::ImageUrl(url) => {
                let bytes = self
                    .deps
                    .images
                    .fetch(&url)
                    .await
                    .map_err(|e| ArbiterError::ImageFetchFailure(e.to_string()))?;
                self.deps.embedder.embed_image(&bytes).await
            }
        };
        embedded.map_err(|e| ArbiterError::EmbeddingFailure(e.to_string()))
    }
}
