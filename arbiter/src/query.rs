//! Request inputs and the pure validation / mode-selection step.

use crate::error::ArbiterError;

/// One request's raw inputs, as received from the form.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Free-text question.
    pub text: String,
    pub exam: Option<String>,
    pub section: Option<String>,
    pub question: Option<String>,
    /// Uploaded image bytes.
    pub image: Option<Vec<u8>>,
    pub image_url: Option<String>,
}

/// A complete, parsed exam selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub exam: u32,
    pub section: String,
    pub question: u32,
}

impl Selector {
    /// Human-readable form, also used as embedding input when the exact
    /// lookup misses.
    pub fn describe(&self) -> String {
        format!(
            "Examen {}, Sección {}, Pregunta {}",
            self.exam, self.section, self.question
        )
    }
}

/// What the embedding search operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchInput {
    Text(String),
    ImageBytes(Vec<u8>),
    ImageUrl(String),
}

/// Retrieval path chosen for a valid query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    ExactLookup(Selector),
    EmbeddingSearch(SearchInput),
}

/// Query fields echoed back in the answer; blank when not supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Echo {
    pub text: String,
    pub exam: String,
    pub section: String,
    pub question: String,
}

/// Outcome of validation: the mode to run and the fields to echo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub mode: Mode,
    pub echo: Echo,
}

fn clean(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_positive(value: &str, field: &'static str) -> Result<u32, ArbiterError> {
    value
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or(ArbiterError::SelectorMalformed(field))
}

impl Query {
    /// Validates the inputs and picks the retrieval mode. No I/O.
    ///
    /// Rules, in order:
    /// 1. free text together with any selector field or image → `InputConflict`
    /// 2. nothing supplied → `InputMissing`
    /// 3. exam without section and question → `SelectorIncomplete`
    /// 4. section/question with no exam and no other channel → `SelectorIncomplete`
    /// 5. complete selector with non-numeric exam/question → `SelectorMalformed`
    pub fn validate(&self) -> Result<Plan, ArbiterError> {
        let text = self.text.trim();
        let exam = clean(&self.exam);
        let section = clean(&self.section);
        let question = clean(&self.question);
        let image = self.image.as_ref().filter(|b| !b.is_empty());
        let image_url = clean(&self.image_url);

        let has_text = !text.is_empty();
        let has_selector_field = exam.is_some() || section.is_some() || question.is_some();
        let has_image = image.is_some() || image_url.is_some();

        if has_text && (has_selector_field || has_image) {
            return Err(ArbiterError::InputConflict);
        }
        if !has_text && !has_selector_field && !has_image {
            return Err(ArbiterError::InputMissing);
        }

        let selector = match (exam, section, question) {
            (Some(e), Some(s), Some(q)) => Some(Selector {
                exam: parse_positive(e, "examen")?,
                section: s.to_string(),
                question: parse_positive(q, "pregunta")?,
            }),
            (Some(_), _, _) => return Err(ArbiterError::SelectorIncomplete),
            (None, _, _) if has_selector_field && !has_image => {
                return Err(ArbiterError::SelectorIncomplete);
            }
            _ => None,
        };

        let mode = if let (Some(sel), false) = (selector, has_image) {
            Mode::ExactLookup(sel)
        } else if has_text {
            Mode::EmbeddingSearch(SearchInput::Text(text.to_string()))
        } else if let Some(bytes) = image {
            Mode::EmbeddingSearch(SearchInput::ImageBytes(bytes.clone()))
        } else if let Some(url) = image_url {
            Mode::EmbeddingSearch(SearchInput::ImageUrl(url.to_string()))
        } else {
            return Err(ArbiterError::InputMissing);
        };

        Ok(Plan {
            mode,
            echo: Echo {
                text: text.to_string(),
                exam: exam.unwrap_or_default().to_string(),
                section: section.unwrap_or_default().to_string(),
                question: question.unwrap_or_default().to_string(),
            },
        })
    }
}
