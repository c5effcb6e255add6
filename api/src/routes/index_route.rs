//! GET /: the question form.

use std::sync::Arc;

use axum::{extract::State, response::Html};

use crate::core::{app_state::AppState, exam_catalog::ExamCatalog};

const TEMPLATE: &str = include_str!("../../static/index.html");

fn options<I, T>(values: I) -> String
where
    I: IntoIterator<Item = T>,
    T: std::fmt::Display,
{
    values
        .into_iter()
        .map(|v| format!(r#"<option value="{v}">{v}</option>"#))
        .collect::<Vec<_>>()
        .join("")
}

/// Fills the template's selector placeholders from the catalog.
pub fn render_form(catalog: &ExamCatalog) -> String {
    TEMPLATE
        .replace("{{exam_options}}", &options(catalog.exams.enabled()))
        .replace(
            "{{section_options}}",
            &options(catalog.sections.iter().map(|s| arbiter::render::escape_html(s))),
        )
        .replace("{{question_options}}", &options(catalog.questions.enabled()))
}

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_form(&state.catalog))
}
