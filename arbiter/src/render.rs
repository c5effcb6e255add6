//! HTML assembly for the answer fragment.

use crate::query::Echo;

/// Trailing marker appended after every answer body.
pub const ANSWER_MARKER: &str = " 🤌";

/// Minimal HTML text escaping for echoed user input.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Rewrites display-math delimiters `\[ \]` to inline `\( \)`.
pub fn inline_math(body: &str) -> String {
    body.replace("\\[", "\\(").replace("\\]", "\\)")
}

/// Removes surrounding `$` signs from an index snippet.
pub fn strip_dollars(snippet: &str) -> &str {
    snippet.trim().trim_matches('$').trim()
}

/// Body for an exact-lookup hit: the question, then the tutor's steps.
pub fn exact_body(snippet: &str, explanation: &str) -> String {
    format!(
        "<ol><li>\\({snippet}\\)</li></ol><p><strong>Pasos rápidos:</strong></p>{}",
        explanation.trim()
    )
}

/// Final fragment: echoed query fields, body, marker.
pub fn assemble(echo: &Echo, body: &str) -> String {
    format!(
        "<p><strong>Enunciado:</strong> {}</p>\
         <p><strong>Examen:</strong> {}</p>\
         <p><strong>Sección:</strong> {}</p>\
         <p><strong>Pregunta nº:</strong> {}</p>\
         {}{ANSWER_MARKER}",
        escape_html(&echo.text),
        escape_html(&echo.exam),
        escape_html(&echo.section),
        escape_html(&echo.question),
        inline_math(body),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b>"a" & 'b'</b>"#),
            "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn display_math_becomes_inline() {
        assert_eq!(inline_math(r"\[x^2\] y \(z\)"), r"\(x^2\) y \(z\)");
    }

    #[test]
    fn strips_dollar_signs() {
        assert_eq!(strip_dollars(" $x^2-4=0$ "), "x^2-4=0");
        assert_eq!(strip_dollars("$$a+b$$"), "a+b");
    }

    #[test]
    fn assembles_fragment() {
        let echo = Echo {
            exam: "1".into(),
            section: "Matemáticas".into(),
            question: "4".into(),
            ..Default::default()
        };
        let html = assemble(&echo, "<ol><li>\\[a\\]</li></ol>");
        assert_eq!(
            html,
            "<p><strong>Enunciado:</strong> </p>\
             <p><strong>Examen:</strong> 1</p>\
             <p><strong>Sección:</strong> Matemáticas</p>\
             <p><strong>Pregunta nº:</strong> 4</p>\
             <ol><li>\\(a\\)</li></ol> 🤌"
        );
    }
}
