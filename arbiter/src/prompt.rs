//! Prompt builders for the two chat profiles.

/// Strict formatter instruction with the snippets as `- snippet` lines.
pub fn formatter_system(snippets: &[String]) -> String {
    let mut out = String::from(
        "Eres un formateador HTML muy estricto. Toma estas frases y devuélvelas \
         como una lista ordenada (<ol><li>…</li></ol>) en español, sin texto \
         adicional. Usa siempre los delimitadores LaTeX \\(…\\) para las fórmulas.\n",
    );
    for s in snippets {
        out.push_str("\n- ");
        out.push_str(s.trim());
    }
    out
}

pub const FORMATTER_USER: &str = "Por favor formatea la lista.";

pub const TUTOR_SYSTEM: &str = "Eres un profesor de matemáticas que explica de forma muy \
    concisa en español, en no más de 5 pasos numerados, usando delimitadores \\(…\\) \
    para las expresiones matemáticas.";

/// Asks for at most five key steps for the question at `context`.
pub fn tutor_user(context: &str, snippet: &str) -> String {
    format!(
        "Ecuación: {context}\nRespuesta: \\({snippet}\\)\n\n\
         Proporciona una lista numerada (1–5) de los pasos clave para resolverla rápidamente."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatter_lists_each_snippet() {
        let sys = formatter_system(&["uno".to_string(), " dos ".to_string()]);
        assert!(sys.ends_with("\n- uno\n- dos"));
        assert!(sys.contains("\\(…\\)"));
    }

    #[test]
    fn tutor_prompt_wraps_snippet() {
        let p = tutor_user("Examen 1, Sección Matemáticas, Pregunta 4", "x^2-4=0");
        assert!(p.starts_with("Ecuación: Examen 1, Sección Matemáticas, Pregunta 4\n"));
        assert!(p.contains("Respuesta: \\(x^2-4=0\\)"));
    }
}
