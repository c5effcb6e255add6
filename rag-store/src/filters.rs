//! Filter conversion to Qdrant `Filter`.
//!
//! Supports exact equality on scalar fields (`String`, integer `Number`, `Bool`).

use crate::record::RagFilter;
use qdrant_client::qdrant::{
    Condition, FieldCondition, Filter, Match, condition::ConditionOneOf, r#match::MatchValue,
};
use tracing::{debug, warn};

/// Converts [`RagFilter`] to a Qdrant [`Filter`] where all conditions must match.
///
/// - `String` → `Keyword`
/// - integer `Number` → `Integer`
/// - `Bool`   → `Boolean`
///
/// Unsupported values (floats, arrays, objects, null) are skipped with a warning.
pub fn to_qdrant_filter(f: &RagFilter) -> Filter {
    debug!("filters::to_qdrant_filter must={}", f.must.len());

    let mut must: Vec<Condition> = Vec::with_capacity(f.must.len());

    for (field, val) in &f.must {
        let match_value = match val {
            serde_json::Value::String(s) => MatchValue::Keyword(s.clone()),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => MatchValue::Integer(i),
                None => {
                    warn!(field = %field, "skipping non-integer numeric filter");
                    continue;
                }
            },
            serde_json::Value::Bool(b) => MatchValue::Boolean(*b),
            _ => {
                warn!(field = %field, "skipping unsupported filter value type");
                continue;
            }
        };

        must.push(Condition {
            condition_one_of: Some(ConditionOneOf::Field(FieldCondition {
                key: field.clone(),
                r#match: Some(Match {
                    match_value: Some(match_value),
                }),
                ..Default::default()
            })),
        });
    }

    Filter {
        must,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_match(c: &Condition) -> (&str, &MatchValue) {
        match &c.condition_one_of {
            Some(ConditionOneOf::Field(fc)) => (
                fc.key.as_str(),
                fc.r#match
                    .as_ref()
                    .and_then(|m| m.match_value.as_ref())
                    .expect("match value"),
            ),
            other => panic!("unexpected condition: {other:?}"),
        }
    }

    #[test]
    fn exam_selector_becomes_must_conditions() {
        let f = RagFilter::new()
            .eq("exam", 2)
            .eq("section", "Matemáticas")
            .eq("question", 17);
        let q = to_qdrant_filter(&f);

        assert!(q.should.is_empty());
        assert_eq!(q.must.len(), 3);
        assert_eq!(field_match(&q.must[0]), ("exam", &MatchValue::Integer(2)));
        assert_eq!(
            field_match(&q.must[1]),
            ("section", &MatchValue::Keyword("Matemáticas".into()))
        );
        assert_eq!(field_match(&q.must[2]), ("question", &MatchValue::Integer(17)));
    }

    #[test]
    fn unsupported_values_are_skipped() {
        let f = RagFilter::new()
            .eq("score", 0.5)
            .eq("tags", serde_json::json!(["a"]))
            .eq("active", true);
        let q = to_qdrant_filter(&f);
        assert_eq!(q.must.len(), 1);
        assert_eq!(field_match(&q.must[0]), ("active", &MatchValue::Boolean(true)));
    }
}
