//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! All Qdrant interactions go through this facade so the rest of the
//! workspace never touches the builder API or protobuf values.

use crate::config::RagConfig;
use crate::errors::RagError;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{Filter, SearchPointsBuilder, Value as QValue};
use tracing::{debug, info};

/// A facade over the Qdrant client bound to one collection.
pub struct QdrantFacade {
    client: Qdrant,
    pub(crate) collection: String,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    ///
    /// Supports optional API key authentication. The client connects lazily,
    /// so construction does not touch the network.
    pub fn new(cfg: &RagConfig) -> Result<Self, RagError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        info!(
            url = %cfg.qdrant_url,
            collection = %cfg.collection,
            "Qdrant facade initialized"
        );

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
        })
    }

    /// Performs a similarity search, optionally restricted by a payload filter.
    ///
    /// Returns `(score, payload)` tuples sorted by score.
    pub async fn search(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        filter: Option<Filter>,
    ) -> Result<Vec<(f32, serde_json::Value)>, RagError> {
        debug!(
            collection = %self.collection,
            top_k,
            filtered = filter.is_some(),
            "searching"
        );

        let mut builder =
            SearchPointsBuilder::new(&self.collection, vector, top_k).with_payload(true);
        if let Some(f) = filter {
            builder = builder.filter(f);
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        let out: Vec<_> = res
            .result
            .into_iter()
            .map(|r| (r.score, qpayload_to_json(r.payload)))
            .collect();

        debug!("Search completed: {} hits returned", out.len());
        Ok(out)
    }
}

/// Converts a Qdrant payload (`HashMap<String, qdrant::Value>`) into a JSON object.
pub(crate) fn qpayload_to_json(
    mut p: std::collections::HashMap<String, QValue>,
) -> serde_json::Value {
    let mut m = serde_json::Map::new();
    for (k, v) in p.drain() {
        m.insert(k, qvalue_to_json(v));
    }
    serde_json::Value::Object(m)
}

fn qvalue_to_json(v: QValue) -> serde_json::Value {
    use qdrant_client::qdrant::value::Kind as K;
    match v.kind {
        Some(K::StringValue(s)) => serde_json::Value::String(s),
        Some(K::IntegerValue(i)) => serde_json::Value::Number(i.into()),
        Some(K::DoubleValue(f)) => serde_json::json!(f),
        Some(K::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(K::ListValue(list)) => {
            serde_json::Value::Array(list.values.into_iter().map(qvalue_to_json).collect())
        }
        Some(K::StructValue(st)) => qpayload_to_json(st.fields),
        Some(K::NullValue(_)) | None => serde_json::Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdrant_client::qdrant::value::Kind as K;
    use qdrant_client::qdrant::{ListValue, Struct};
    use std::collections::HashMap;

    fn qv(kind: K) -> QValue {
        QValue { kind: Some(kind) }
    }

    #[test]
    fn payload_scalars_and_nested_values_convert() {
        let mut inner = HashMap::new();
        inner.insert("page".to_string(), qv(K::IntegerValue(3)));

        let mut p = HashMap::new();
        p.insert("text".to_string(), qv(K::StringValue("x^2-4=0".into())));
        p.insert("exam".to_string(), qv(K::IntegerValue(1)));
        p.insert("weight".to_string(), qv(K::DoubleValue(0.5)));
        p.insert("verified".to_string(), qv(K::BoolValue(true)));
        p.insert(
            "tags".to_string(),
            qv(K::ListValue(ListValue {
                values: vec![qv(K::StringValue("algebra".into()))],
            })),
        );
        p.insert("source".to_string(), qv(K::StructValue(Struct { fields: inner })));
        p.insert("empty".to_string(), QValue { kind: None });

        let j = qpayload_to_json(p);
        assert_eq!(
            j,
            serde_json::json!({
                "text": "x^2-4=0",
                "exam": 1,
                "weight": 0.5,
                "verified": true,
                "tags": ["algebra"],
                "source": { "page": 3 },
                "empty": null
            })
        );
    }
}
