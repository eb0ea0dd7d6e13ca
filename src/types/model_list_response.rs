use serde::{Deserialize, Serialize};

use crate::types::ModelInfo;

/// Response from the model catalog endpoint.
///
/// A body without the `data` field is malformed and fails to deserialize;
/// callers treat that the same as any other fetch failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelListResponse {
    /// The models in the catalog, in server-provided order.
    pub data: Vec<ModelInfo>,
}

impl ModelListResponse {
    /// Create a new `ModelListResponse`.
    pub fn new(data: Vec<ModelInfo>) -> Self {
        Self { data }
    }

    /// Returns the model identifiers, preserving server order.
    pub fn model_ids(&self) -> Vec<String> {
        self.data.iter().map(|info| info.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn model_list_deserialization() {
        let response: ModelListResponse = serde_json::from_value(json!({
            "data": [
                {"id": "openai/gpt-4"},
                {"id": "anthropic/claude-3-sonnet"}
            ]
        }))
        .unwrap();
        assert_eq!(
            response.model_ids(),
            vec!["openai/gpt-4", "anthropic/claude-3-sonnet"]
        );
    }

    #[test]
    fn server_order_preserved() {
        let response: ModelListResponse = serde_json::from_value(json!({
            "data": [{"id": "z"}, {"id": "a"}, {"id": "m"}]
        }))
        .unwrap();
        assert_eq!(response.model_ids(), vec!["z", "a", "m"]);
    }

    #[test]
    fn missing_data_field_rejected() {
        let result = serde_json::from_value::<ModelListResponse>(json!({
            "models": [{"id": "openai/gpt-4"}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn empty_catalog() {
        let response: ModelListResponse = serde_json::from_value(json!({"data": []})).unwrap();
        assert!(response.model_ids().is_empty());
    }
}
