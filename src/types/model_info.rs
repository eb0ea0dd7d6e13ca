use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Information about one model in the OpenRouter catalog.
///
/// The catalog endpoint reports many more fields (pricing, architecture,
/// per-request limits); only the ones the client reads are modeled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Unique model identifier, e.g. `anthropic/claude-3-opus`.
    pub id: String,

    /// A human-readable name for the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Unix timestamp of when the model was added to the catalog.
    #[serde(
        default,
        with = "time::serde::timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created: Option<OffsetDateTime>,

    /// Maximum context window, in tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn model_info_deserialization() {
        let info: ModelInfo = serde_json::from_value(json!({
            "id": "anthropic/claude-3-opus",
            "name": "Anthropic: Claude 3 Opus",
            "created": 1709596800,
            "context_length": 200000
        }))
        .unwrap();
        assert_eq!(info.id, "anthropic/claude-3-opus");
        assert_eq!(info.name.as_deref(), Some("Anthropic: Claude 3 Opus"));
        assert_eq!(info.created, Some(datetime!(2024-03-05 0:00:00 UTC)));
        assert_eq!(info.context_length, Some(200000));
    }

    #[test]
    fn minimal_model_info() {
        let info: ModelInfo =
            serde_json::from_value(json!({"id": "mistralai/mistral-7b-instruct"})).unwrap();
        assert_eq!(info.id, "mistralai/mistral-7b-instruct");
        assert!(info.name.is_none());
        assert!(info.created.is_none());
        assert!(info.context_length.is_none());
    }

    #[test]
    fn missing_id_rejected() {
        let result = serde_json::from_value::<ModelInfo>(json!({"name": "anonymous"}));
        assert!(result.is_err());
    }
}
