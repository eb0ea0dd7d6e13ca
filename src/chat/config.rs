//! Configuration for a chat session.
//!
//! All values are supplied interactively; there are no CLI flags,
//! environment variables, or config files behind this struct.

use crate::error::{Error, Result};

/// Default model when the user has not picked one from the catalog.
pub const DEFAULT_MODEL: &str = "openai/gpt-4-turbo-preview";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default maximum tokens per reply.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Inclusive bounds for the sampling temperature.
pub const TEMPERATURE_RANGE: (f32, f32) = (0.0, 1.0);

/// Inclusive bounds for the max-token limit.
pub const MAX_TOKENS_RANGE: (u32, u32) = (100, 4096);

/// The user-adjustable request parameters for a chat session.
///
/// Rebuilt into a request payload on every interaction; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// The OpenRouter API key, sent as a bearer credential.
    pub api_key: String,

    /// The model to generate replies with.
    pub model: String,

    /// Sampling temperature in `[0.0, 1.0]`.
    pub temperature: f32,

    /// Maximum tokens per reply, in `[100, 4096]`.
    pub max_tokens: u32,

    /// Whether replies stream incrementally or arrive in one response.
    pub stream: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: openai/gpt-4-turbo-preview
    /// - Temperature: 0.7
    /// - Max tokens: 1000
    /// - Streaming: enabled
    /// - API key: empty (must be set before the first request)
    pub fn new() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            stream: true,
        }
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Sets the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the maximum tokens per reply.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the transport mode: `true` streams fragments, `false` waits
    /// for one complete response.
    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Returns true when a non-blank credential is configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Validates the numeric parameters against their allowed ranges.
    pub fn validate(&self) -> Result<()> {
        let (temp_min, temp_max) = TEMPERATURE_RANGE;
        if !self.temperature.is_finite() || self.temperature < temp_min || self.temperature > temp_max
        {
            return Err(Error::validation(
                format!("temperature must be between {temp_min} and {temp_max}"),
                Some("temperature".to_string()),
            ));
        }
        let (tokens_min, tokens_max) = MAX_TOKENS_RANGE;
        if self.max_tokens < tokens_min || self.max_tokens > tokens_max {
            return Err(Error::validation(
                format!("max_tokens must be between {tokens_min} and {tokens_max}"),
                Some("max_tokens".to_string()),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(Error::validation(
                "model must not be empty",
                Some("model".to_string()),
            ));
        }
        Ok(())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert!(config.stream);
        assert!(!config.has_api_key());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_api_key("sk-or-test")
            .with_model("anthropic/claude-3-opus")
            .with_temperature(0.2)
            .with_max_tokens(2048)
            .with_stream(false);

        assert_eq!(config.api_key, "sk-or-test");
        assert_eq!(config.model, "anthropic/claude-3-opus");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_tokens, 2048);
        assert!(!config.stream);
        assert!(config.has_api_key());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_api_key_is_missing() {
        let config = ChatConfig::new().with_api_key("   ");
        assert!(!config.has_api_key());
    }

    #[test]
    fn temperature_out_of_range() {
        let config = ChatConfig::new().with_temperature(1.5);
        let err = config.validate().unwrap_err();
        assert!(err.is_validation());

        let config = ChatConfig::new().with_temperature(f32::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn max_tokens_out_of_range() {
        assert!(ChatConfig::new().with_max_tokens(99).validate().is_err());
        assert!(ChatConfig::new().with_max_tokens(4097).validate().is_err());
        assert!(ChatConfig::new().with_max_tokens(100).validate().is_ok());
        assert!(ChatConfig::new().with_max_tokens(4096).validate().is_ok());
    }

    #[test]
    fn empty_model_rejected() {
        let config = ChatConfig::new().with_model("  ");
        assert!(config.validate().is_err());
    }
}
