use serde::{Deserialize, Serialize};

use crate::types::Message;

/// Parameters for a chat completion request.
///
/// The message list always carries the full conversation history in order;
/// the client never truncates or summarizes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionParams {
    /// The model to generate the completion with.
    pub model: String,

    /// The ordered conversation history, oldest first.
    pub messages: Vec<Message>,

    /// Sampling temperature in `[0.0, 1.0]`.
    pub temperature: f32,

    /// Maximum tokens to generate for the reply.
    pub max_tokens: u32,

    /// Whether the server should stream the reply as SSE deltas.
    pub stream: bool,
}

impl ChatCompletionParams {
    /// Create new completion parameters.
    pub fn new(
        model: impl Into<String>,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
        stream: bool,
    ) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature,
            max_tokens,
            stream,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn params_serialization() {
        // 0.5 is exactly representable, so the JSON number compares equal.
        let params = ChatCompletionParams::new(
            "openai/gpt-4-turbo-preview",
            vec![Message::user("Hi")],
            0.5,
            1000,
            true,
        );
        let json = to_value(&params).unwrap();
        assert_eq!(
            json,
            json!({
                "model": "openai/gpt-4-turbo-preview",
                "messages": [{"role": "user", "content": "Hi"}],
                "temperature": 0.5,
                "max_tokens": 1000,
                "stream": true
            })
        );
    }

    #[test]
    fn params_preserve_message_order() {
        let params = ChatCompletionParams::new(
            "m1",
            vec![
                Message::user("one"),
                Message::assistant("two"),
                Message::user("three"),
            ],
            0.0,
            100,
            false,
        );
        let json = to_value(&params).unwrap();
        let contents: Vec<&str> = json["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["content"].as_str().unwrap())
            .collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
    }
}
