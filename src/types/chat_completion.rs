use serde::{Deserialize, Serialize};

use crate::types::Message;

/// A complete (non-streaming) chat completion response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletion {
    /// Identifier the server assigned to this completion, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The candidate replies. In practice the server returns one; an
    /// absent or empty collection is not an error.
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// One candidate reply inside a [`ChatCompletion`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatChoice {
    /// The assistant message for this choice.
    pub message: Message,

    /// Why the model stopped generating, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl ChatCompletion {
    /// Extracts the reply text from the first choice.
    ///
    /// Returns `None` when the server sent no choices; the caller decides
    /// what to show in that case.
    pub fn into_reply(self) -> Option<String> {
        self.choices.into_iter().next().map(|c| c.message.content)
    }
}
