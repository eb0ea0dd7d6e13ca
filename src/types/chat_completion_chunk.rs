use serde::{Deserialize, Serialize};

/// One incremental event of a streamed chat completion.
///
/// The stream is finite and not restartable; concatenating the delta
/// content of every chunk in arrival order yields the full reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatCompletionChunk {
    /// Identifier the server assigned to this completion, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The candidate deltas. In practice the server returns one; an absent
    /// or empty collection carries no text.
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

/// One candidate delta inside a [`ChatCompletionChunk`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkChoice {
    /// The incremental payload for this choice.
    pub delta: ChunkDelta,

    /// Why the model stopped generating, if reported. Only present on the
    /// final content chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// The incremental payload of a streamed choice.
///
/// The first chunk typically carries only `role`; the final chunk may carry
/// neither field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkDelta {
    /// Role announcement, present on the first chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// The text fragment, absent on role-only and final chunks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ChatCompletionChunk {
    /// Returns the text fragment of the first choice, if any.
    pub fn delta_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.delta.content.as_deref())
    }
}
