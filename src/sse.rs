//! Server-Sent Events (SSE) processing for streaming responses.
//!
//! This module converts the raw byte stream of a streaming completion into
//! structured [`ChatCompletionChunk`] values. OpenRouter uses the OpenAI
//! framing: every frame is a `data:` line carrying JSON, comment lines
//! (leading `:`) keep the connection alive while a request is queued, and
//! the literal `data: [DONE]` terminates the stream.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::error::{Error, Result};
use crate::observability::{STREAM_ERRORS, STREAM_EVENTS};
use crate::types::ChatCompletionChunk;

/// One decoded SSE frame.
enum Frame {
    /// A `data:` frame carrying a chunk (or a parse failure).
    Data(Result<ChatCompletionChunk>),
    /// The `data: [DONE]` terminator.
    Done,
    /// A comment or otherwise empty frame.
    Skip,
}

/// Process a stream of bytes into a stream of completion chunks.
///
/// This function takes a byte stream from an HTTP response and converts it
/// into parsed [`ChatCompletionChunk`] values, handling SSE framing,
/// buffering across chunk boundaries, and error conditions. The resulting
/// stream is finite: it ends at `[DONE]` or when the transport closes.
pub fn process_sse<S>(byte_stream: S) -> impl Stream<Item = Result<ChatCompletionChunk>>
where
    S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin + 'static,
{
    // Convert reqwest errors to our error type
    let stream = byte_stream.map(|result| {
        result
            .map_err(|e| Error::streaming(format!("Error in HTTP stream: {e}"), Some(Box::new(e))))
    });

    // Use a state machine to process the SSE stream
    let buffer = String::new();

    stream::unfold(
        (stream, buffer),
        move |(mut stream, mut buffer)| async move {
            loop {
                // First check if we have a complete frame in the buffer
                if let Some((frame, remaining)) = extract_frame(&buffer) {
                    buffer = remaining;
                    match frame {
                        Frame::Done => return None,
                        Frame::Skip => continue,
                        Frame::Data(item) => {
                            if item.is_ok() {
                                STREAM_EVENTS.click();
                            } else {
                                STREAM_ERRORS.click();
                            }
                            return Some((item, (stream, buffer)));
                        }
                    }
                }

                // Read more data
                match stream.next().await {
                    Some(Ok(bytes)) => match String::from_utf8(bytes.to_vec()) {
                        Ok(text) => buffer.push_str(&text),
                        Err(e) => {
                            STREAM_ERRORS.click();
                            return Some((
                                Err(Error::encoding(
                                    format!("Invalid UTF-8 in stream: {e}"),
                                    Some(Box::new(e)),
                                )),
                                (stream, buffer),
                            ));
                        }
                    },
                    Some(Err(e)) => {
                        STREAM_ERRORS.click();
                        return Some((Err(e), (stream, buffer)));
                    }
                    None => {
                        return None;
                    }
                }
            }
        },
    )
}

/// Extract a complete SSE frame from a buffer string.
///
/// Frames are delimited by blank lines. Within a frame, only `data:` lines
/// matter; comment lines such as `: OPENROUTER PROCESSING` are ignored.
fn extract_frame(buffer: &str) -> Option<(Frame, String)> {
    let (frame_text, rest) = buffer.split_once("\n\n")?;
    let rest = rest.to_string();

    let mut data = None;
    for line in frame_text.lines() {
        if let Some(payload) = line.strip_prefix("data:") {
            data = Some(payload.trim());
        }
    }

    match data {
        Some("[DONE]") => Some((Frame::Done, rest)),
        Some(json_str) => match serde_json::from_str::<ChatCompletionChunk>(json_str) {
            Ok(chunk) => Some((Frame::Data(Ok(chunk)), rest)),
            Err(e) => Some((Frame::Data(Err(e.into())), rest)),
        },
        None => Some((Frame::Skip, rest)),
    }
}
