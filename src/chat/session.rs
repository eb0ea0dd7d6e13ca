//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the
//! conversation history and drives one request/response cycle at a time.
//! The session is the only holder of state: create one per user session,
//! drop it when the session ends.

use futures::StreamExt;

use crate::chat::config::ChatConfig;
use crate::client::CompletionClient;
use crate::error::{Error, Result};
use crate::render::Renderer;
use crate::types::{ChatCompletionParams, Message};

/// Shown in place of a reply when the server returns no choices.
///
/// This is a presentation fallback, not an error: the turn still counts as
/// successful and the sentinel is recorded as the assistant message.
const EMPTY_REPLY: &str = "No response from assistant.";

/// A chat session that manages conversation state and API interactions.
///
/// The conversation history is append-only: messages are never mutated,
/// reordered, or truncated, and every request carries the full history.
/// The one exception is rollback: a failed turn removes the messages it
/// added, so errors never pollute later requests.
pub struct ChatSession<C: CompletionClient> {
    client: C,
    config: ChatConfig,
    messages: Vec<Message>,
    request_count: u64,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// The model used for the session.
    pub model: String,
    /// The number of messages in the conversation.
    pub message_count: usize,
    /// The sampling temperature.
    pub temperature: f32,
    /// The maximum tokens per reply.
    pub max_tokens: u32,
    /// Whether replies stream incrementally.
    pub stream: bool,
    /// Whether a credential is configured.
    pub has_api_key: bool,
    /// Total number of API requests attempted.
    pub total_requests: u64,
}

impl<C: CompletionClient> ChatSession<C> {
    /// Creates a new chat session with the given client and configuration.
    pub fn new(client: C, config: ChatConfig) -> Self {
        Self {
            client,
            config,
            messages: Vec::new(),
            request_count: 0,
        }
    }

    /// Sends a user message and renders the reply.
    ///
    /// This method drives one full interaction cycle:
    /// 1. Refuses without a credential: no request is made and the input
    ///    is not recorded.
    /// 2. Adds the user message to history.
    /// 3. Requests a completion over the configured transport, streaming
    ///    fragments to the renderer as they arrive or printing the batch
    ///    reply once.
    /// 4. Adds the complete assistant reply to history, or rolls the
    ///    history back to its pre-turn state on failure.
    ///
    /// # Errors
    ///
    /// Returns an error if no credential is configured, if the config is
    /// out of range, or if the API request fails.
    pub async fn send_message(
        &mut self,
        user_input: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        if !self.config.has_api_key() {
            return Err(Error::authentication(
                "no API key configured; set one with /key",
            ));
        }
        self.config.validate()?;

        let previous_len = self.messages.len();
        self.messages.push(Message::user(user_input));

        let params = ChatCompletionParams::new(
            self.config.model.clone(),
            self.messages.clone(),
            self.config.temperature,
            self.config.max_tokens,
            self.config.stream,
        );

        self.request_count += 1;
        let outcome = if self.config.stream {
            self.stream_turn(&params, renderer).await
        } else {
            self.batch_turn(&params, renderer).await
        };

        match outcome {
            Ok(reply) => {
                renderer.finish_response();
                self.messages.push(Message::assistant(reply));
                Ok(())
            }
            Err(err) => {
                self.messages.truncate(previous_len);
                if !self.config.stream {
                    if let Ok(payload) = serde_json::to_string(&params) {
                        renderer.print_diagnostic(&format!("request payload: {payload}"));
                    }
                }
                Err(err)
            }
        }
    }

    /// One streaming turn: concatenate delta fragments in arrival order,
    /// rendering each as it lands. The final concatenation is the reply.
    async fn stream_turn(
        &self,
        params: &ChatCompletionParams,
        renderer: &mut dyn Renderer,
    ) -> Result<String> {
        let mut stream = self
            .client
            .complete_stream(&self.config.api_key, params.clone())
            .await?;

        let mut reply = String::new();
        while let Some(item) = stream.next().await {
            let chunk = item?;
            if let Some(fragment) = chunk.delta_text() {
                reply.push_str(fragment);
                renderer.print_text(fragment);
            }
        }
        Ok(reply)
    }

    /// One batch turn: a single request, reply extracted from the first
    /// choice, sentinel text when the server sent no choices.
    async fn batch_turn(
        &self,
        params: &ChatCompletionParams,
        renderer: &mut dyn Renderer,
    ) -> Result<String> {
        let completion = self
            .client
            .complete(&self.config.api_key, params.clone())
            .await?;
        let reply = completion
            .into_reply()
            .unwrap_or_else(|| EMPTY_REPLY.to_string());
        renderer.print_text(&reply);
        Ok(reply)
    }

    /// Returns the conversation history, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Replaces the API key.
    pub fn set_api_key(&mut self, api_key: String) {
        self.config.api_key = api_key;
    }

    /// Changes the model used for replies.
    pub fn set_model(&mut self, model: String) {
        self.config.model = model;
    }

    /// Sets the sampling temperature.
    pub fn set_temperature(&mut self, temperature: f32) {
        self.config.temperature = temperature;
    }

    /// Sets the maximum tokens per reply.
    pub fn set_max_tokens(&mut self, max_tokens: u32) {
        self.config.max_tokens = max_tokens;
    }

    /// Selects streaming or batch transport for subsequent turns.
    pub fn set_stream(&mut self, stream: bool) {
        self.config.stream = stream;
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            model: self.config.model.clone(),
            message_count: self.message_count(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stream: self.config.stream,
            has_api_key: self.config.has_api_key(),
            total_requests: self.request_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::stream;

    use super::*;
    use crate::client::ChunkStream;
    use crate::types::{ChatChoice, ChatCompletion, ChatCompletionChunk, ChunkChoice, ChunkDelta, Role};

    /// One scripted server behavior per expected request.
    enum Script {
        Reply(&'static str),
        EmptyChoices,
        Fail,
        Fragments(Vec<&'static str>),
        FragmentsThenFail(Vec<&'static str>),
    }

    struct MockClient {
        script: Mutex<VecDeque<Script>>,
        calls: AtomicUsize,
    }

    impl MockClient {
        fn new(script: Vec<Script>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn next_script(&self) -> Script {
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .expect("mock client ran out of scripted responses")
        }
    }

    fn chunk(text: &str) -> ChatCompletionChunk {
        ChatCompletionChunk {
            id: None,
            choices: vec![ChunkChoice {
                delta: ChunkDelta {
                    role: None,
                    content: Some(text.to_string()),
                },
                finish_reason: None,
            }],
        }
    }

    #[async_trait::async_trait]
    impl CompletionClient for MockClient {
        async fn complete(
            &self,
            _api_key: &str,
            _params: ChatCompletionParams,
        ) -> Result<ChatCompletion> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.next_script() {
                Script::Reply(text) => Ok(ChatCompletion {
                    id: None,
                    choices: vec![ChatChoice {
                        message: Message::assistant(text),
                        finish_reason: Some("stop".to_string()),
                    }],
                }),
                Script::EmptyChoices => Ok(ChatCompletion {
                    id: None,
                    choices: vec![],
                }),
                Script::Fail => Err(Error::connection("connection refused", None)),
                _ => panic!("batch request hit a streaming script"),
            }
        }

        async fn complete_stream(
            &self,
            _api_key: &str,
            _params: ChatCompletionParams,
        ) -> Result<ChunkStream> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.next_script() {
                Script::Fragments(fragments) => {
                    let items: Vec<Result<ChatCompletionChunk>> =
                        fragments.into_iter().map(|f| Ok(chunk(f))).collect();
                    Ok(Box::pin(stream::iter(items)))
                }
                Script::FragmentsThenFail(fragments) => {
                    let mut items: Vec<Result<ChatCompletionChunk>> =
                        fragments.into_iter().map(|f| Ok(chunk(f))).collect();
                    items.push(Err(Error::streaming("connection reset", None)));
                    Ok(Box::pin(stream::iter(items)))
                }
                Script::Fail => Err(Error::connection("connection refused", None)),
                _ => panic!("streaming request hit a batch script"),
            }
        }
    }

    #[derive(Default)]
    struct CaptureRenderer {
        fragments: Vec<String>,
        diagnostics: Vec<String>,
    }

    impl Renderer for CaptureRenderer {
        fn print_text(&mut self, text: &str) {
            self.fragments.push(text.to_string());
        }
        fn print_error(&mut self, _error: &str) {}
        fn print_warning(&mut self, _warning: &str) {}
        fn print_info(&mut self, _info: &str) {}
        fn print_diagnostic(&mut self, diagnostic: &str) {
            self.diagnostics.push(diagnostic.to_string());
        }
        fn finish_response(&mut self) {}
    }

    fn batch_config() -> ChatConfig {
        ChatConfig::new().with_api_key("sk-or-test").with_stream(false)
    }

    fn stream_config() -> ChatConfig {
        ChatConfig::new().with_api_key("sk-or-test").with_stream(true)
    }

    #[tokio::test]
    async fn history_alternates_after_successful_turns() {
        let client = MockClient::new(vec![
            Script::Reply("one"),
            Script::Reply("two"),
            Script::Reply("three"),
        ]);
        let mut session = ChatSession::new(client, batch_config());
        let mut renderer = CaptureRenderer::default();

        for input in ["a", "b", "c"] {
            session.send_message(input, &mut renderer).await.unwrap();
        }

        assert_eq!(session.message_count(), 6);
        let roles: Vec<Role> = session.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant
            ]
        );
        let contents: Vec<&str> = session
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["a", "one", "b", "two", "c", "three"]);
    }

    #[tokio::test]
    async fn batch_reply_recorded_verbatim() {
        let client = MockClient::new(vec![Script::Reply("Hello!")]);
        let mut session = ChatSession::new(client, batch_config());
        let mut renderer = CaptureRenderer::default();

        session.send_message("Hi", &mut renderer).await.unwrap();

        assert_eq!(
            session.messages(),
            &[Message::user("Hi"), Message::assistant("Hello!")]
        );
    }

    #[tokio::test]
    async fn empty_choices_record_sentinel() {
        let client = MockClient::new(vec![Script::EmptyChoices]);
        let mut session = ChatSession::new(client, batch_config());
        let mut renderer = CaptureRenderer::default();

        session.send_message("Hi", &mut renderer).await.unwrap();

        assert_eq!(
            session.messages()[1],
            Message::assistant("No response from assistant.")
        );
    }

    #[tokio::test]
    async fn missing_credential_makes_no_request() {
        let client = MockClient::new(vec![]);
        let mut session = ChatSession::new(client, ChatConfig::new().with_stream(false));
        let mut renderer = CaptureRenderer::default();

        let err = session.send_message("Hi", &mut renderer).await.unwrap_err();

        assert!(err.is_authentication());
        assert_eq!(session.message_count(), 0);
        assert_eq!(session.client.calls(), 0);
    }

    #[tokio::test]
    async fn invalid_config_makes_no_request() {
        let client = MockClient::new(vec![]);
        let config = batch_config().with_temperature(2.0);
        let mut session = ChatSession::new(client, config);
        let mut renderer = CaptureRenderer::default();

        let err = session.send_message("Hi", &mut renderer).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(session.message_count(), 0);
        assert_eq!(session.client.calls(), 0);
    }

    #[tokio::test]
    async fn failed_batch_turn_rolls_back_and_prints_payload() {
        let client = MockClient::new(vec![Script::Fail]);
        let mut session = ChatSession::new(client, batch_config());
        let mut renderer = CaptureRenderer::default();

        let err = session.send_message("Hi", &mut renderer).await.unwrap_err();

        assert!(err.is_connection());
        assert_eq!(session.message_count(), 0);
        assert_eq!(renderer.diagnostics.len(), 1);
        assert!(renderer.diagnostics[0].contains("\"model\""));
    }

    #[tokio::test]
    async fn streaming_concatenates_fragments_in_order() {
        let client = MockClient::new(vec![Script::Fragments(vec!["Hel", "lo", "!"])]);
        let mut session = ChatSession::new(client, stream_config());
        let mut renderer = CaptureRenderer::default();

        session.send_message("Hi", &mut renderer).await.unwrap();

        assert_eq!(renderer.fragments, vec!["Hel", "lo", "!"]);
        assert_eq!(session.messages()[1], Message::assistant("Hello!"));
    }

    #[tokio::test]
    async fn mid_stream_failure_rolls_back() {
        let client = MockClient::new(vec![Script::FragmentsThenFail(vec!["par", "tial"])]);
        let mut session = ChatSession::new(client, stream_config());
        let mut renderer = CaptureRenderer::default();

        let err = session.send_message("Hi", &mut renderer).await.unwrap_err();

        assert!(matches!(err, Error::Streaming { .. }));
        // The fragments reached the screen, but not the history.
        assert_eq!(renderer.fragments, vec!["par", "tial"]);
        assert_eq!(session.message_count(), 0);
    }

    #[tokio::test]
    async fn full_history_sent_on_every_request() {
        let client = MockClient::new(vec![Script::Reply("one"), Script::Reply("two")]);
        let mut session = ChatSession::new(client, batch_config());
        let mut renderer = CaptureRenderer::default();

        session.send_message("a", &mut renderer).await.unwrap();
        session.send_message("b", &mut renderer).await.unwrap();

        // After two turns the history is the full four messages; a third
        // request would carry all of them plus the new input.
        assert_eq!(session.message_count(), 4);
        let stats = session.stats();
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.message_count, 4);
    }

    #[tokio::test]
    async fn config_mutators_apply() {
        let client = MockClient::new(vec![]);
        let mut session = ChatSession::new(client, ChatConfig::new());

        session.set_api_key("sk-or-new".to_string());
        session.set_model("google/gemini-pro".to_string());
        session.set_temperature(0.1);
        session.set_max_tokens(512);
        session.set_stream(false);

        let config = session.config();
        assert_eq!(config.api_key, "sk-or-new");
        assert_eq!(config.model, "google/gemini-pro");
        assert_eq!(config.temperature, 0.1);
        assert_eq!(config.max_tokens, 512);
        assert!(!config.stream);
    }
}
