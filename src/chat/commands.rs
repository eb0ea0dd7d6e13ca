//! Slash command parsing for the chat client.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to adjust the session configuration without sending
//! messages to the API. There is no command that clears the conversation:
//! history lives exactly as long as the session.

use crate::chat::config::{MAX_TOKENS_RANGE, TEMPERATURE_RANGE};

/// A parsed chat command.
///
/// These commands control the chat session and are not sent to the API.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Set the API key.
    Key(String),

    /// Change the model.
    Model(String),

    /// List the models in the catalog.
    Models,

    /// Set the sampling temperature.
    Temperature(f32),

    /// Set the maximum tokens per reply.
    MaxTokens(u32),

    /// Switch between streaming and batch replies.
    Stream(bool),

    /// Display session statistics (message count, current model, etc.).
    Stats,

    /// Show the current configuration.
    ShowConfig,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use routerchat::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/model anthropic/claude-3-opus").is_some());
/// assert!(parse_command("Hello!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        "stats" | "status" => ChatCommand::Stats,
        "config" => ChatCommand::ShowConfig,
        "models" => ChatCommand::Models,
        "key" => match argument {
            Some(key) => ChatCommand::Key(key.to_string()),
            None => ChatCommand::Invalid("/key requires an API key".to_string()),
        },
        "model" => match argument {
            Some(model) => ChatCommand::Model(model.to_string()),
            None => ChatCommand::Invalid("/model requires a model name".to_string()),
        },
        "temperature" => match argument {
            Some(arg) => {
                let (min, max) = TEMPERATURE_RANGE;
                match parse_f32_in_range(arg, min, max) {
                    Ok(value) => ChatCommand::Temperature(value),
                    Err(err) => ChatCommand::Invalid(format!("/temperature {err}")),
                }
            }
            None => ChatCommand::Invalid("/temperature requires a value".to_string()),
        },
        "max_tokens" => match argument {
            Some(arg) => {
                let (min, max) = MAX_TOKENS_RANGE;
                match parse_u32_in_range(arg, min, max) {
                    Ok(value) => ChatCommand::MaxTokens(value),
                    Err(err) => ChatCommand::Invalid(format!("/max_tokens {err}")),
                }
            }
            None => ChatCommand::Invalid("/max_tokens requires a value".to_string()),
        },
        "stream" => match argument.and_then(parse_on_off) {
            Some(value) => ChatCommand::Stream(value),
            None => ChatCommand::Invalid("/stream expects 'on' or 'off'".to_string()),
        },
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_f32_in_range(value: &str, min: f32, max: f32) -> Result<f32, String> {
    let parsed: f32 = value
        .parse()
        .map_err(|_| format!("expects a value between {min} and {max}"))?;
    if parsed.is_finite() && parsed >= min && parsed <= max {
        Ok(parsed)
    } else {
        Err(format!("expects a value between {min} and {max}"))
    }
}

fn parse_u32_in_range(value: &str, min: u32, max: u32) -> Result<u32, String> {
    let parsed: u32 = value
        .parse()
        .map_err(|_| format!("expects an integer between {min} and {max}"))?;
    if parsed >= min && parsed <= max {
        Ok(parsed)
    } else {
        Err(format!("expects an integer between {min} and {max}"))
    }
}

fn parse_on_off(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" => Some(true),
        "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /key <secret>          Set the OpenRouter API key
  /model <id>            Change the model (e.g., /model anthropic/claude-3-opus)
  /models                List the models in the catalog
  /temperature <v>       Set temperature 0.0-1.0
  /max_tokens <n>        Set maximum reply tokens (100-4096)
  /stream on|off         Stream replies incrementally or wait for the full reply
  /stats                 Show session statistics
  /config                Show current configuration
  /help                  Show this help message
  /quit                  Exit the chat"#
}
