//! Interactive chat client for OpenRouter-hosted models.
//!
//! This binary provides a REPL interface for chatting with any model on
//! OpenRouter. All configuration is entered interactively: the API key is
//! prompted for at startup (or set later with `/key`), and the remaining
//! parameters are adjusted with slash commands. There are no flags, no
//! environment variables, and no config files.
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/key <secret>` - Set the API key
//! - `/model <id>` - Change the model
//! - `/models` - List the model catalog
//! - `/temperature <v>` - Set the sampling temperature
//! - `/max_tokens <n>` - Set the reply token limit
//! - `/stream on|off` - Toggle incremental replies
//! - `/stats` - Show session statistics
//! - `/quit` - Exit the application

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use routerchat::OpenRouter;
use routerchat::chat::{
    ChatCommand, ChatConfig, ChatSession, ModelCatalog, PlainTextRenderer, Renderer, SessionStats,
    help_text, parse_command,
};

/// Main entry point for the routerchat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut renderer = PlainTextRenderer::new();
    let mut rl = DefaultEditor::new()?;

    println!("routerchat");
    println!("Type /help for commands, /quit to exit\n");

    // The credential is session-supplied, never read from the environment.
    let api_key = match rl.readline("OpenRouter API key (blank to set later with /key): ") {
        Ok(line) => line.trim().to_string(),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            println!("Goodbye!");
            return Ok(());
        }
        Err(err) => return Err(Box::new(err) as Box<dyn std::error::Error>),
    };

    let client = OpenRouter::new()?;

    // One catalog fetch per session load; failures degrade with a warning.
    let catalog = ModelCatalog::from_fetch(client.list_models().await, &mut renderer);

    let mut config = ChatConfig::new().with_api_key(api_key);
    if let Some(first) = catalog.models().first() {
        config = config.with_model(first.clone());
    }

    let mut session = ChatSession::new(client, config);

    println!(
        "Chatting with {} ({} models available)\n",
        session.config().model,
        catalog.len()
    );

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Key(key) => {
                            session.set_api_key(key);
                            renderer.print_info("API key updated.");
                        }
                        ChatCommand::Model(model) => {
                            if !catalog.contains(&model) {
                                renderer.print_warning(&format!(
                                    "{model} is not in the model catalog; using it anyway"
                                ));
                            }
                            session.set_model(model.clone());
                            renderer.print_info(&format!("Model changed to: {}", model));
                        }
                        ChatCommand::Models => {
                            print_catalog(&catalog);
                        }
                        ChatCommand::Temperature(value) => {
                            session.set_temperature(value);
                            renderer.print_info(&format!("temperature set to {:.2}", value));
                        }
                        ChatCommand::MaxTokens(value) => {
                            session.set_max_tokens(value);
                            renderer.print_info(&format!("max_tokens set to {value}"));
                        }
                        ChatCommand::Stream(enabled) => {
                            session.set_stream(enabled);
                            if enabled {
                                renderer.print_info("Streaming enabled.");
                            } else {
                                renderer.print_info("Streaming disabled; replies arrive whole.");
                            }
                        }
                        ChatCommand::Stats => {
                            print_stats(&session.stats());
                        }
                        ChatCommand::ShowConfig => {
                            print_config(&session.stats());
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send to API
                println!("Assistant:");
                if let Err(e) = session.send_message(line, &mut renderer).await {
                    renderer.print_error(&e.to_string());
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn print_catalog(catalog: &ModelCatalog) {
    if catalog.is_empty() {
        println!("    Model catalog is empty.");
        return;
    }
    println!("    Available models:");
    for model in catalog.models() {
        println!("      - {}", model);
    }
}

fn print_stats(stats: &SessionStats) {
    println!("    Session Statistics:");
    println!("      Model: {}", stats.model);
    println!("      Messages: {}", stats.message_count);
    println!("      Requests: {}", stats.total_requests);
    println!("      Temperature: {:.2}", stats.temperature);
    println!("      Max tokens: {}", stats.max_tokens);
    println!(
        "      Transport: {}",
        if stats.stream { "streaming" } else { "batch" }
    );
    println!(
        "      API key: {}",
        if stats.has_api_key { "set" } else { "(not set)" }
    );
}

fn print_config(stats: &SessionStats) {
    println!("    Current Configuration:");
    println!("      Model: {}", stats.model);
    println!("      Temperature: {:.2}", stats.temperature);
    println!("      Max tokens: {}", stats.max_tokens);
    println!(
        "      Transport: {}",
        if stats.stream { "streaming" } else { "batch" }
    );
    println!(
        "      API key: {}",
        if stats.has_api_key { "set" } else { "(not set)" }
    );
}
