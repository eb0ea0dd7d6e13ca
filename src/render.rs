//! Output rendering for the chat client.
//!
//! This module provides a trait-based rendering abstraction so the session
//! logic never writes to stdout directly. The default implementation uses
//! ANSI escape codes to distinguish warnings from regular text.

use std::io::{self, Stdout, Write};

/// ANSI escape code for yellow text (used for warnings).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for dim text (used for diagnostic context).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - Capturing renderers in tests
pub trait Renderer: Send {
    /// Print a fragment of reply text.
    ///
    /// In streaming mode this is called once per fragment as it arrives;
    /// in batch mode it is called once with the whole reply.
    fn print_text(&mut self, text: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print a non-fatal warning.
    fn print_warning(&mut self, warning: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print dimmed diagnostic context accompanying an error.
    fn print_diagnostic(&mut self, diagnostic: &str);

    /// Called when a reply is complete.
    ///
    /// Used to ensure proper newlines and cleanup after streaming.
    fn finish_response(&mut self);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            use_color: true,
        }
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
        }
    }

    /// Flushes stdout to ensure immediate display of streamed content.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_text(&mut self, text: &str) {
        print!("{text}");
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        eprintln!("\nError: {error}");
    }

    fn print_warning(&mut self, warning: &str) {
        if self.use_color {
            println!("{ANSI_YELLOW}Warning: {warning}{ANSI_RESET}");
        } else {
            println!("Warning: {warning}");
        }
    }

    fn print_info(&mut self, info: &str) {
        println!("{info}");
    }

    fn print_diagnostic(&mut self, diagnostic: &str) {
        if self.use_color {
            eprintln!("{ANSI_DIM}{diagnostic}{ANSI_RESET}");
        } else {
            eprintln!("{diagnostic}");
        }
    }

    fn finish_response(&mut self) {
        println!();
        self.flush();
    }
}
