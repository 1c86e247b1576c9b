//! Terminal and JSON rendering for the CLI.

use colored::{ColoredString, Colorize};
use orangic_sdk::{Channel, StreamChunk, StreamResult, Usage};
use serde::Serialize;
use std::io::{self, Write};

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON envelope on stdout.
    Json,
}

impl OutputFormat {
    /// Create an output format from the `--json` flag.
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Kind of one-line status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Success,
    Info,
    Warning,
    Error,
}

impl Status {
    fn marker(self) -> ColoredString {
        match self {
            Self::Success => "✓".green().bold(),
            Self::Info => "ℹ".blue().bold(),
            Self::Warning => "⚠".yellow().bold(),
            Self::Error => "✗".red().bold(),
        }
    }

    /// Problems go to stderr so stdout stays pipeable.
    fn print(self, message: &str) {
        match self {
            Self::Success | Self::Info => println!("{} {message}", self.marker()),
            Self::Warning | Self::Error => eprintln!("{} {message}", self.marker()),
        }
    }
}

/// Print a success message.
pub fn success(message: &str) {
    Status::Success.print(message);
}

/// Print an error message.
pub fn error(message: &str) {
    Status::Error.print(message);
}

/// Print a warning message.
pub fn warning(message: &str) {
    Status::Warning.print(message);
}

/// Print an info message.
pub fn info(message: &str) {
    Status::Info.print(message);
}

/// Print an indented `key: value` line.
pub fn key_value(key: &str, value: &str) {
    println!("  {}: {value}", key.bold());
}

/// Print a section header.
pub fn section(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// Print token counts for a reply.
pub fn usage(usage: &Usage) {
    section("Token Usage");
    key_value("Prompt", &usage.prompt_tokens.to_string());
    key_value("Completion", &usage.completion_tokens.to_string());
    key_value("Total", &usage.total_tokens.to_string());
}

/// One-line token summary for interactive turns.
pub fn usage_line(usage: &Usage) -> String {
    format!(
        "Tokens: {} prompt, {} completion, {} total",
        usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
    )
}

/// Print a value as pretty JSON.
pub fn json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Spinner shown on stderr while waiting for the API.
pub fn spinner(message: &str) -> indicatif::ProgressBar {
    let spinner = indicatif::ProgressBar::new_spinner();
    if let Ok(style) = indicatif::ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.blue} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// Print rows as a rounded table.
pub fn table<T: tabled::Tabled>(rows: &[T]) {
    use tabled::{settings::Style, Table};

    if rows.is_empty() {
        println!("  (no data)");
        return;
    }
    println!("{}", Table::new(rows).with(Style::rounded()));
}

/// Format a Unix timestamp, or `unknown` for zero and out-of-range values.
pub fn format_timestamp(timestamp: i64) -> String {
    use chrono::{TimeZone, Utc};

    if timestamp == 0 {
        return "unknown".to_string();
    }
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .map_or_else(|| "unknown".to_string(), |dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

/// Writes a streamed reply as it arrives.
///
/// Final-channel text is printed plainly. Any other channel is hidden unless
/// `show_thinking` is set, in which case it is dimmed, and channels other than
/// `narrative` are prefixed with their name.
#[derive(Debug)]
pub struct StreamPrinter {
    show_thinking: bool,
    current: Option<Channel>,
    result: StreamResult,
}

impl StreamPrinter {
    /// Create a printer.
    pub fn new(show_thinking: bool) -> Self {
        Self {
            show_thinking,
            current: None,
            result: StreamResult::new(),
        }
    }

    /// Render one chunk and record it.
    pub fn write(&mut self, chunk: &StreamChunk) {
        self.result.add_chunk(chunk);
        if !chunk.is_final() && !self.show_thinking {
            return;
        }

        let mut out = io::stdout().lock();
        if self.current.as_ref() != Some(&chunk.channel) {
            // New line between channels
            if self.current.is_some() {
                let _ = writeln!(out);
            }
            if let Channel::Other(name) = &chunk.channel {
                let _ = write!(out, "{} ", format!("[{name}]").dimmed());
            }
            self.current = Some(chunk.channel.clone());
        }

        let _ = if chunk.is_final() {
            write!(out, "{}", chunk.content())
        } else {
            write!(out, "{}", chunk.content().dimmed().italic())
        };
        let _ = out.flush();
    }

    /// End the output line and return everything received.
    pub fn finish(self) -> StreamResult {
        println!();
        self.result
    }
}

/// JSON envelope printed for every command in `--json` mode.
#[derive(Debug, Serialize)]
pub struct CommandResult<T: Serialize> {
    /// Whether the command succeeded.
    pub success: bool,
    /// Result data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message if failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Informational message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    /// Successful result carrying data.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    /// Successful result carrying only a message.
    pub fn success_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::empty(true)
        }
    }

    /// Failed result.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::empty(false)
        }
    }

    fn empty(success: bool) -> Self {
        Self {
            success,
            data: None,
            error: None,
            message: None,
        }
    }

    /// Print the result. In text mode only the message and error are shown;
    /// commands render their own data.
    pub fn print(&self, format: OutputFormat) -> anyhow::Result<()> {
        match format {
            OutputFormat::Json => json(self),
            OutputFormat::Text => {
                if let Some(err) = &self.error {
                    error(err);
                }
                if let Some(msg) = &self.message {
                    let status = if self.success { Status::Success } else { Status::Error };
                    status.print(msg);
                }
                Ok(())
            }
        }
    }
}
