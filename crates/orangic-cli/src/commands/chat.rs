//! Chat command - send chat completion requests.

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use futures::StreamExt;
use orangic_sdk::{ChatBuilder, ChatStream, Client, Message, ReasoningLevel, StreamResult, Usage};
use serde::Serialize;
use std::io::{self, BufRead, Read, Write};

use crate::output::{self, CommandResult, OutputFormat};
use crate::settings::Settings;

/// Arguments for the chat command.
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Message to send (if not provided, reads from stdin)
    #[arg(short, long)]
    pub message: Option<String>,

    /// Model to use (defaults to the configured model)
    #[arg(short = 'M', long)]
    pub model: Option<String>,

    /// System prompt
    #[arg(short, long)]
    pub system: Option<String>,

    /// Enable streaming output
    #[arg(long)]
    pub stream: bool,

    /// Temperature (0.0 to 2.0)
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Top-p sampling parameter
    #[arg(long)]
    pub top_p: Option<f32>,

    /// Frequency penalty (-2.0 to 2.0)
    #[arg(long, allow_hyphen_values = true)]
    pub frequency_penalty: Option<f32>,

    /// Presence penalty (-2.0 to 2.0)
    #[arg(long, allow_hyphen_values = true)]
    pub presence_penalty: Option<f32>,

    /// Stop sequence (repeatable)
    #[arg(long = "stop")]
    pub stop: Vec<String>,

    /// Reasoning effort: 0-4 or off, minimal, low, medium, high
    #[arg(short, long)]
    pub reasoning: Option<ReasoningLevel>,

    /// Print the model's thinking while streaming
    #[arg(long)]
    pub show_thinking: bool,

    /// Interactive chat mode
    #[arg(short, long)]
    pub interactive: bool,

    /// Show token usage
    #[arg(long)]
    pub show_usage: bool,
}

/// Chat response for output.
#[derive(Debug, Serialize)]
pub struct ChatOutput {
    pub model: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Execute the chat command.
pub async fn execute(args: ChatArgs, settings: &Settings, format: OutputFormat) -> Result<()> {
    let client = settings.client()?;
    let model = args
        .model
        .clone()
        .unwrap_or_else(|| settings.model().to_string());

    if args.interactive {
        run_interactive_mode(&client, &args, &model).await
    } else {
        run_single_message(&client, &args, &model, format).await
    }
}

/// Apply the sampling flags to a request.
fn apply_options(mut chat: ChatBuilder, args: &ChatArgs) -> ChatBuilder {
    if let Some(temp) = args.temperature {
        chat = chat.temperature(temp);
    }
    if let Some(max) = args.max_tokens {
        chat = chat.max_tokens(max);
    }
    if let Some(top_p) = args.top_p {
        chat = chat.top_p(top_p);
    }
    if let Some(penalty) = args.frequency_penalty {
        chat = chat.frequency_penalty(penalty);
    }
    if let Some(penalty) = args.presence_penalty {
        chat = chat.presence_penalty(penalty);
    }
    for sequence in &args.stop {
        chat = chat.stop(sequence);
    }
    if let Some(level) = args.reasoning {
        chat = chat.reasoning(level);
    }
    chat
}

/// Run a single message chat.
async fn run_single_message(
    client: &Client,
    args: &ChatArgs,
    model: &str,
    format: OutputFormat,
) -> Result<()> {
    let message = if let Some(ref msg) = args.message {
        msg.clone()
    } else {
        // Read from stdin
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        input.trim().to_string()
    };

    if message.is_empty() {
        bail!("No message provided");
    }

    let mut chat = client.chat().model(model);
    if let Some(ref system) = args.system {
        chat = chat.system_message(system);
    }
    let chat = apply_options(chat.user_message(message), args);

    match format {
        OutputFormat::Json => {
            let chat_output = if args.stream {
                let result = chat.stream().await?.collect_result().await?;
                ChatOutput {
                    model: model.to_string(),
                    content: result.content,
                    thinking: Some(result.narrative).filter(|n| !n.is_empty()),
                    finish_reason: None,
                    usage: None,
                }
            } else {
                let response = chat.send().await?;
                ChatOutput {
                    model: response.model.clone(),
                    content: response.content().to_string(),
                    thinking: None,
                    finish_reason: response.finish_reason().map(String::from),
                    usage: Some(response.usage),
                }
            };
            CommandResult::success(chat_output).print(format)
        }
        OutputFormat::Text if args.stream => {
            let stream = chat.stream().await?;
            print_stream(stream, args.show_thinking).await?;
            Ok(())
        }
        OutputFormat::Text => {
            let spinner = output::spinner("Generating response...");
            let result = chat.send().await;
            spinner.finish_and_clear();

            let response = result?;
            println!("{}", response.content());

            if args.show_usage && response.usage.has_usage() {
                output::usage(&response.usage);
            }
            Ok(())
        }
    }
}

/// Echo a stream to stdout and collect it.
async fn print_stream(mut stream: ChatStream, show_thinking: bool) -> Result<StreamResult> {
    let mut printer = output::StreamPrinter::new(show_thinking);
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(chunk) => printer.write(&chunk),
            Err(e) => {
                printer.finish();
                return Err(e.into());
            }
        }
    }
    Ok(printer.finish())
}

/// Run interactive chat mode.
async fn run_interactive_mode(client: &Client, args: &ChatArgs, model: &str) -> Result<()> {
    output::info(&format!("Interactive chat with {model} (type 'exit' to quit)"));

    let mut messages: Vec<Message> = Vec::new();
    if let Some(ref system) = args.system {
        output::info(&format!("System: {system}"));
        messages.push(Message::system(system));
    }

    println!();

    let stdin = io::stdin();
    loop {
        print!("{} ", "You:".cyan().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            // EOF
            println!();
            break;
        }
        let input = input.trim();

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            output::info("Goodbye!");
            break;
        }
        if input.is_empty() {
            continue;
        }

        messages.push(Message::user(input));

        // Full history each turn
        let chat = apply_options(client.chat().model(model).messages(messages.clone()), args);

        let reply = if args.stream {
            print!("{} ", "Assistant:".green().bold());
            io::stdout().flush()?;

            match chat.stream().await {
                Ok(stream) => print_stream(stream, args.show_thinking)
                    .await
                    .map(|result| result.content),
                Err(e) => Err(e.into()),
            }
        } else {
            let spinner = output::spinner("Thinking...");
            let result = chat.send().await;
            spinner.finish_and_clear();

            result.map_err(anyhow::Error::from).map(|response| {
                println!("{} {}", "Assistant:".green().bold(), response.content());
                if args.show_usage && response.usage.has_usage() {
                    output::info(&output::usage_line(&response.usage));
                }
                response.content
            })
        };

        match reply {
            Ok(content) if !content.is_empty() => messages.push(Message::assistant(content)),
            Ok(_) => {}
            Err(e) => {
                output::error(&format!("Error: {e}"));
                // Drop the unanswered turn
                messages.pop();
            }
        }

        println!();
    }

    Ok(())
}
