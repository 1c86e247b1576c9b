//! CLI argument definitions using clap.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;
use crate::output::OutputFormat;
use crate::settings::{Overrides, Settings};

/// Orangic - chat with Orangic models from the terminal
#[derive(Parser, Debug)]
#[command(name = "orangic")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// API base URL
    #[arg(short = 'u', long, env = "ORANGIC_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// API key for authentication
    #[arg(short = 'k', long, env = "ORANGIC_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long, env = "ORANGIC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a chat completion request
    Chat(commands::chat::ChatArgs),

    /// List and inspect available models
    Models(commands::models::ModelsArgs),

    /// Show the remaining balance for the API key
    Balance,

    /// Show token usage for recent days
    Usage(commands::account::UsageArgs),

    /// Manage the CLI configuration file
    Config(commands::config::ConfigArgs),

    /// Generate shell completions
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command.
    pub async fn execute(self) -> Result<()> {
        let format = OutputFormat::from_json_flag(self.json);
        let config_path = self.config;
        let overrides = Overrides {
            base_url: self.base_url,
            api_key: self.api_key,
        };
        let settings = || Settings::load(config_path.as_deref(), overrides.clone());

        match self.command {
            Commands::Chat(args) => commands::chat::execute(args, &settings()?, format).await,
            Commands::Models(args) => commands::models::execute(args, &settings()?, format).await,
            Commands::Balance => commands::account::balance(&settings()?, format).await,
            Commands::Usage(args) => commands::account::usage(args, &settings()?, format).await,
            Commands::Config(args) => {
                commands::config::execute(args, config_path.as_deref(), &overrides, format)
            }
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
