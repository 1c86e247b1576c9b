//! Config command - manage the CLI configuration file.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::output::{self, CommandResult, OutputFormat};
use crate::settings::{default_config_path, Overrides, Profile, Settings};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show(ShowArgs),

    /// Write a starter configuration file
    Init(InitArgs),

    /// Print the configuration file location
    Path,
}

/// Arguments for config show.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Print the API key unmasked
    #[arg(long)]
    pub reveal: bool,
}

/// Arguments for config init.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

/// Configuration output for JSON.
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub path: Option<String>,
    pub content: Profile,
}

/// Location output for JSON.
#[derive(Debug, Serialize)]
pub struct PathOutput {
    pub path: String,
    pub exists: bool,
}

/// Execute the config command.
pub fn execute(
    args: ConfigArgs,
    config_path: Option<&Path>,
    overrides: &Overrides,
    format: OutputFormat,
) -> Result<()> {
    match args.command {
        ConfigCommand::Show(show_args) => execute_show(&show_args, config_path, overrides, format),
        ConfigCommand::Init(init_args) => execute_init(&init_args, config_path, overrides, format),
        ConfigCommand::Path => execute_path(config_path, format),
    }
}

/// Explicit path or the platform default.
fn resolve_path(config_path: Option<&Path>) -> Result<PathBuf> {
    config_path
        .map(Path::to_path_buf)
        .or_else(default_config_path)
        .context("Could not determine a configuration directory; pass --config")
}

fn execute_show(
    args: &ShowArgs,
    config_path: Option<&Path>,
    overrides: &Overrides,
    format: OutputFormat,
) -> Result<()> {
    let settings = Settings::load(config_path, overrides.clone())?;
    let content = if args.reveal {
        settings.profile.clone()
    } else {
        settings.profile.redacted()
    };
    let path = settings.source.as_ref().map(|p| p.display().to_string());

    match format {
        OutputFormat::Json => CommandResult::success(ConfigOutput { path, content }).print(format)?,
        OutputFormat::Text => {
            match path {
                Some(ref path) => output::info(&format!("Configuration from: {path}")),
                None => output::info("No configuration file; using defaults"),
            }
            println!("\n{}", content.to_toml()?);
        }
    }

    Ok(())
}

fn execute_init(
    args: &InitArgs,
    config_path: Option<&Path>,
    overrides: &Overrides,
    format: OutputFormat,
) -> Result<()> {
    let path = resolve_path(config_path)?;

    if path.exists() && !args.force {
        bail!(
            "File {} already exists. Use --force to overwrite.",
            path.display()
        );
    }

    let profile = Profile {
        base_url: overrides
            .base_url
            .clone()
            .or_else(|| Profile::template().base_url),
        api_key: overrides.api_key.clone(),
        ..Profile::template()
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, profile.to_toml()?)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    let message = format!("Configuration written to {}", path.display());
    CommandResult::<()>::success_message(message).print(format)
}

fn execute_path(config_path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let path = resolve_path(config_path)?;
    let exists = path.exists();

    match format {
        OutputFormat::Json => CommandResult::success(PathOutput {
            path: path.display().to_string(),
            exists,
        })
        .print(format)?,
        OutputFormat::Text => {
            println!("{}", path.display());
            if !exists {
                output::warning("File does not exist yet; run `orangic config init`");
            }
        }
    }

    Ok(())
}
