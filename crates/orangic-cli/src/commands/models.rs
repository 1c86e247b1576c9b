//! Models command - list and query available models.

use anyhow::Result;
use clap::{Args, Subcommand};
use orangic_sdk::ModelInfo;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, CommandResult, OutputFormat};
use crate::settings::Settings;

/// Arguments for the models command.
#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: Option<ModelsCommand>,
}

/// Models subcommands.
#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// List available models (default)
    List(ListArgs),

    /// Show one model
    Get(GetArgs),
}

/// Arguments for models list.
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Filter models by name pattern
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Filter models by owner
    #[arg(short, long)]
    pub owner: Option<String>,
}

/// Arguments for models get.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Model ID
    pub id: String,
}

/// Model information for table display.
#[derive(Debug, Tabled, Serialize)]
pub struct ModelRow {
    #[tabled(rename = "Model ID")]
    pub id: String,
    #[tabled(rename = "Owner")]
    pub owned_by: String,
    #[tabled(rename = "Created")]
    pub created: String,
}

/// Detailed model information.
#[derive(Debug, Serialize)]
pub struct ModelDetail {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub created_formatted: String,
    pub owned_by: String,
}

impl From<&ModelInfo> for ModelDetail {
    fn from(m: &ModelInfo) -> Self {
        Self {
            id: m.id.clone(),
            object: m.object.clone(),
            created: m.created,
            created_formatted: output::format_timestamp(m.created),
            owned_by: m.owned_by.clone(),
        }
    }
}

/// Execute the models command.
pub async fn execute(args: ModelsArgs, settings: &Settings, format: OutputFormat) -> Result<()> {
    let client = settings.client()?;

    match args.command.unwrap_or(ModelsCommand::List(ListArgs::default())) {
        ModelsCommand::List(list_args) => execute_list(&client, &list_args, format).await,
        ModelsCommand::Get(get_args) => execute_get(&client, &get_args, format).await,
    }
}

/// Case-insensitive substring match on id and owner.
fn matches(model: &ModelInfo, args: &ListArgs) -> bool {
    let contains = |haystack: &str, needle: &Option<String>| {
        needle
            .as_ref()
            .map_or(true, |n| haystack.to_lowercase().contains(&n.to_lowercase()))
    };
    contains(&model.id, &args.filter) && contains(&model.owned_by, &args.owner)
}

async fn execute_list(
    client: &orangic_sdk::Client,
    args: &ListArgs,
    format: OutputFormat,
) -> Result<()> {
    let spinner = (format == OutputFormat::Text).then(|| output::spinner("Fetching models..."));
    let result = client.models().list().await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let response = result?;
    let mut models: Vec<&ModelInfo> = response.data.iter().filter(|m| matches(m, args)).collect();
    models.sort_by(|a, b| a.id.cmp(&b.id));

    match format {
        OutputFormat::Json => {
            let details: Vec<ModelDetail> = models.into_iter().map(ModelDetail::from).collect();
            CommandResult::success(details).print(format)?;
        }
        OutputFormat::Text => {
            if models.is_empty() {
                output::warning("No models found matching the criteria");
            } else {
                let rows: Vec<ModelRow> = models
                    .iter()
                    .map(|m| ModelRow {
                        id: m.id.clone(),
                        owned_by: m.owned_by.clone(),
                        created: output::format_timestamp(m.created),
                    })
                    .collect();
                output::success(&format!("Found {} models", rows.len()));
                println!();
                output::table(&rows);
            }
        }
    }

    Ok(())
}

async fn execute_get(
    client: &orangic_sdk::Client,
    args: &GetArgs,
    format: OutputFormat,
) -> Result<()> {
    let model = client.models().retrieve(&args.id).await?;
    let detail = ModelDetail::from(&model);

    match format {
        OutputFormat::Json => CommandResult::success(detail).print(format)?,
        OutputFormat::Text => {
            output::section(&detail.id);
            output::key_value("Object", &detail.object);
            output::key_value("Owner", &detail.owned_by);
            output::key_value("Created", &detail.created_formatted);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: &str, owner: &str) -> ModelInfo {
        ModelInfo {
            id: id.to_string(),
            object: "model".to_string(),
            created: 0,
            owned_by: owner.to_string(),
        }
    }

    #[test]
    fn test_filter_matches_case_insensitively() {
        let args = ListArgs {
            filter: Some("MINI".to_string()),
            owner: None,
        };
        assert!(matches(&model("org-1-mini", "orangic"), &args));
        assert!(!matches(&model("org-1", "orangic"), &args));
    }

    #[test]
    fn test_owner_filter() {
        let args = ListArgs {
            filter: None,
            owner: Some("orangic".to_string()),
        };
        assert!(matches(&model("org-1", "Orangic"), &args));
        assert!(!matches(&model("org-1", "someone-else"), &args));
    }
}
