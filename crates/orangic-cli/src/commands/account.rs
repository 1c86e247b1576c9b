//! Balance and usage commands.

use anyhow::Result;
use clap::Args;
use orangic_sdk::DEFAULT_USAGE_DAYS;
use serde_json::Value;

use crate::output::{self, CommandResult, OutputFormat};
use crate::settings::Settings;

/// Arguments for the usage command.
#[derive(Args, Debug)]
pub struct UsageArgs {
    /// Number of days to report (1-365)
    #[arg(short, long, default_value_t = DEFAULT_USAGE_DAYS,
          value_parser = clap::value_parser!(u32).range(1..=365))]
    pub days: u32,
}

/// Execute the balance command.
pub async fn balance(settings: &Settings, format: OutputFormat) -> Result<()> {
    let client = settings.client()?;
    let balance = client.account().balance().await?;

    match format {
        OutputFormat::Json => CommandResult::success(balance).print(format)?,
        OutputFormat::Text => {
            output::section("Balance");
            let amount = balance
                .balance
                .map_or_else(|| "unknown".to_string(), |b| format!("{b:.2}"));
            let currency = balance.currency.as_deref().unwrap_or("");
            output::key_value("Remaining", format!("{amount} {currency}").trim_end());
            print_fields(&balance.extra);
        }
    }

    Ok(())
}

/// Execute the usage command.
pub async fn usage(args: UsageArgs, settings: &Settings, format: OutputFormat) -> Result<()> {
    let client = settings.client()?;

    let spinner = (format == OutputFormat::Text).then(|| output::spinner("Fetching usage..."));
    let result = client.account().usage(args.days).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let report = result?;

    match format {
        OutputFormat::Json => CommandResult::success(report).print(format)?,
        OutputFormat::Text => {
            output::section(&format!(
                "Usage for the last {} days",
                report.days.unwrap_or(args.days)
            ));
            print_fields(&report.extra);
        }
    }

    Ok(())
}

/// Print server-defined fields, nested objects as compact JSON.
fn print_fields<'a>(fields: impl IntoIterator<Item = (&'a String, &'a Value)>) {
    for (key, value) in fields {
        let rendered = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        output::key_value(&humanize_key(key), &rendered);
    }
}

/// `total_tokens` -> `Total tokens`.
fn humanize_key(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
