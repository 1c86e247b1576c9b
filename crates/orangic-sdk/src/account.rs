//! Account resource: balance and usage reports.

use crate::client::Client;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use tracing::instrument;

/// Allowed look-back window for usage reports, in days.
pub const USAGE_DAYS_RANGE: RangeInclusive<u32> = 1..=365;

/// Default look-back window for usage reports, in days.
pub const DEFAULT_USAGE_DAYS: u32 = 30;

/// Current balance for the API key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Remaining credit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    /// Currency the balance is expressed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Any other fields the server returned.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Usage report for a look-back window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    /// Window the report covers, in days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    /// Report body.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// The `/v1/balance` and `/v1/report/usage` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Account<'a> {
    client: &'a Client,
}

impl<'a> Account<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Get the current balance for this API key.
    #[instrument(skip(self))]
    pub async fn balance(&self) -> Result<Balance> {
        let url = self.client.endpoint(&["v1", "balance"])?;
        self.client.get_json(url).await
    }

    /// Get the usage report for the last `days` days (1 to 365).
    #[instrument(skip(self))]
    pub async fn usage(&self, days: u32) -> Result<UsageReport> {
        if !USAGE_DAYS_RANGE.contains(&days) {
            return Err(Error::invalid_parameter(
                "days",
                format!("days must be between 1 and 365, got {days}"),
            ));
        }
        let mut url = self.client.endpoint(&["v1", "report", "usage"])?;
        url.query_pairs_mut().append_pair("days", &days.to_string());
        self.client.get_json(url).await
    }

    /// Get the usage report for the default 30-day window.
    pub async fn usage_default(&self) -> Result<UsageReport> {
        self.usage(DEFAULT_USAGE_DAYS).await
    }
}
