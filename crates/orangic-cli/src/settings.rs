//! CLI settings: TOML profile merged with flags and environment.
//!
//! Precedence, highest first: command-line flag or its environment
//! variable, then the profile file, then built-in defaults.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Model used when neither a flag nor the profile names one.
pub const DEFAULT_MODEL: &str = "org-1";

/// File name of the profile inside the config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Contents of the profile file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    /// API base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Default model for `chat`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Request timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Retries for transient failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

impl Profile {
    /// Read a profile, returning `None` when the file does not exist.
    pub fn read(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let profile = toml::from_str(&raw)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(Some(profile))
    }

    /// Render the profile as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Copy with the API key masked for display.
    pub fn redacted(&self) -> Self {
        Self {
            api_key: self.api_key.as_deref().map(mask_key),
            ..self.clone()
        }
    }

    /// Starter profile written by `config init`.
    pub fn template() -> Self {
        Self {
            base_url: Some(orangic_sdk::ClientConfig::DEFAULT_BASE_URL.to_string()),
            api_key: None,
            model: Some(DEFAULT_MODEL.to_string()),
            timeout_secs: Some(orangic_sdk::ClientConfig::DEFAULT_TIMEOUT.as_secs()),
            max_retries: Some(orangic_sdk::ClientConfig::DEFAULT_MAX_RETRIES),
        }
    }
}

/// Values taken from global flags (or their environment variables).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--base-url` / `ORANGIC_BASE_URL`.
    pub base_url: Option<String>,
    /// `--api-key` / `ORANGIC_API_KEY`.
    pub api_key: Option<String>,
}

/// Effective settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Merged values.
    pub profile: Profile,
    /// Profile file that was read, if any.
    pub source: Option<PathBuf>,
}

impl Settings {
    /// Load the profile and apply overrides.
    ///
    /// An explicitly named file must exist; the default location may not.
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let (profile, source) = match path {
            Some(path) => match Profile::read(path)? {
                Some(profile) => (profile, Some(path.to_path_buf())),
                None => bail!("Config file not found: {}", path.display()),
            },
            None => match default_config_path() {
                Some(path) => match Profile::read(&path)? {
                    Some(profile) => (profile, Some(path)),
                    None => (Profile::default(), None),
                },
                None => (Profile::default(), None),
            },
        };

        tracing::debug!(source = ?source, "Loaded settings");
        Ok(Self {
            profile: Profile {
                base_url: overrides.base_url.or(profile.base_url),
                api_key: overrides.api_key.or(profile.api_key),
                ..profile
            },
            source,
        })
    }

    /// Model to use when the command does not name one.
    pub fn model(&self) -> &str {
        self.profile.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    /// Build an SDK client from these settings.
    pub fn client(&self) -> Result<orangic_sdk::Client> {
        let mut builder = orangic_sdk::Client::builder()
            .default_model(self.model())
            .user_agent(format!("orangic-cli/{}", env!("CARGO_PKG_VERSION")));

        if let Some(ref url) = self.profile.base_url {
            builder = builder.base_url(url);
        }
        if let Some(ref key) = self.profile.api_key {
            builder = builder.api_key(key);
        }
        if let Some(secs) = self.profile.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = self.profile.max_retries {
            builder = builder.max_retries(retries);
        }

        Ok(builder.build()?)
    }
}

/// Platform config location, e.g. `~/.config/orangic/config.toml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("chat", "Orangic", "orangic")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Keep the last four characters of a key.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}
