//! Client configuration for the Orangic SDK.

use secrecy::{ExposeSecret, Secret};
use std::time::Duration;
use url::Url;

/// Configuration for the Orangic client.
///
/// Built through [`ClientBuilder`](crate::ClientBuilder); a built
/// configuration always carries an API key.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Orangic API.
    pub(crate) base_url: Url,
    /// API key for bearer authentication.
    pub(crate) api_key: Secret<String>,
    /// Request timeout duration.
    pub(crate) timeout: Duration,
    /// Connection timeout duration.
    pub(crate) connect_timeout: Duration,
    /// Maximum number of retries after the first attempt.
    pub(crate) max_retries: u32,
    /// Initial retry delay.
    pub(crate) retry_initial_delay: Duration,
    /// Maximum retry delay.
    pub(crate) retry_max_delay: Duration,
    /// User agent string.
    pub(crate) user_agent: String,
    /// Default model to use.
    pub(crate) default_model: Option<String>,
    /// Custom headers to include in requests.
    pub(crate) custom_headers: Vec<(String, String)>,
}

impl ClientConfig {
    /// Default base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.orangic.chat";
    /// Environment variable consulted when no API key is passed explicitly.
    pub const API_KEY_ENV: &'static str = "ORANGIC_API_KEY";
    /// Default request timeout (10 minutes, long generations included).
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);
    /// Default connection timeout (10 seconds).
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default maximum retries.
    pub const DEFAULT_MAX_RETRIES: u32 = 2;
    /// Default initial retry delay.
    pub const DEFAULT_RETRY_INITIAL_DELAY: Duration = Duration::from_millis(500);
    /// Default maximum retry delay.
    pub const DEFAULT_RETRY_MAX_DELAY: Duration = Duration::from_secs(8);
    /// Default user agent.
    pub const DEFAULT_USER_AGENT: &'static str =
        concat!("orangic-rust/", env!("CARGO_PKG_VERSION"));

    /// Create a new configuration with default values.
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            api_key: Secret::new(api_key.into()),
            timeout: Self::DEFAULT_TIMEOUT,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            max_retries: Self::DEFAULT_MAX_RETRIES,
            retry_initial_delay: Self::DEFAULT_RETRY_INITIAL_DELAY,
            retry_max_delay: Self::DEFAULT_RETRY_MAX_DELAY,
            user_agent: Self::DEFAULT_USER_AGENT.to_string(),
            default_model: None,
            custom_headers: Vec::new(),
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the API key (exposed for use in requests).
    pub(crate) fn api_key_value(&self) -> &str {
        self.api_key.expose_secret().as_str()
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the connection timeout.
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Get the maximum number of retries.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Get the initial retry delay.
    pub fn retry_initial_delay(&self) -> Duration {
        self.retry_initial_delay
    }

    /// Get the maximum retry delay.
    pub fn retry_max_delay(&self) -> Duration {
        self.retry_max_delay
    }

    /// Get the user agent.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Get the default model.
    pub fn default_model(&self) -> Option<&str> {
        self.default_model.as_deref()
    }

    /// Get custom headers.
    pub fn custom_headers(&self) -> &[(String, String)] {
        &self.custom_headers
    }
}

/// `Url::join` drops the last path segment unless the base ends in `/`.
pub(crate) fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
