//! HTTP client for the Orangic SDK.

use crate::account::Account;
use crate::completions::{ChatBuilder, Completions};
use crate::config::{normalize_base_url, ClientConfig};
use crate::error::{Error, Result};
use crate::models::Models;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Header carrying the per-call request identifier.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Client for the Orangic API.
///
/// Cheap to clone; clones share the connection pool and configuration.
///
/// # Example
///
/// ```rust,no_run
/// use orangic_sdk::Client;
///
/// #[tokio::main]
/// async fn main() -> Result<(), orangic_sdk::Error> {
///     let client = Client::builder().api_key("your-api-key").build()?;
///
///     let response = client
///         .chat()
///         .model("org-1")
///         .user_message("Hello!")
///         .send()
///         .await?;
///
///     println!("{}", response.content());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Client {
    /// HTTP client.
    http: reqwest::Client,
    /// Client configuration.
    config: Arc<ClientConfig>,
}

impl Client {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client from `ORANGIC_API_KEY` and default settings.
    pub fn from_env() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| Error::configuration(format!("Invalid user agent: {e}")))?,
        );

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key_value()))
            .map_err(|e| Error::configuration(format!("Invalid API key: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        for (name, value) in &config.custom_headers {
            let header_name = HeaderName::try_from(name.as_str())
                .map_err(|e| Error::configuration(format!("Invalid header name '{name}': {e}")))?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                Error::configuration(format!("Invalid header value for '{name}': {e}"))
            })?;
            headers.insert(header_name, header_value);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Chat completions resource.
    pub fn completions(&self) -> Completions<'_> {
        Completions::new(self)
    }

    /// Models resource.
    pub fn models(&self) -> Models<'_> {
        Models::new(self)
    }

    /// Account resource (balance and usage reports).
    pub fn account(&self) -> Account<'_> {
        Account::new(self)
    }

    /// Start a fluent chat completion request.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use orangic_sdk::Client;
    /// # async fn example(client: &Client) -> Result<(), orangic_sdk::Error> {
    /// let response = client
    ///     .chat()
    ///     .model("org-1")
    ///     .system_message("You are helpful")
    ///     .user_message("Hello!")
    ///     .temperature(0.7)
    ///     .send()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn chat(&self) -> ChatBuilder {
        ChatBuilder::new(self.clone())
    }

    /// GET a URL and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let request_id = new_request_id();

        debug!(%url, %request_id, "GET");

        let response = self
            .execute_with_retry(|| {
                self.http
                    .get(url.clone())
                    .header(REQUEST_ID_HEADER, request_id.as_str())
                    .send()
            })
            .await?;

        decode_json(response).await
    }

    /// POST a JSON body and decode the JSON response.
    pub(crate) async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.post(url, body).await?;
        decode_json(response).await
    }

    /// POST a JSON body and hand back the successful response unread.
    pub(crate) async fn post<B>(&self, url: Url, body: &B) -> Result<reqwest::Response>
    where
        B: Serialize + ?Sized,
    {
        let request_id = new_request_id();

        debug!(%url, %request_id, "POST");

        self.execute_with_retry(|| {
            self.http
                .post(url.clone())
                .header(REQUEST_ID_HEADER, request_id.as_str())
                .json(body)
                .send()
        })
        .await
    }

    /// Build an endpoint URL under the base URL, percent-encoding each segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::configuration(format!("Base URL '{}' cannot have a path", self.config.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request, retrying transient failures.
    ///
    /// Returns the first 2xx response. Connection failures, timeouts, 429 and
    /// 5xx responses are retried up to `max_retries` times; anything else is
    /// returned immediately. The last error is returned as-is.
    async fn execute_with_retry<F, Fut>(&self, f: F) -> Result<reqwest::Response>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = std::result::Result<reqwest::Response, reqwest::Error>>,
    {
        let max_retries = self.config.max_retries;
        let max_delay = self.config.retry_max_delay;
        let mut delay = self.config.retry_initial_delay;
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;

            let error = match f().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => error_from_response(response).await,
                Err(e) => Error::from_reqwest(&e),
            };

            if !error.is_retryable() || attempts > max_retries {
                if attempts > 1 {
                    warn!(attempts, error = %error, "Request failed after retries");
                }
                return Err(error);
            }

            // Retry-After wins over our own schedule, within the cap
            let wait = error.retry_after().map_or(delay, |d| d.min(max_delay));
            debug!(
                "Request failed on attempt {}: {}, retrying after {:?}",
                attempts, error, wait
            );
            tokio::time::sleep(wait).await;
            delay = delay.saturating_mul(2).min(max_delay);
        }
    }
}

fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Decode a successful response body as JSON.
async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let bytes = response.bytes().await.map_err(|e| Error::from_reqwest(&e))?;
    serde_json::from_slice(&bytes).map_err(|e| Error::parse(e.to_string()))
}

/// Turn a non-2xx response into an [`Error`].
async fn error_from_response(response: reqwest::Response) -> Error {
    let status = response.status().as_u16();
    let headers = response.headers();
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let retry_after = headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());

    let body = response.text().await.unwrap_or_default();
    Error::from_status(status, &body, retry_after, request_id)
}

/// Builder for creating a [`Client`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    api_key: Option<Secret<String>>,
    api_key_env: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    max_retries: Option<u32>,
    retry_initial_delay: Option<Duration>,
    retry_max_delay: Option<Duration>,
    user_agent: Option<String>,
    default_model: Option<String>,
    custom_headers: Vec<(String, String)>,
}

impl ClientBuilder {
    /// Create a new client builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            api_key_env: None,
            timeout: None,
            connect_timeout: None,
            max_retries: None,
            retry_initial_delay: None,
            retry_max_delay: None,
            user_agent: None,
            default_model: None,
            custom_headers: Vec::new(),
        }
    }

    /// Set the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(key.into()));
        self
    }

    /// Read the fallback API key from this variable instead of `ORANGIC_API_KEY`.
    pub fn api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = Some(var.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the maximum number of retries.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set the initial retry delay.
    pub fn retry_initial_delay(mut self, delay: Duration) -> Self {
        self.retry_initial_delay = Some(delay);
        self
    }

    /// Set the maximum retry delay.
    pub fn retry_max_delay(mut self, delay: Duration) -> Self {
        self.retry_max_delay = Some(delay);
        self
    }

    /// Set the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the default model.
    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    /// Add a custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] when no API key was given and the
    /// environment variable is unset or empty, and
    /// [`Error::Configuration`] for an unparseable base URL or header.
    pub fn build(self) -> Result<Client> {
        let env_var = self
            .api_key_env
            .as_deref()
            .unwrap_or(ClientConfig::API_KEY_ENV);
        let api_key = resolve_api_key(self.api_key, env_var)?;

        let raw_url = self
            .base_url
            .as_deref()
            .unwrap_or(ClientConfig::DEFAULT_BASE_URL);
        let base_url = Url::parse(raw_url)
            .map_err(|e| Error::configuration(format!("Invalid base URL '{raw_url}': {e}")))?;

        let config = ClientConfig {
            base_url: normalize_base_url(base_url),
            api_key,
            timeout: self.timeout.unwrap_or(ClientConfig::DEFAULT_TIMEOUT),
            connect_timeout: self
                .connect_timeout
                .unwrap_or(ClientConfig::DEFAULT_CONNECT_TIMEOUT),
            max_retries: self.max_retries.unwrap_or(ClientConfig::DEFAULT_MAX_RETRIES),
            retry_initial_delay: self
                .retry_initial_delay
                .unwrap_or(ClientConfig::DEFAULT_RETRY_INITIAL_DELAY),
            retry_max_delay: self
                .retry_max_delay
                .unwrap_or(ClientConfig::DEFAULT_RETRY_MAX_DELAY),
            user_agent: self
                .user_agent
                .unwrap_or_else(|| ClientConfig::DEFAULT_USER_AGENT.to_string()),
            default_model: self.default_model,
            custom_headers: self.custom_headers,
        };

        Client::new(config)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Explicit key first, then the environment. Blank values count as missing.
fn resolve_api_key(explicit: Option<Secret<String>>, env_var: &str) -> Result<Secret<String>> {
    if let Some(key) = explicit.filter(|k| !k.expose_secret().trim().is_empty()) {
        return Ok(key);
    }
    match std::env::var(env_var) {
        Ok(key) if !key.trim().is_empty() => Ok(Secret::new(key)),
        _ => Err(Error::authentication(format!(
            "No API key provided. Set the {env_var} environment variable or pass api_key to the client builder."
        ))),
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.config.base_url)
            .field("max_retries", &self.config.max_retries)
            .finish_non_exhaustive()
    }
}
