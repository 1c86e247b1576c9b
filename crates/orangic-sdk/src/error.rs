//! Error types for the Orangic SDK.

use serde::Deserialize;
use thiserror::Error;

/// Result type for SDK operations.
pub type Result<T> = std::result::Result<T, Error>;

/// What went wrong at the network level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// The request or a body read exceeded the configured timeout.
    Timeout,
    /// The connection could not be established.
    Connect,
    /// The connection dropped while reading the response body.
    Body,
    /// Any other failure reported by the HTTP stack.
    Other,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Connect => write!(f, "connect"),
            Self::Body => write!(f, "body"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Errors that can occur when using the Orangic SDK.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error during client setup.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// No API key was supplied, or the server rejected it (401/403).
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Error message describing the authentication failure.
        message: String,
        /// HTTP status code, absent when the key was missing locally.
        status: Option<u16>,
    },

    /// Rate limit exceeded (429).
    #[error("Rate limit exceeded: {message}")]
    RateLimited {
        /// Error message from the server.
        message: String,
        /// Number of seconds the server asked us to wait.
        retry_after: Option<u64>,
        /// Request ID for debugging.
        request_id: Option<String>,
    },

    /// Server returned any other non-2xx response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the server.
        message: String,
        /// Error type/code from the server.
        error_type: Option<String>,
        /// Request ID for debugging.
        request_id: Option<String>,
    },

    /// Network-level failure (timeout, refused connection, dropped body).
    #[error("Transport error ({kind}): {message}")]
    Transport {
        /// Failure category.
        kind: TransportKind,
        /// Error message from the HTTP stack.
        message: String,
    },

    /// Invalid request parameters, rejected before sending.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Error message describing the invalid request.
        message: String,
        /// The parameter that was invalid.
        parameter: Option<String>,
    },

    /// Response parsing failed.
    #[error("Failed to parse response: {message}")]
    Parse {
        /// Error message describing the parse failure.
        message: String,
    },

    /// Streaming error.
    #[error("Streaming error: {message}")]
    Streaming {
        /// Error message describing the streaming error.
        message: String,
    },
}

impl Error {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an authentication error that did not come from the server.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            status: None,
        }
    }

    /// Create a rate limited error.
    pub fn rate_limited(message: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after,
            request_id: None,
        }
    }

    /// Create an API error from response details.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            error_type: None,
            request_id: None,
        }
    }

    /// Create a transport error.
    pub fn transport(kind: TransportKind, message: impl Into<String>) -> Self {
        Self::Transport {
            kind,
            message: message.into(),
        }
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
            parameter: None,
        }
    }

    /// Create an invalid request error naming the offending parameter.
    pub fn invalid_parameter(parameter: &str, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
            parameter: Some(parameter.to_string()),
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a streaming error.
    pub fn streaming(message: impl Into<String>) -> Self {
        Self::Streaming {
            message: message.into(),
        }
    }

    /// Map a non-2xx HTTP response onto the error taxonomy.
    pub fn from_status(
        status: u16,
        body: &str,
        retry_after: Option<u64>,
        request_id: Option<String>,
    ) -> Self {
        let parsed = ErrorBody::parse(body);
        let message = parsed.message.unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                body.to_string()
            }
        });

        match status {
            401 | 403 => Self::Authentication {
                message,
                status: Some(status),
            },
            429 => Self::RateLimited {
                message,
                retry_after,
                request_id,
            },
            _ => Self::Api {
                status,
                message,
                error_type: parsed.error_type,
                request_id,
            },
        }
    }

    /// Map a reqwest error onto a transport error.
    pub(crate) fn from_reqwest(error: &reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            TransportKind::Timeout
        } else if error.is_connect() {
            TransportKind::Connect
        } else if error.is_body() || error.is_decode() {
            TransportKind::Body
        } else {
            TransportKind::Other
        };
        Self::transport(kind, error.to_string())
    }

    /// Check if the error is worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::Transport { kind, .. } => {
                matches!(kind, TransportKind::Timeout | TransportKind::Connect)
            }
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Check if this is an authentication failure.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Check if this is a network-level failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Get the HTTP status code if available.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            Self::Authentication { status, .. } => *status,
            _ => None,
        }
    }

    /// Get the request ID if available.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Api { request_id, .. } | Self::RateLimited { request_id, .. } => {
                request_id.as_deref()
            }
            _ => None,
        }
    }

    /// Get the retry-after duration if available.
    pub fn retry_after(&self) -> Option<std::time::Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => {
                retry_after.map(std::time::Duration::from_secs)
            }
            _ => None,
        }
    }
}

/// Message and type pulled out of an error body.
#[derive(Debug, Default)]
struct ErrorBody {
    message: Option<String>,
    error_type: Option<String>,
}

/// The server sends either `{"error": "text"}` or an OpenAI-style object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Text(String),
    Detail {
        message: Option<String>,
        #[serde(rename = "type")]
        error_type: Option<String>,
        code: Option<String>,
    },
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorField,
}

impl ErrorBody {
    fn parse(body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(ErrorEnvelope {
                error: ErrorField::Text(message),
            }) => Self {
                message: Some(message),
                error_type: None,
            },
            Ok(ErrorEnvelope {
                error:
                    ErrorField::Detail {
                        message,
                        error_type,
                        code,
                    },
            }) => Self {
                message,
                error_type: error_type.or(code),
            },
            Err(_) => Self::default(),
        }
    }
}
