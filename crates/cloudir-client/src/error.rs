//! Directory API client error types
//!
//! Every request either returns bytes or one of these errors. The only
//! classification callers rely on is [`ClientError::is_not_found`], which
//! decides between "the object is already gone" and "a real failure".

use thiserror::Error;

/// Error returned by [`crate::DirectoryClient`] operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response (DNS, TLS, timeout, ...).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered 404.
    #[error("not found (404): {0}")]
    NotFound(String),

    /// The API answered with any other non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// A success response could not be decoded into the expected shape.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// A request body could not be encoded.
    #[error("failed to encode request body: {0}")]
    Encode(String),

    /// Client configuration is missing or malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A composite identifier did not have the expected shape.
    #[error("invalid identifier '{id}': expected {expected} non-empty parts separated by ':'")]
    InvalidId { id: String, expected: usize },

    /// An identifier would change the meaning of the request path.
    #[error("invalid identifier '{0}': not usable as a URL path segment")]
    InvalidPathSegment(String),
}

impl ClientError {
    /// Create an API error from a status code and message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        ClientError::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether this error means the addressed object does not exist.
    ///
    /// Besides the 404 variant, the rendered message is checked for "404"
    /// or "not found": several endpoints answer a missing parent object
    /// with a 400 whose message says so.
    pub fn is_not_found(&self) -> bool {
        match self {
            ClientError::NotFound(_) => true,
            ClientError::Api { .. } => is_not_found_message(&self.to_string()),
            _ => false,
        }
    }

    /// HTTP status of the response that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::NotFound(_) => Some(404),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Transient errors may succeed if the operation is run again later.
    ///
    /// Nothing in this crate retries; the flag feeds log levels and exit codes.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Http(_) => true,
            ClientError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Whether the API rejected the credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ClientError::Api { status: 401 | 403, .. })
    }

    /// Short machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Http(_) => "NETWORK_ERROR",
            ClientError::NotFound(_) => "NOT_FOUND",
            ClientError::Api { .. } => "API_ERROR",
            ClientError::Parse(_) => "PARSE_ERROR",
            ClientError::Encode(_) => "ENCODE_ERROR",
            ClientError::InvalidConfig(_) => "INVALID_CONFIG",
            ClientError::InvalidId { .. } | ClientError::InvalidPathSegment(_) => "INVALID_ID",
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Parse(e.to_string())
    }
}

/// Substring test behind [`ClientError::is_not_found`].
pub fn is_not_found_message(message: &str) -> bool {
    message.contains("404") || message.to_lowercase().contains("not found")
}

/// Result type for directory client operations.
pub type ClientResult<T> = Result<T, ClientError>;
