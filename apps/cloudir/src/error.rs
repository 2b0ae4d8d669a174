//! CLI error types and exit codes

use cloudir_client::ClientError;
use cloudir_provider::ProviderError;
use thiserror::Error;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General error
/// - 2: Authentication failed
/// - 3: Network error
/// - 4: Validation error or object not found
/// - 5: Server error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("State file error: {0}")]
    State(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::AuthenticationFailed(_) => 2,
            CliError::Network(_) | CliError::ConnectionFailed(_) => 3,
            CliError::Validation(_) | CliError::NotFound(_) => 4,
            CliError::Server(_) => 5,
            CliError::Api { status, .. } => {
                if *status >= 500 {
                    5
                } else if *status == 401 || *status == 403 {
                    2
                } else {
                    4
                }
            }
            CliError::Config(_) | CliError::State(_) | CliError::Provider(_) | CliError::Io(_) => 1,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::AuthenticationFailed(_) | CliError::Api { status: 401 | 403, .. } => {
                Some("Check CLOUDIR_API_KEY and CLOUDIR_ORG_ID, or the provider block of the manifest.")
            }
            CliError::ConnectionFailed(_) => {
                Some("Check CLOUDIR_API_URL and your network connection.")
            }
            CliError::State(_) => {
                Some("Fix or remove the state file; 'cloudir import' can rebuild entries.")
            }
            _ => None,
        }
    }
}

impl From<ClientError> for CliError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Http(e) if e.is_connect() => CliError::ConnectionFailed(e.to_string()),
            ClientError::Http(e) if e.is_timeout() => {
                CliError::Network("Request timed out".to_string())
            }
            ClientError::Http(e) => CliError::Network(e.to_string()),
            ClientError::NotFound(message) => CliError::NotFound(message),
            ClientError::Api { status, message } => CliError::Api { status, message },
            ClientError::Parse(message) => CliError::Server(message),
            ClientError::InvalidConfig(message) => CliError::Config(message),
            other @ (ClientError::Encode(_)
            | ClientError::InvalidId { .. }
            | ClientError::InvalidPathSegment(_)) => {
                CliError::Validation(other.to_string())
            }
        }
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Client(e) => e.into(),
            ProviderError::NotConfigured | ProviderError::InvalidConfiguration { .. } => {
                CliError::Config(e.to_string())
            }
            ProviderError::ImportNotFound { .. } | ProviderError::NoMatch { .. } => {
                CliError::NotFound(e.to_string())
            }
            ProviderError::UnknownResourceType(_)
            | ProviderError::UnknownDataSource(_)
            | ProviderError::Validation { .. }
            | ProviderError::InvalidAttribute { .. }
            | ProviderError::AmbiguousMatch { .. } => CliError::Validation(e.to_string()),
            ProviderError::MissingId { .. } | ProviderError::Serialization(_) => {
                CliError::Provider(e.to_string())
            }
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Config(format!("JSON error: {}", e))
    }
}
