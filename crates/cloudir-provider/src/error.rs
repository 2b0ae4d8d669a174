//! Provider error types

use cloudir_client::ClientError;
use thiserror::Error;

/// Error that can occur while planning or applying a resource.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The directory API call failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// `configure` has not been called, or failed.
    #[error("provider is not configured")]
    NotConfigured,

    /// Provider configuration is invalid.
    #[error("invalid provider configuration: {message}")]
    InvalidConfiguration { message: String },

    /// No resource type with this name is registered.
    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),

    /// No data source with this name is registered.
    #[error("unknown data source: {0}")]
    UnknownDataSource(String),

    /// Configuration failed schema checks.
    #[error("invalid configuration for {type_name}: {}", .problems.join("; "))]
    Validation {
        type_name: String,
        problems: Vec<String>,
    },

    /// An attribute value could not be converted.
    #[error("attribute '{attribute}': {message}")]
    InvalidAttribute { attribute: String, message: String },

    /// A create call returned without an id.
    #[error("{type_name}: API response did not contain an id")]
    MissingId { type_name: String },

    /// Import target does not exist.
    #[error("cannot import {type_name} '{id}': object does not exist")]
    ImportNotFound { type_name: String, id: String },

    /// A data source lookup found nothing.
    #[error("{type_name}: no object with {attribute} = '{value}'")]
    NoMatch {
        type_name: String,
        attribute: String,
        value: String,
    },

    /// A data source lookup matched more than one object.
    #[error("{type_name}: {count} objects with {attribute} = '{value}'")]
    AmbiguousMatch {
        type_name: String,
        attribute: String,
        value: String,
        count: usize,
    },

    /// JSON conversion between state and API shapes failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProviderError {
    /// Create an invalid-attribute error.
    pub fn invalid_attribute(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::InvalidAttribute {
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    /// Whether the underlying API call reported the object as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::Client(e) if e.is_not_found())
    }

    /// The underlying client error, if any.
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            ProviderError::Client(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
