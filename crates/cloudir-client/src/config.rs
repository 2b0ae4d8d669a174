//! Directory API client configuration
//!
//! Settings come from explicit values or from environment variables:
//!
//! | variable | meaning | default |
//! |---|---|---|
//! | `CLOUDIR_API_KEY` | API key sent as `x-api-key` | required |
//! | `CLOUDIR_ORG_ID` | organization sent as `x-org-id` | unset |
//! | `CLOUDIR_API_URL` | API base URL | `https://console.cloudir.io` |
//! | `CLOUDIR_TIMEOUT_SECS` | per-request timeout | `60` |

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

pub const ENV_API_KEY: &str = "CLOUDIR_API_KEY";
pub const ENV_ORG_ID: &str = "CLOUDIR_ORG_ID";
pub const ENV_API_URL: &str = "CLOUDIR_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "CLOUDIR_TIMEOUT_SECS";

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://console.cloudir.io";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const REDACTED: &str = "***REDACTED***";

/// Connection settings for [`crate::DirectoryClient`].
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base URL, without a trailing slash.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API key.
    pub api_key: String,

    /// Organization id for multi-tenant administrator keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &REDACTED)
            .field("org_id", &self.org_id)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration for the default API URL.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: default_api_url(),
            api_key: api_key.into(),
            org_id: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load configuration from a custom variable reader.
    ///
    /// Tests supply variables through the reader instead of mutating the
    /// process environment.
    pub fn from_reader<F>(reader: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let api_key = reader(ENV_API_KEY)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ClientError::InvalidConfig(format!(
                    "an API key is required (set {ENV_API_KEY})"
                ))
            })?;

        let api_url = reader(ENV_API_URL)
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(default_api_url);

        let org_id = reader(ENV_ORG_ID).ok().filter(|o| !o.trim().is_empty());

        let timeout_secs = match reader(ENV_TIMEOUT_SECS) {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                ClientError::InvalidConfig(format!("invalid value for {ENV_TIMEOUT_SECS}: {e}"))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let config = Self {
            api_url,
            api_key,
            org_id,
            timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the API base URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Set the organization id.
    #[must_use]
    pub fn with_org_id(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }

    /// API base URL with any trailing slash removed.
    pub fn normalized_api_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// Check that the configuration can be used to build a client.
    pub fn validate(&self) -> ClientResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(ClientError::InvalidConfig(
                "api_key must not be empty".to_string(),
            ));
        }

        let url = url::Url::parse(&self.api_url)
            .map_err(|e| ClientError::InvalidConfig(format!("invalid api_url: {e}")))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ClientError::InvalidConfig(format!(
                    "api_url scheme '{scheme}' not allowed; only HTTP(S) permitted"
                )));
            }
        }

        if self.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
