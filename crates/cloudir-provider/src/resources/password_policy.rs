//! `cloudir_password_policy`: org-wide password complexity and rotation

use serde::{Deserialize, Serialize};

use super::RestObject;
use crate::data::ResourceData;
use crate::error::{ProviderError, ProviderResult};
use crate::schema::{Attribute, Schema};

pub const DEFAULT_MIN_LENGTH: i64 = 8;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub min_length: i64,

    #[serde(default)]
    pub require_uppercase: bool,

    #[serde(default)]
    pub require_lowercase: bool,

    #[serde(default)]
    pub require_number: bool,

    #[serde(default)]
    pub require_symbol: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_days: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_count: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lockout_threshold: Option<i64>,
}

fn non_negative(data: &ResourceData, name: &str) -> ProviderResult<Option<i64>> {
    match data.get_i64(name) {
        Some(v) if v < 0 => Err(ProviderError::invalid_attribute(
            name,
            "must not be negative",
        )),
        other => Ok(other),
    }
}

impl RestObject for PasswordPolicy {
    const TYPE_NAME: &'static str = "cloudir_password_policy";
    const COLLECTION_PATH: &'static str = "/api/v2/password-policies";

    fn schema() -> Schema {
        Schema::new()
            .with_description("Password complexity and rotation rules.")
            .with_attribute(Attribute::required_string("name"))
            .with_attribute(Attribute::optional_int("min_length").with_default(DEFAULT_MIN_LENGTH))
            .with_attribute(Attribute::optional_bool("require_uppercase").with_default(false))
            .with_attribute(Attribute::optional_bool("require_lowercase").with_default(false))
            .with_attribute(Attribute::optional_bool("require_number").with_default(false))
            .with_attribute(Attribute::optional_bool("require_symbol").with_default(false))
            .with_attribute(Attribute::optional_int("expiration_days"))
            .with_attribute(Attribute::optional_int("history_count"))
            .with_attribute(Attribute::optional_int("lockout_threshold"))
    }

    fn from_data(data: &ResourceData) -> ProviderResult<Self> {
        let min_length = data.get_i64("min_length").unwrap_or(DEFAULT_MIN_LENGTH);
        if min_length < 1 {
            return Err(ProviderError::invalid_attribute(
                "min_length",
                "must be at least 1",
            ));
        }

        Ok(Self {
            id: None,
            name: data.get_string("name")?,
            min_length,
            require_uppercase: data.get_bool("require_uppercase").unwrap_or(false),
            require_lowercase: data.get_bool("require_lowercase").unwrap_or(false),
            require_number: data.get_bool("require_number").unwrap_or(false),
            require_symbol: data.get_bool("require_symbol").unwrap_or(false),
            expiration_days: non_negative(data, "expiration_days")?,
            history_count: non_negative(data, "history_count")?,
            lockout_threshold: non_negative(data, "lockout_threshold")?,
        })
    }

    fn write_to(&self, data: &mut ResourceData) {
        data.set("name", self.name.clone());
        data.set("min_length", self.min_length);
        data.set("require_uppercase", self.require_uppercase);
        data.set("require_lowercase", self.require_lowercase);
        data.set("require_number", self.require_number);
        data.set("require_symbol", self.require_symbol);
        data.set("expiration_days", self.expiration_days);
        data.set("history_count", self.history_count);
        data.set("lockout_threshold", self.lockout_threshold);
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
