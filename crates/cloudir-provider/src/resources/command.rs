//! `cloudir_command`: remote commands run on managed devices (v1 `/api/commands`)

use serde::{Deserialize, Serialize};

use super::RestObject;
use crate::data::ResourceData;
use crate::error::{ProviderError, ProviderResult};
use crate::schema::{Attribute, Schema};

pub const DEFAULT_COMMAND_TYPE: &str = "linux";
pub const DEFAULT_LAUNCH_TYPE: &str = "manual";
pub const DEFAULT_TIMEOUT_SECS: i64 = 120;

const COMMAND_TYPES: &[&str] = &["linux", "mac", "windows"];
const LAUNCH_TYPES: &[&str] = &["manual", "trigger", "repeated"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub command: String,

    #[serde(default)]
    pub command_type: String,

    #[serde(default)]
    pub launch_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,

    /// Seconds, as a decimal string.
    #[serde(default)]
    pub timeout: String,

    #[serde(default)]
    pub sudo: bool,
}

fn one_of(attribute: &str, value: &str, allowed: &[&str]) -> ProviderResult<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ProviderError::invalid_attribute(
        attribute,
        format!("'{value}' is not one of {}", allowed.join(", ")),
    ))
}

impl RestObject for Command {
    const TYPE_NAME: &'static str = "cloudir_command";
    const COLLECTION_PATH: &'static str = "/api/commands";

    fn schema() -> Schema {
        Schema::new()
            .with_description("A command run on managed devices.")
            .with_attribute(Attribute::required_string("name"))
            .with_attribute(Attribute::required_string("command"))
            .with_attribute(
                Attribute::optional_string("command_type").with_default(DEFAULT_COMMAND_TYPE),
            )
            .with_attribute(
                Attribute::optional_string("launch_type").with_default(DEFAULT_LAUNCH_TYPE),
            )
            .with_attribute(
                Attribute::optional_string("trigger")
                    .with_description("Required when launch_type is trigger."),
            )
            .with_attribute(Attribute::optional_int("timeout").with_default(DEFAULT_TIMEOUT_SECS))
            .with_attribute(Attribute::optional_bool("run_as_sudo").with_default(false))
    }

    fn from_data(data: &ResourceData) -> ProviderResult<Self> {
        let command_type = data
            .get_str("command_type")
            .unwrap_or(DEFAULT_COMMAND_TYPE)
            .to_string();
        one_of("command_type", &command_type, COMMAND_TYPES)?;

        let launch_type = data
            .get_str("launch_type")
            .unwrap_or(DEFAULT_LAUNCH_TYPE)
            .to_string();
        one_of("launch_type", &launch_type, LAUNCH_TYPES)?;

        let trigger = data.get_str("trigger").map(str::to_string);
        if launch_type == "trigger" && trigger.is_none() {
            return Err(ProviderError::invalid_attribute(
                "trigger",
                "required when launch_type is trigger",
            ));
        }

        let timeout = data.get_i64("timeout").unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout <= 0 {
            return Err(ProviderError::invalid_attribute(
                "timeout",
                "must be greater than 0",
            ));
        }

        Ok(Self {
            id: None,
            name: data.get_string("name")?,
            command: data.get_string("command")?,
            command_type,
            launch_type,
            trigger,
            timeout: timeout.to_string(),
            sudo: data.get_bool("run_as_sudo").unwrap_or(false),
        })
    }

    fn write_to(&self, data: &mut ResourceData) {
        data.set("name", self.name.clone());
        data.set("command", self.command.clone());
        data.set("command_type", self.command_type.clone());
        data.set("launch_type", self.launch_type.clone());
        data.set("trigger", self.trigger.clone().filter(|t| !t.is_empty()));
        data.set("timeout", self.timeout.trim().parse::<i64>().ok());
        data.set("run_as_sudo", self.sudo);
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
