//! `cloudir_system`: managed device records (read-only, v1 `/api/systems`)

use serde::Deserialize;

use super::{FilterSyntax, Lookup};
use crate::data::ResourceData;
use crate::schema::{Attribute, AttributeType, Schema};

/// Device record as reported by the agent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct System {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,

    #[serde(default)]
    pub hostname: String,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub os: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub arch: Option<String>,

    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub agent_version: Option<String>,

    #[serde(default)]
    pub last_contact: Option<String>,
}

impl Lookup for System {
    const TYPE_NAME: &'static str = "cloudir_system";
    const COLLECTION_PATH: &'static str = "/api/systems";
    const LOOKUP_ATTRIBUTE: &'static str = "hostname";
    const API_FIELD: &'static str = "hostname";
    const FILTER_SYNTAX: FilterSyntax = FilterSyntax::V1;

    fn schema() -> Schema {
        Schema::new()
            .with_description("A managed device.")
            .with_attribute(Attribute::required_string("hostname"))
            .with_attribute(Attribute::computed_only("display_name", AttributeType::String))
            .with_attribute(Attribute::computed_only("os", AttributeType::String))
            .with_attribute(Attribute::computed_only("os_version", AttributeType::String))
            .with_attribute(Attribute::computed_only("arch", AttributeType::String))
            .with_attribute(Attribute::computed_only("active", AttributeType::Bool))
            .with_attribute(Attribute::computed_only("agent_version", AttributeType::String))
            .with_attribute(Attribute::computed_only("last_contact", AttributeType::String))
    }

    fn lookup_value(&self) -> &str {
        &self.hostname
    }

    fn write_to(&self, data: &mut ResourceData) {
        data.set("hostname", self.hostname.clone());
        data.set("display_name", self.display_name.clone());
        data.set("os", self.os.clone());
        data.set("os_version", self.version.clone());
        data.set("arch", self.arch.clone());
        data.set("active", self.active);
        data.set("agent_version", self.agent_version.clone());
        data.set("last_contact", self.last_contact.clone());
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
