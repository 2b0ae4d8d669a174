//! `cloudir_ip_list`: named IP address lists (v2 `/api/v2/iplists`)

use serde::{Deserialize, Serialize};

use super::RestObject;
use crate::data::ResourceData;
use crate::error::ProviderResult;
use crate::schema::{Attribute, Schema};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Addresses, CIDR ranges or `a-b` ranges.
    #[serde(default)]
    pub ips: Vec<String>,
}

impl RestObject for IpList {
    const TYPE_NAME: &'static str = "cloudir_ip_list";
    const COLLECTION_PATH: &'static str = "/api/v2/iplists";

    fn schema() -> Schema {
        Schema::new()
            .with_description("A named list of IP addresses and ranges.")
            .with_attribute(Attribute::required_string("name"))
            .with_attribute(Attribute::optional_string("description"))
            .with_attribute(Attribute::optional_string_list("ips"))
    }

    fn from_data(data: &ResourceData) -> ProviderResult<Self> {
        Ok(Self {
            id: None,
            name: data.get_string("name")?,
            description: data.get_str("description").map(str::to_string),
            ips: data.get_string_list("ips"),
        })
    }

    fn write_to(&self, data: &mut ResourceData) {
        data.set("name", self.name.clone());
        data.set("description", self.description.clone());
        if self.ips.is_empty() {
            data.set("ips", serde_json::Value::Null);
        } else {
            data.set("ips", self.ips.clone());
        }
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
