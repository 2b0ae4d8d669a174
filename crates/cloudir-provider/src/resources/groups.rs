//! Group resources: `cloudir_user_group`, `cloudir_system_group`,
//! `cloudir_policy_group` (v2 API)

use serde::{Deserialize, Serialize};

use super::RestObject;
use crate::data::ResourceData;
use crate::error::ProviderResult;
use crate::schema::{Attribute, Schema};

/// Group of users.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl RestObject for UserGroup {
    const TYPE_NAME: &'static str = "cloudir_user_group";
    const COLLECTION_PATH: &'static str = "/api/v2/usergroups";

    fn schema() -> Schema {
        Schema::new()
            .with_description("A group of directory users.")
            .with_attribute(Attribute::required_string("name"))
            .with_attribute(Attribute::optional_string("description"))
            .with_attribute(Attribute::optional_string("email"))
    }

    fn from_data(data: &ResourceData) -> ProviderResult<Self> {
        Ok(Self {
            id: None,
            name: data.get_string("name")?,
            description: data.get_str("description").map(str::to_string),
            email: data.get_str("email").map(str::to_string),
        })
    }

    fn write_to(&self, data: &mut ResourceData) {
        data.set("name", self.name.clone());
        data.set("description", self.description.clone());
        data.set("email", self.email.clone());
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Group of devices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RestObject for SystemGroup {
    const TYPE_NAME: &'static str = "cloudir_system_group";
    const COLLECTION_PATH: &'static str = "/api/v2/systemgroups";

    fn schema() -> Schema {
        Schema::new()
            .with_description("A group of managed devices.")
            .with_attribute(Attribute::required_string("name"))
            .with_attribute(Attribute::optional_string("description"))
    }

    fn from_data(data: &ResourceData) -> ProviderResult<Self> {
        Ok(Self {
            id: None,
            name: data.get_string("name")?,
            description: data.get_str("description").map(str::to_string),
        })
    }

    fn write_to(&self, data: &mut ResourceData) {
        data.set("name", self.name.clone());
        data.set("description", self.description.clone());
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Group of device policies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RestObject for PolicyGroup {
    const TYPE_NAME: &'static str = "cloudir_policy_group";
    const COLLECTION_PATH: &'static str = "/api/v2/policygroups";

    fn schema() -> Schema {
        Schema::new()
            .with_description("A group of device policies.")
            .with_attribute(Attribute::required_string("name"))
            .with_attribute(Attribute::optional_string("description"))
    }

    fn from_data(data: &ResourceData) -> ProviderResult<Self> {
        Ok(Self {
            id: None,
            name: data.get_string("name")?,
            description: data.get_str("description").map(str::to_string),
        })
    }

    fn write_to(&self, data: &mut ResourceData) {
        data.set("name", self.name.clone());
        data.set("description", self.description.clone());
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
