//! `cloudir_application`: SSO application connectors (v1 `/api/applications`)

use serde::{Deserialize, Serialize};

use super::RestObject;
use crate::data::ResourceData;
use crate::error::ProviderResult;
use crate::schema::{Attribute, Schema};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Catalogue connector name.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub display_label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sso_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RestObject for Application {
    const TYPE_NAME: &'static str = "cloudir_application";
    const COLLECTION_PATH: &'static str = "/api/applications";

    fn schema() -> Schema {
        Schema::new()
            .with_description("An SSO application.")
            .with_attribute(Attribute::required_string("name").force_new())
            .with_attribute(Attribute::required_string("display_label"))
            .with_attribute(Attribute::optional_string("sso_url").computed())
            .with_attribute(Attribute::optional_string("description"))
    }

    fn from_data(data: &ResourceData) -> ProviderResult<Self> {
        Ok(Self {
            id: None,
            name: data.get_string("name")?,
            display_label: data.get_string("display_label")?,
            sso_url: data.get_str("sso_url").map(str::to_string),
            description: data.get_str("description").map(str::to_string),
        })
    }

    fn write_to(&self, data: &mut ResourceData) {
        data.set("name", self.name.clone());
        data.set("display_label", self.display_label.clone());
        data.set("sso_url", self.sso_url.clone());
        data.set("description", self.description.clone());
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
