//! `cloudir_mdm_configuration`: per-platform mobile device management switches

use serde::{Deserialize, Serialize};

use super::RestObject;
use crate::data::ResourceData;
use crate::error::ProviderResult;
use crate::schema::{Attribute, Schema};

const PLATFORM_FLAGS: &[&str] = &[
    "macos_enabled",
    "ios_enabled",
    "windows_enabled",
    "android_enabled",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MdmConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub macos_enabled: bool,

    #[serde(default)]
    pub ios_enabled: bool,

    #[serde(default)]
    pub windows_enabled: bool,

    #[serde(default)]
    pub android_enabled: bool,

    #[serde(default)]
    pub allow_personal_devices: bool,
}

impl RestObject for MdmConfiguration {
    const TYPE_NAME: &'static str = "cloudir_mdm_configuration";
    const COLLECTION_PATH: &'static str = "/api/v2/mdm/config";

    fn schema() -> Schema {
        let schema = Schema::new()
            .with_description("Mobile device management enrollment settings.")
            .with_attribute(Attribute::required_string("name"));

        PLATFORM_FLAGS
            .iter()
            .fold(schema, |schema, flag| {
                schema.with_attribute(Attribute::optional_bool(*flag).with_default(false))
            })
            .with_attribute(Attribute::optional_bool("allow_personal_devices").with_default(false))
    }

    fn from_data(data: &ResourceData) -> ProviderResult<Self> {
        let flag = |name: &str| data.get_bool(name).unwrap_or(false);
        Ok(Self {
            id: None,
            name: data.get_string("name")?,
            macos_enabled: flag("macos_enabled"),
            ios_enabled: flag("ios_enabled"),
            windows_enabled: flag("windows_enabled"),
            android_enabled: flag("android_enabled"),
            allow_personal_devices: flag("allow_personal_devices"),
        })
    }

    fn write_to(&self, data: &mut ResourceData) {
        data.set("name", self.name.clone());
        data.set("macos_enabled", self.macos_enabled);
        data.set("ios_enabled", self.ios_enabled);
        data.set("windows_enabled", self.windows_enabled);
        data.set("android_enabled", self.android_enabled);
        data.set("allow_personal_devices", self.allow_personal_devices);
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
