//! `cloudir_radius_server`: hosted RADIUS endpoints (v1 `/api/radiusservers`)

use serde::{Deserialize, Serialize};

use super::RestObject;
use crate::data::ResourceData;
use crate::error::{ProviderError, ProviderResult};
use crate::schema::{Attribute, Schema};

pub const DEFAULT_MFA: &str = "DISABLED";

const MFA_MODES: &[&str] = &["DISABLED", "ENABLED", "REQUIRED", "ALWAYS"];

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadiusServer {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub network_source_ip: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub shared_secret: String,

    #[serde(default)]
    pub mfa: String,
}

impl std::fmt::Debug for RadiusServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadiusServer")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("network_source_ip", &self.network_source_ip)
            .field("shared_secret", &"[REDACTED]")
            .field("mfa", &self.mfa)
            .finish()
    }
}

impl RestObject for RadiusServer {
    const TYPE_NAME: &'static str = "cloudir_radius_server";
    const COLLECTION_PATH: &'static str = "/api/radiusservers";

    fn schema() -> Schema {
        Schema::new()
            .with_description("A hosted RADIUS server.")
            .with_attribute(Attribute::required_string("name"))
            .with_attribute(Attribute::required_string("network_source_ip"))
            .with_attribute(Attribute::required_string("shared_secret").sensitive())
            .with_attribute(Attribute::optional_string("mfa").with_default(DEFAULT_MFA))
    }

    fn from_data(data: &ResourceData) -> ProviderResult<Self> {
        let mfa = data.get_str("mfa").unwrap_or(DEFAULT_MFA).to_string();
        if !MFA_MODES.contains(&mfa.as_str()) {
            return Err(ProviderError::invalid_attribute(
                "mfa",
                format!("'{mfa}' is not one of {}", MFA_MODES.join(", ")),
            ));
        }

        Ok(Self {
            id: None,
            name: data.get_string("name")?,
            network_source_ip: data.get_string("network_source_ip")?,
            shared_secret: data.get_string("shared_secret")?,
            mfa,
        })
    }

    /// The shared secret in state stays as configured.
    fn write_to(&self, data: &mut ResourceData) {
        data.set("name", self.name.clone());
        data.set("network_source_ip", self.network_source_ip.clone());
        data.set("mfa", self.mfa.clone());
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
