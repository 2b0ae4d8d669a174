//! `cloudir_mfa_settings`: organization-wide MFA factor settings
//!
//! A singleton at `/api/v2/settings/mfa`. Creating it overwrites the
//! current settings, deleting it restores the defaults. The id is the
//! organization id, or `default` when the client has none.

use async_trait::async_trait;
use cloudir_client::DirectoryClient;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::data::ResourceData;
use crate::error::ProviderResult;
use crate::schema::{Attribute, Schema};
use crate::traits::Resource;

const SETTINGS_PATH: &str = "/api/v2/settings/mfa";
const TYPE_NAME: &str = "cloudir_mfa_settings";

/// Id used when the client has no organization id.
pub const DEFAULT_SINGLETON_ID: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MfaSettings {
    #[serde(default)]
    pub totp_enabled: bool,

    #[serde(default)]
    pub push_enabled: bool,

    #[serde(default)]
    pub webauthn_enabled: bool,

    #[serde(default)]
    pub exclusion_window_days: i64,
}

impl Default for MfaSettings {
    fn default() -> Self {
        Self {
            totp_enabled: true,
            push_enabled: false,
            webauthn_enabled: false,
            exclusion_window_days: 7,
        }
    }
}

impl MfaSettings {
    fn from_data(data: &ResourceData) -> Self {
        let defaults = Self::default();
        Self {
            totp_enabled: data.get_bool("totp_enabled").unwrap_or(defaults.totp_enabled),
            push_enabled: data.get_bool("push_enabled").unwrap_or(defaults.push_enabled),
            webauthn_enabled: data
                .get_bool("webauthn_enabled")
                .unwrap_or(defaults.webauthn_enabled),
            exclusion_window_days: data
                .get_i64("exclusion_window_days")
                .unwrap_or(defaults.exclusion_window_days),
        }
    }

    fn write_to(&self, data: &mut ResourceData) {
        data.set("totp_enabled", self.totp_enabled);
        data.set("push_enabled", self.push_enabled);
        data.set("webauthn_enabled", self.webauthn_enabled);
        data.set("exclusion_window_days", self.exclusion_window_days);
    }
}

/// The MFA settings singleton.
#[derive(Debug, Clone, Copy, Default)]
pub struct MfaSettingsResource;

impl MfaSettingsResource {
    async fn put(&self, client: &DirectoryClient, settings: &MfaSettings) -> ProviderResult<MfaSettings> {
        Ok(client.put_json(SETTINGS_PATH, settings).await?)
    }
}

#[async_trait]
impl Resource for MfaSettingsResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        let defaults = MfaSettings::default();
        Schema::new()
            .with_description("Organization-wide multi-factor authentication settings.")
            .with_attribute(Attribute::optional_bool("totp_enabled").with_default(defaults.totp_enabled))
            .with_attribute(Attribute::optional_bool("push_enabled").with_default(defaults.push_enabled))
            .with_attribute(
                Attribute::optional_bool("webauthn_enabled").with_default(defaults.webauthn_enabled),
            )
            .with_attribute(
                Attribute::optional_int("exclusion_window_days")
                    .with_default(defaults.exclusion_window_days)
                    .with_description("Days a new user may log in without MFA."),
            )
    }

    #[instrument(skip(self, client, data))]
    async fn create(&self, client: &DirectoryClient, data: &mut ResourceData) -> ProviderResult<()> {
        let applied = self.put(client, &MfaSettings::from_data(data)).await?;
        applied.write_to(data);

        let id = client.org_id().unwrap_or(DEFAULT_SINGLETON_ID).to_string();
        info!(id = %id, "Applied MFA settings");
        data.set_id(id);
        Ok(())
    }

    #[instrument(skip(self, client, data))]
    async fn read(&self, client: &DirectoryClient, data: &mut ResourceData) -> ProviderResult<()> {
        match client.get_json::<MfaSettings>(SETTINGS_PATH).await {
            Ok(settings) => {
                settings.write_to(data);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                warn!("MFA settings not found");
                data.clear_id();
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, client, data))]
    async fn update(&self, client: &DirectoryClient, data: &mut ResourceData) -> ProviderResult<()> {
        let applied = self.put(client, &MfaSettings::from_data(data)).await?;
        applied.write_to(data);
        Ok(())
    }

    #[instrument(skip(self, client, data))]
    async fn delete(&self, client: &DirectoryClient, data: &mut ResourceData) -> ProviderResult<()> {
        match self.put(client, &MfaSettings::default()).await {
            Ok(_) => info!("Restored default MFA settings"),
            Err(e) if e.is_not_found() => warn!("MFA settings not found"),
            Err(e) => return Err(e),
        }
        data.clear_id();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_defaults_match_settings_defaults() {
        let schema = MfaSettingsResource.schema();
        let data = ResourceData::from_config(&schema, &serde_json::Map::new());
        assert_eq!(MfaSettings::from_data(&data), MfaSettings::default());
    }

    #[test]
    fn test_body_shape() {
        let body = serde_json::to_value(MfaSettings::default()).unwrap();
        assert_eq!(
            body,
            json!({
                "totpEnabled": true,
                "pushEnabled": false,
                "webauthnEnabled": false,
                "exclusionWindowDays": 7
            })
        );
    }
}
