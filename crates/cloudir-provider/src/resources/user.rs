//! `cloudir_user`: directory user accounts (v1 `/api/systemusers`)

use serde::{Deserialize, Serialize};

use super::RestObject;
use crate::data::ResourceData;
use crate::error::ProviderResult;
use crate::schema::{Attribute, AttributeType, Schema};

/// System user as returned by the v1 API.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,

    /// Write-only; the API never returns it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sudo: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passwordless_sudo: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_user_portal_multifactor: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspended: Option<bool>,

    #[serde(default, skip_serializing)]
    pub activated: Option<bool>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("suspended", &self.suspended)
            .finish_non_exhaustive()
    }
}

impl RestObject for User {
    const TYPE_NAME: &'static str = "cloudir_user";
    const COLLECTION_PATH: &'static str = "/api/systemusers";

    fn schema() -> Schema {
        Schema::new()
            .with_description("A directory user account.")
            .with_attribute(Attribute::required_string("username"))
            .with_attribute(Attribute::required_string("email"))
            .with_attribute(Attribute::optional_string("firstname"))
            .with_attribute(Attribute::optional_string("lastname"))
            .with_attribute(
                Attribute::optional_string("password")
                    .sensitive()
                    .with_description("Only sent when set or changed."),
            )
            .with_attribute(Attribute::optional_bool("sudo").with_default(false))
            .with_attribute(Attribute::optional_bool("passwordless_sudo").with_default(false))
            .with_attribute(
                Attribute::optional_bool("enable_user_portal_multifactor").with_default(false),
            )
            .with_attribute(Attribute::optional_bool("suspended").with_default(false))
            .with_attribute(Attribute::computed_only("activated", AttributeType::Bool))
    }

    fn from_data(data: &ResourceData) -> ProviderResult<Self> {
        Ok(Self {
            id: None,
            username: data.get_string("username")?,
            email: data.get_string("email")?,
            firstname: data.get_str("firstname").map(str::to_string),
            lastname: data.get_str("lastname").map(str::to_string),
            password: data.get_str("password").map(str::to_string),
            sudo: data.get_bool("sudo"),
            passwordless_sudo: data.get_bool("passwordless_sudo"),
            enable_user_portal_multifactor: data.get_bool("enable_user_portal_multifactor"),
            suspended: data.get_bool("suspended"),
            activated: None,
        })
    }

    fn for_update(data: &ResourceData) -> ProviderResult<Self> {
        let mut user = Self::from_data(data)?;
        if !data.has_change("password") {
            user.password = None;
        }
        Ok(user)
    }

    fn write_to(&self, data: &mut ResourceData) {
        data.set("username", self.username.clone());
        data.set("email", self.email.clone());
        data.set("firstname", self.firstname.clone());
        data.set("lastname", self.lastname.clone());
        data.set("sudo", self.sudo.unwrap_or(false));
        data.set("passwordless_sudo", self.passwordless_sudo.unwrap_or(false));
        data.set(
            "enable_user_portal_multifactor",
            self.enable_user_portal_multifactor.unwrap_or(false),
        );
        data.set("suspended", self.suspended.unwrap_or(false));
        data.set("activated", self.activated);
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
