//! Authentication (conditional access) policies and their group bindings:
//! `cloudir_auth_policy`, `cloudir_auth_policy_binding`

use cloudir_client::Method;
use serde::{Deserialize, Serialize};

use super::RestObject;
use crate::data::ResourceData;
use crate::error::{ProviderError, ProviderResult};
use crate::schema::{Attribute, Schema};

pub const DEFAULT_POLICY_TYPE: &str = "user_portal";
pub const DEFAULT_EFFECT: &str = "allow";

const EFFECTS: &[&str] = &["allow", "deny"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MfaObligation {
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Obligations {
    #[serde(default)]
    pub mfa: MfaObligation,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthEffect {
    #[serde(default)]
    pub action: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obligations: Option<Obligations>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTargets {
    #[serde(default)]
    pub user_group_inclusions: Vec<String>,
}

/// Authentication policy; updated with PATCH.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub disabled: bool,

    #[serde(rename = "type", default)]
    pub policy_type: String,

    #[serde(default)]
    pub effect: AuthEffect,

    #[serde(default)]
    pub targets: AuthTargets,
}

impl RestObject for AuthPolicy {
    const TYPE_NAME: &'static str = "cloudir_auth_policy";
    const COLLECTION_PATH: &'static str = "/api/v2/authn/policies";
    const UPDATE_METHOD: Method = Method::PATCH;

    fn schema() -> Schema {
        Schema::new()
            .with_description("Conditional access rule for user authentication.")
            .with_attribute(Attribute::required_string("name"))
            .with_attribute(Attribute::optional_string("description"))
            .with_attribute(Attribute::optional_bool("disabled").with_default(false))
            .with_attribute(
                Attribute::optional_string("policy_type")
                    .force_new()
                    .with_default(DEFAULT_POLICY_TYPE),
            )
            .with_attribute(
                Attribute::optional_string("effect")
                    .with_default(DEFAULT_EFFECT)
                    .with_description("allow or deny"),
            )
            .with_attribute(Attribute::optional_bool("require_mfa").with_default(false))
            .with_attribute(Attribute::optional_string_list("user_group_ids"))
    }

    fn from_data(data: &ResourceData) -> ProviderResult<Self> {
        let action = data.get_str("effect").unwrap_or(DEFAULT_EFFECT).to_string();
        if !EFFECTS.contains(&action.as_str()) {
            return Err(ProviderError::invalid_attribute(
                "effect",
                format!("'{action}' is not one of allow, deny"),
            ));
        }

        let require_mfa = data.get_bool("require_mfa").unwrap_or(false);
        if require_mfa && action == "deny" {
            return Err(ProviderError::invalid_attribute(
                "require_mfa",
                "cannot be set on a deny policy",
            ));
        }

        let obligations = (action == "allow").then(|| Obligations {
            mfa: MfaObligation {
                required: require_mfa,
            },
        });

        Ok(Self {
            id: None,
            name: data.get_string("name")?,
            description: data.get_str("description").map(str::to_string),
            disabled: data.get_bool("disabled").unwrap_or(false),
            policy_type: data
                .get_str("policy_type")
                .unwrap_or(DEFAULT_POLICY_TYPE)
                .to_string(),
            effect: AuthEffect {
                action,
                obligations,
            },
            targets: AuthTargets {
                user_group_inclusions: data.get_string_list("user_group_ids"),
            },
        })
    }

    fn write_to(&self, data: &mut ResourceData) {
        data.set("name", self.name.clone());
        data.set("description", self.description.clone());
        data.set("disabled", self.disabled);
        data.set("policy_type", self.policy_type.clone());
        data.set("effect", self.effect.action.clone());
        data.set(
            "require_mfa",
            self.effect
                .obligations
                .as_ref()
                .is_some_and(|o| o.mfa.required),
        );
        if self.targets.user_group_inclusions.is_empty() {
            data.set("user_group_ids", serde_json::Value::Null);
        } else {
            data.set("user_group_ids", self.targets.user_group_inclusions.clone());
        }
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Attachment of an authentication policy to a user group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPolicyBinding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub policy_id: String,

    #[serde(default)]
    pub user_group_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
}

impl RestObject for AuthPolicyBinding {
    const TYPE_NAME: &'static str = "cloudir_auth_policy_binding";
    const COLLECTION_PATH: &'static str = "/api/v2/auth-policy-bindings";

    fn schema() -> Schema {
        Schema::new()
            .with_attribute(Attribute::required_string("policy_id"))
            .with_attribute(Attribute::required_string("user_group_id").force_new())
            .with_attribute(
                Attribute::optional_int("priority")
                    .computed()
                    .with_description("Lower numbers are evaluated first."),
            )
    }

    fn from_data(data: &ResourceData) -> ProviderResult<Self> {
        Ok(Self {
            id: None,
            policy_id: data.get_string("policy_id")?,
            user_group_id: data.get_string("user_group_id")?,
            priority: data.get_i64("priority"),
        })
    }

    fn write_to(&self, data: &mut ResourceData) {
        data.set("policy_id", self.policy_id.clone());
        data.set("user_group_id", self.user_group_id.clone());
        data.set("priority", self.priority);
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn policy_data(config: serde_json::Value) -> ResourceData {
        ResourceData::from_config(&AuthPolicy::schema(), config.as_object().unwrap())
    }

    #[test]
    fn test_allow_policy_body() {
        let data = policy_data(json!({
            "name": "require-mfa",
            "require_mfa": true,
            "user_group_ids": ["g1", "g2"]
        }));

        let body = serde_json::to_value(AuthPolicy::from_data(&data).unwrap()).unwrap();
        assert_eq!(body["type"], "user_portal");
        assert_eq!(body["effect"]["action"], "allow");
        assert_eq!(body["effect"]["obligations"]["mfa"]["required"], true);
        assert_eq!(body["targets"]["userGroupInclusions"], json!(["g1", "g2"]));
    }

    #[test]
    fn test_deny_policy_has_no_obligations() {
        let data = policy_data(json!({"name": "block", "effect": "deny"}));
        let body = serde_json::to_value(AuthPolicy::from_data(&data).unwrap()).unwrap();
        assert!(body["effect"].get("obligations").is_none());
    }

    #[test]
    fn test_invalid_effects() {
        assert!(AuthPolicy::from_data(&policy_data(json!({"name": "x", "effect": "maybe"}))).is_err());
        assert!(AuthPolicy::from_data(&policy_data(
            json!({"name": "x", "effect": "deny", "require_mfa": true})
        ))
        .is_err());
    }

    #[test]
    fn test_updates_use_patch() {
        assert_eq!(AuthPolicy::UPDATE_METHOD, Method::PATCH);
        assert_eq!(AuthPolicyBinding::UPDATE_METHOD, Method::PUT);
    }

    #[test]
    fn test_binding_round_trips_through_data() {
        let binding: AuthPolicyBinding = serde_json::from_value(json!({
            "id": "b1",
            "policyId": "p1",
            "userGroupId": "g1",
            "priority": 3
        }))
        .unwrap();

        let mut data = ResourceData::new();
        binding.write_to(&mut data);
        let body = serde_json::to_value(AuthPolicyBinding::from_data(&data).unwrap()).unwrap();
        assert_eq!(body, json!({"policyId": "p1", "userGroupId": "g1", "priority": 3}));
    }
}
