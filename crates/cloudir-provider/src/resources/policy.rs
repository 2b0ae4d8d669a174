//! `cloudir_policy`: device policies instantiated from a template

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::RestObject;
use crate::data::ResourceData;
use crate::error::ProviderResult;
use crate::schema::{Attribute, Schema};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateRef {
    pub id: String,
}

/// One configured template field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyValue {
    #[serde(rename = "configFieldID")]
    pub config_field_id: String,
    pub value: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Policy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub template: TemplateRef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<PolicyValue>,
}

impl RestObject for Policy {
    const TYPE_NAME: &'static str = "cloudir_policy";
    const COLLECTION_PATH: &'static str = "/api/v2/policies";

    fn schema() -> Schema {
        Schema::new()
            .with_description("A device policy created from a policy template.")
            .with_attribute(Attribute::required_string("name"))
            .with_attribute(Attribute::required_string("template_id").force_new())
            .with_attribute(Attribute::optional_string("notes"))
            .with_attribute(
                Attribute::optional_map("values")
                    .with_description("Template field values keyed by config field id."),
            )
    }

    fn from_data(data: &ResourceData) -> ProviderResult<Self> {
        let values = data
            .get_string_map("values")
            .into_iter()
            .map(|(config_field_id, value)| PolicyValue {
                config_field_id,
                value: Value::String(value),
            })
            .collect();

        Ok(Self {
            id: None,
            name: data.get_string("name")?,
            template: TemplateRef {
                id: data.get_string("template_id")?,
            },
            notes: data.get_str("notes").map(str::to_string),
            values,
        })
    }

    fn write_to(&self, data: &mut ResourceData) {
        data.set("name", self.name.clone());
        data.set("template_id", self.template.id.clone());
        data.set("notes", self.notes.clone());

        if self.values.is_empty() {
            data.set("values", Value::Null);
        } else {
            let values: Map<String, Value> = self
                .values
                .iter()
                .map(|v| {
                    let text = match v.value {
                        Value::String(ref s) => s.clone(),
                        ref other => other.to_string(),
                    };
                    (v.config_field_id.clone(), Value::String(text))
                })
                .collect();
            data.set("values", values);
        }
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
