//! Attribute schemas for resources and data sources
//!
//! A [`Schema`] lists the attributes a configuration author may set and the
//! attributes the provider computes. The implicit `id` attribute is never
//! listed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Value type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Bool,
    Int,
    StringList,
    /// Map of string keys to string values.
    Map,
}

impl AttributeType {
    /// Get the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Bool => "bool",
            AttributeType::Int => "int",
            AttributeType::StringList => "list(string)",
            AttributeType::Map => "map(string)",
        }
    }

    /// Whether a JSON value has this type. `null` never matches.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Bool => value.is_boolean(),
            AttributeType::Int => value.as_i64().is_some(),
            AttributeType::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            AttributeType::Map => value
                .as_object()
                .is_some_and(|entries| entries.values().all(Value::is_string)),
        }
    }
}

impl std::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One attribute of a resource or data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,

    #[serde(rename = "type")]
    pub attr_type: AttributeType,

    /// Must be present in configuration.
    #[serde(default)]
    pub required: bool,

    /// May be present in configuration.
    #[serde(default)]
    pub optional: bool,

    /// Filled in by the provider from API responses.
    #[serde(default)]
    pub computed: bool,

    /// Masked in plan output.
    #[serde(default)]
    pub sensitive: bool,

    /// Changing the value replaces the object instead of updating it.
    #[serde(default)]
    pub force_new: bool,

    /// Value used when configuration omits the attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Attribute {
    /// Create an optional attribute.
    pub fn new(name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attr_type,
            required: false,
            optional: true,
            computed: false,
            sensitive: false,
            force_new: false,
            default: None,
            description: None,
        }
    }

    pub fn required_string(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::String).required()
    }

    pub fn optional_string(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::String)
    }

    pub fn optional_bool(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::Bool)
    }

    pub fn optional_int(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::Int)
    }

    pub fn optional_string_list(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::StringList)
    }

    pub fn optional_map(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::Map)
    }

    /// Create a computed-only attribute.
    pub fn computed_only(name: impl Into<String>, attr_type: AttributeType) -> Self {
        let mut attr = Self::new(name, attr_type);
        attr.optional = false;
        attr.computed = true;
        attr
    }

    /// Mark as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self.optional = false;
        self
    }

    /// Mark as computed (keeps `optional` as is).
    #[must_use]
    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    /// Mark as sensitive.
    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Mark as force-new.
    #[must_use]
    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    /// Set the default value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether configuration may set this attribute.
    #[must_use]
    pub fn is_configurable(&self) -> bool {
        self.required || self.optional
    }

    /// Whether only the provider sets this attribute.
    #[must_use]
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.is_configurable()
    }
}

/// Schema of one resource or data source type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// State layout version.
    pub version: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub attributes: Vec<Attribute>,
}

impl Schema {
    /// Create an empty version-0 schema.
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: 0,
            description: None,
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Find an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Check a configuration object against this schema.
    ///
    /// Returns one message per problem; empty means valid.
    #[must_use]
    pub fn validate_config(&self, config: &Map<String, Value>) -> Vec<String> {
        let mut problems = Vec::new();

        for attr in &self.attributes {
            match config.get(&attr.name) {
                None | Some(Value::Null) => {
                    if attr.required {
                        problems.push(format!("missing required attribute '{}'", attr.name));
                    }
                }
                Some(value) => {
                    if attr.is_computed_only() {
                        problems.push(format!(
                            "attribute '{}' is computed and cannot be set",
                            attr.name
                        ));
                    } else if !attr.attr_type.matches(value) {
                        problems.push(format!(
                            "attribute '{}' must be of type {}",
                            attr.name, attr.attr_type
                        ));
                    }
                }
            }
        }

        for key in config.keys() {
            if self.attribute(key).is_none() {
                problems.push(format!("unknown attribute '{key}'"));
            }
        }

        problems
    }

    /// Derive a data-source schema: `lookup` becomes the only required
    /// attribute, everything else is computed, sensitive attributes are
    /// dropped.
    #[must_use]
    pub fn as_lookup(&self, lookup: &str) -> Schema {
        let attributes = self
            .attributes
            .iter()
            .filter(|a| !a.sensitive)
            .map(|a| {
                if a.name == lookup {
                    Attribute::new(a.name.clone(), a.attr_type).required()
                } else {
                    Attribute::computed_only(a.name.clone(), a.attr_type)
                }
            })
            .collect();

        Schema {
            version: self.version,
            description: self.description.clone(),
            attributes,
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

/// All schemas exposed by the provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSchema {
    pub provider: Schema,
    pub resources: BTreeMap<String, Schema>,
    pub data_sources: BTreeMap<String, Schema>,
}
