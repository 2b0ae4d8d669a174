//! Attribute bag passed through resource operations

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{ProviderError, ProviderResult};
use crate::schema::Schema;

/// Attribute name the identifier is stored under in state.
pub const ID_ATTRIBUTE: &str = "id";

/// Identifier plus attribute values of one resource or data-source instance.
///
/// During an update `prior` holds the attributes as they were in state, so
/// resources can tell which attributes changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    id: Option<String>,
    attributes: Map<String, Value>,
    prior: Option<Map<String, Value>>,
}

impl ResourceData {
    /// Create empty data with no id.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create data from configuration, filling schema defaults for absent
    /// attributes.
    #[must_use]
    pub fn from_config(schema: &Schema, config: &Map<String, Value>) -> Self {
        let mut attributes = config.clone();
        for attr in &schema.attributes {
            if let Some(ref default) = attr.default {
                let absent = attributes.get(&attr.name).map_or(true, Value::is_null);
                if absent {
                    attributes.insert(attr.name.clone(), default.clone());
                }
            }
        }
        Self {
            id: None,
            attributes,
            prior: None,
        }
    }

    /// Rebuild data from a state object (attributes plus `id`).
    #[must_use]
    pub fn from_state(state: &Map<String, Value>) -> Self {
        let mut attributes = state.clone();
        let id = match attributes.remove(ID_ATTRIBUTE) {
            Some(Value::String(id)) if !id.is_empty() => Some(id),
            _ => None,
        };
        Self {
            id,
            attributes,
            prior: None,
        }
    }

    /// Create data with only an id set.
    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        let mut data = Self::new();
        data.set_id(id);
        data
    }

    /// Attach the previous attribute values for change detection.
    #[must_use]
    pub fn with_prior(mut self, prior: Map<String, Value>) -> Self {
        self.prior = Some(prior);
        self
    }

    /// Serialize to a state object (attributes plus `id`).
    #[must_use]
    pub fn to_state(&self) -> Map<String, Value> {
        let mut state = self.attributes.clone();
        if let Some(ref id) = self.id {
            state.insert(ID_ATTRIBUTE.to_string(), Value::String(id.clone()));
        }
        state
    }

    // ── Identifier ────────────────────────────────────────────────────

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The id, or an error naming the resource type.
    pub fn require_id(&self, type_name: &str) -> ProviderResult<&str> {
        self.id().ok_or_else(|| ProviderError::MissingId {
            type_name: type_name.to_string(),
        })
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.id = if id.is_empty() { None } else { Some(id) };
    }

    /// Mark the object as gone.
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    // ── Attributes ────────────────────────────────────────────────────

    #[must_use]
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Get an attribute; `null` reads as absent.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name).filter(|v| !v.is_null())
    }

    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Get a string attribute that must be present.
    pub fn get_string(&self, name: &str) -> ProviderResult<String> {
        self.get_str(name)
            .map(str::to_string)
            .ok_or_else(|| ProviderError::invalid_attribute(name, "a string value is required"))
    }

    #[must_use]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    #[must_use]
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    /// Get a list of strings; absent reads as empty, non-strings are skipped.
    #[must_use]
    pub fn get_string_list(&self, name: &str) -> Vec<String> {
        self.get(name)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get a string map; absent reads as empty.
    #[must_use]
    pub fn get_string_map(&self, name: &str) -> BTreeMap<String, String> {
        self.get(name)
            .and_then(Value::as_object)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Set an attribute. `None` values are stored as `null`.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    /// Whether `name` differs from its prior value. Without a prior
    /// snapshot every present attribute counts as changed.
    #[must_use]
    pub fn has_change(&self, name: &str) -> bool {
        let current = self.get(name);
        match self.prior {
            Some(ref prior) => prior.get(name).filter(|v| !v.is_null()) != current,
            None => current.is_some(),
        }
    }
}
