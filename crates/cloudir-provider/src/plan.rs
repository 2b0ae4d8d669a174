//! Plan computation
//!
//! Compares the prior state of one instance with its desired configuration
//! and decides what `apply` has to do.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::data::ResourceData;
use crate::schema::Schema;

/// Text shown instead of sensitive values.
pub const SENSITIVE_PLACEHOLDER: &str = "(sensitive)";

/// What `apply` will do with one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    Create,
    Update,
    /// Delete, then create.
    Replace,
    Delete,
    NoOp,
}

impl PlanAction {
    /// Short marker used in plan output.
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            PlanAction::Create => "+",
            PlanAction::Update => "~",
            PlanAction::Replace => "-/+",
            PlanAction::Delete => "-",
            PlanAction::NoOp => " ",
        }
    }
}

impl std::fmt::Display for PlanAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanAction::Create => write!(f, "create"),
            PlanAction::Update => write!(f, "update"),
            PlanAction::Replace => write!(f, "replace"),
            PlanAction::Delete => write!(f, "delete"),
            PlanAction::NoOp => write!(f, "no-op"),
        }
    }
}

/// A single attribute-level change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Attribute name.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
    #[serde(default)]
    pub sensitive: bool,
    /// Changing this attribute replaces the object.
    #[serde(default)]
    pub force_new: bool,
}

impl FieldChange {
    /// Copy with sensitive values replaced by a placeholder.
    #[must_use]
    pub fn masked(&self) -> FieldChange {
        if !self.sensitive {
            return self.clone();
        }
        let mask = |v: &Option<Value>| {
            v.as_ref()
                .map(|_| Value::String(SENSITIVE_PLACEHOLDER.to_string()))
        };
        FieldChange {
            old_value: mask(&self.old_value),
            new_value: mask(&self.new_value),
            ..self.clone()
        }
    }
}

/// Result of planning one instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedChange {
    pub action: PlanAction,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub field_changes: Vec<FieldChange>,
}

impl PlannedChange {
    #[must_use]
    pub fn no_op() -> Self {
        Self {
            action: PlanAction::NoOp,
            field_changes: Vec::new(),
        }
    }

    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.action != PlanAction::NoOp
    }

    /// Copy with sensitive values masked.
    #[must_use]
    pub fn masked(&self) -> PlannedChange {
        PlannedChange {
            action: self.action,
            field_changes: self.field_changes.iter().map(FieldChange::masked).collect(),
        }
    }
}

/// Empty lists, maps and `null` all mean "unset".
fn normalize(value: Option<&Value>) -> Option<&Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) if items.is_empty() => None,
        Some(Value::Object(entries)) if entries.is_empty() => None,
        other => other,
    }
}

/// Decide what to do with one instance.
///
/// `prior` is the refreshed state (`None` or without id when the object
/// does not exist); `config` is the desired configuration (`None` when the
/// instance was removed from configuration).
#[must_use]
pub fn plan_change(
    schema: &Schema,
    prior: Option<&ResourceData>,
    config: Option<&Map<String, Value>>,
) -> PlannedChange {
    let prior = prior.filter(|p| p.id().is_some());

    match (prior, config) {
        (None, None) => PlannedChange::no_op(),
        (None, Some(config)) => {
            let planned = ResourceData::from_config(schema, config);
            let field_changes = schema
                .attributes
                .iter()
                .filter_map(|attr| {
                    normalize(planned.get(&attr.name)).map(|v| FieldChange {
                        path: attr.name.clone(),
                        old_value: None,
                        new_value: Some(v.clone()),
                        sensitive: attr.sensitive,
                        force_new: false,
                    })
                })
                .collect();
            PlannedChange {
                action: PlanAction::Create,
                field_changes,
            }
        }
        (Some(_), None) => PlannedChange {
            action: PlanAction::Delete,
            field_changes: Vec::new(),
        },
        (Some(prior), Some(config)) => {
            let planned = ResourceData::from_config(schema, config);
            let mut field_changes = Vec::new();

            for attr in schema.attributes.iter().filter(|a| a.is_configurable()) {
                let new_value = normalize(planned.get(&attr.name));
                if new_value.is_none() && attr.computed {
                    continue;
                }
                let old_value = normalize(prior.get(&attr.name));
                if old_value != new_value {
                    field_changes.push(FieldChange {
                        path: attr.name.clone(),
                        old_value: old_value.cloned(),
                        new_value: new_value.cloned(),
                        sensitive: attr.sensitive,
                        force_new: attr.force_new,
                    });
                }
            }

            let action = if field_changes.is_empty() {
                PlanAction::NoOp
            } else if field_changes.iter().any(|c| c.force_new) {
                PlanAction::Replace
            } else {
                PlanAction::Update
            };

            PlannedChange {
                action,
                field_changes,
            }
        }
    }
}
