//! CLI commands
//!
//! Each command has an `Args` struct, an `execute` entry point used by the
//! binary, and a `run` function taking an already-configured [`Provider`]
//! so the logic can be driven against a mock API.

pub mod apply;
pub mod destroy;
pub mod import;
pub mod plan;
pub mod schema;

use cloudir_provider::{PlanAction, PlannedChange, Provider, ProviderSettings};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{CliError, CliResult};
use crate::manifest::Manifest;
use crate::state::StateFile;

/// Build and configure a provider from a manifest provider block.
pub fn configured_provider(settings: &ProviderSettings) -> CliResult<Provider> {
    let mut provider = Provider::new();
    provider.configure(settings)?;
    Ok(provider)
}

/// Planned change for one named instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(flatten)]
    pub change: PlannedChange,
}

impl PlanEntry {
    pub fn address(&self) -> String {
        format!("{}.{}", self.type_name, self.name)
    }
}

/// Count of planned actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub create: usize,
    pub update: usize,
    pub replace: usize,
    pub delete: usize,
    pub unchanged: usize,
}

impl PlanSummary {
    pub fn from_entries(entries: &[PlanEntry]) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            match entry.change.action {
                PlanAction::Create => summary.create += 1,
                PlanAction::Update => summary.update += 1,
                PlanAction::Replace => summary.replace += 1,
                PlanAction::Delete => summary.delete += 1,
                PlanAction::NoOp => summary.unchanged += 1,
            }
        }
        summary
    }

    pub fn has_changes(&self) -> bool {
        self.create + self.update + self.replace + self.delete > 0
    }
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to create, {} to update, {} to replace, {} to delete",
            self.create, self.update, self.replace, self.delete
        )
    }
}

/// Re-read every state entry, dropping entries whose object is gone.
pub async fn refresh_state(provider: &Provider, state: &mut StateFile) -> CliResult<()> {
    let names: Vec<String> = state.resources.keys().cloned().collect();

    for name in names {
        let Some(entry) = state.get(&name) else {
            continue;
        };
        let refreshed = provider.refresh(&entry.type_name, &entry.attributes).await?;

        match refreshed {
            Some(attributes) => {
                debug!(name = %name, "Refreshed state entry");
                if let Some(entry) = state.resources.get_mut(&name) {
                    entry.attributes = attributes;
                }
            }
            None => {
                warn!(name = %name, "Object no longer exists, dropping it from state");
                state.remove(&name);
            }
        }
    }

    Ok(())
}

/// Check every data block, then plan every manifest resource, then every
/// state entry the manifest no longer names.
pub fn compute_plan(
    provider: &Provider,
    manifest: &Manifest,
    state: &StateFile,
) -> CliResult<Vec<PlanEntry>> {
    for block in &manifest.data {
        provider.validate_data_source(&block.type_name, &block.config)?;
    }

    let mut entries = Vec::new();

    for block in &manifest.resources {
        let prior = state.get(&block.name);
        if let Some(prior) = prior {
            if prior.type_name != block.type_name {
                return Err(CliError::Validation(format!(
                    "Resource '{}' changed type from {} to {}. Destroy it first or pick a new name.",
                    block.name, prior.type_name, block.type_name
                )));
            }
        }

        let change = provider.plan(
            &block.type_name,
            prior.map(|p| &p.attributes),
            Some(&block.config),
        )?;
        entries.push(PlanEntry {
            name: block.name.clone(),
            type_name: block.type_name.clone(),
            change,
        });
    }

    for (name, entry) in &state.resources {
        if manifest.resource(name).is_some() {
            continue;
        }
        let change = provider.plan(&entry.type_name, Some(&entry.attributes), None)?;
        entries.push(PlanEntry {
            name: name.clone(),
            type_name: entry.type_name.clone(),
            change,
        });
    }

    Ok(entries)
}

/// Human-readable plan. Sensitive values are masked.
pub fn render_plan(entries: &[PlanEntry]) -> String {
    let mut out = String::new();

    for entry in entries.iter().filter(|e| e.change.has_changes()) {
        let change = entry.change.masked();
        out.push_str(&format!(
            "{:>3} {} ({})\n",
            change.action.symbol(),
            entry.address(),
            change.action
        ));
        for field in &change.field_changes {
            let marker = if field.force_new && change.action == PlanAction::Replace {
                "  # forces replacement"
            } else {
                ""
            };
            let line = match change.action {
                PlanAction::Create => render_value(field.new_value.as_ref()),
                PlanAction::Delete => render_value(field.old_value.as_ref()),
                _ => format!(
                    "{} -> {}",
                    render_value(field.old_value.as_ref()),
                    render_value(field.new_value.as_ref())
                ),
            };
            out.push_str(&format!("      {}: {}{}\n", field.path, line, marker));
        }
    }

    let summary = PlanSummary::from_entries(entries);
    if summary.has_changes() {
        out.push_str(&format!("\nPlan: {}.\n", summary));
    } else {
        out.push_str("No changes. Infrastructure matches the configuration.\n");
    }
    out
}

fn render_value(value: Option<&serde_json::Value>) -> String {
    match value {
        None => "(unset)".to_string(),
        Some(v) => v.to_string(),
    }
}
