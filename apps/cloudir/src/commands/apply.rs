//! Apply the manifest

use clap::Args;
use cloudir_provider::{PlanAction, Provider, State};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use super::{compute_plan, configured_provider, refresh_state, render_plan, PlanEntry, PlanSummary};
use crate::error::CliResult;
use crate::manifest::Manifest;
use crate::state::{StateEntry, StateFile, DEFAULT_STATE_PATH};

/// Create, update and delete objects until they match the manifest
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Path to the manifest file
    #[arg(short = 'f', long = "file")]
    pub file: PathBuf,

    /// Path to the state file
    #[arg(long, default_value = DEFAULT_STATE_PATH)]
    pub state: PathBuf,

    /// Preview changes without applying
    #[arg(long)]
    pub dry_run: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Outcome of one apply run.
#[derive(Debug, Serialize)]
pub struct ApplyReport {
    pub dry_run: bool,
    pub changes: Vec<PlanEntry>,
    pub summary: PlanSummary,
    /// Data source results by block name.
    pub data: BTreeMap<String, State>,
}

/// Execute the apply command
pub async fn execute(args: ApplyArgs) -> CliResult<()> {
    let manifest = Manifest::load(&args.file)?;
    let provider = configured_provider(&manifest.provider)?;

    let report = run(&provider, &manifest, &args.state, args.dry_run).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Refresh, plan and execute.
///
/// Changes run in manifest order; deletions of instances the manifest no
/// longer names come last. State is saved after every change, and once more
/// before a failure is returned.
pub async fn run(
    provider: &Provider,
    manifest: &Manifest,
    state_path: &Path,
    dry_run: bool,
) -> CliResult<ApplyReport> {
    let mut state = StateFile::load(state_path)?;
    refresh_state(provider, &mut state).await?;

    let entries = compute_plan(provider, manifest, &state)?;
    let summary = PlanSummary::from_entries(&entries);

    if !dry_run {
        state.save(state_path)?;
        for entry in entries.iter().filter(|e| e.change.has_changes()) {
            if let Err(e) = apply_entry(provider, manifest, &mut state, entry).await {
                error!(name = %entry.name, error = %e, "Apply failed");
                state.save(state_path)?;
                return Err(e);
            }
            state.save(state_path)?;
        }
    }

    let data = read_data_sources(provider, manifest).await?;

    Ok(ApplyReport {
        dry_run,
        changes: entries
            .iter()
            .map(|e| PlanEntry {
                change: e.change.masked(),
                ..e.clone()
            })
            .collect(),
        summary,
        data,
    })
}

async fn apply_entry(
    provider: &Provider,
    manifest: &Manifest,
    state: &mut StateFile,
    entry: &PlanEntry,
) -> CliResult<()> {
    let prior = state.get(&entry.name).map(|e| &e.attributes);
    let config = match entry.change.action {
        PlanAction::Delete => None,
        _ => manifest.resource(&entry.name).map(|b| &b.config),
    };

    let new_state = provider.apply(&entry.type_name, prior, config).await?;

    match new_state {
        Some(attributes) => {
            info!(name = %entry.name, action = %entry.change.action, "Applied");
            state.insert(entry.name.clone(), StateEntry::new(&entry.type_name, attributes));
        }
        None => {
            info!(name = %entry.name, "Deleted");
            state.remove(&entry.name);
        }
    }
    Ok(())
}

async fn read_data_sources(
    provider: &Provider,
    manifest: &Manifest,
) -> CliResult<BTreeMap<String, State>> {
    let mut results = BTreeMap::new();
    for block in &manifest.data {
        let state = provider
            .read_data_source(&block.type_name, &block.config)
            .await?;
        results.insert(block.name.clone(), state);
    }
    Ok(results)
}

fn print_report(report: &ApplyReport) {
    print!("{}", render_plan(&report.changes));

    if report.dry_run {
        println!("\nDry run: no changes were applied.");
    } else if report.summary.has_changes() {
        println!("\nApply complete! {}.", report.summary);
    }

    for (name, attributes) in &report.data {
        println!("\ndata.{}:", name);
        for (key, value) in attributes {
            println!("  {} = {}", key, value);
        }
    }
}
