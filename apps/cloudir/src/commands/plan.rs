//! Show what apply would change

use clap::Args;
use cloudir_provider::Provider;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::{compute_plan, configured_provider, refresh_state, render_plan, PlanEntry, PlanSummary};
use crate::error::CliResult;
use crate::manifest::Manifest;
use crate::state::{StateFile, DEFAULT_STATE_PATH};

/// Compare the manifest with the refreshed state
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Path to the manifest file
    #[arg(short = 'f', long = "file")]
    pub file: PathBuf,

    /// Path to the state file
    #[arg(long, default_value = DEFAULT_STATE_PATH)]
    pub state: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Plan output for `--json`.
#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub changes: Vec<PlanEntry>,
    pub summary: PlanSummary,
}

impl PlanReport {
    pub fn new(entries: Vec<PlanEntry>) -> Self {
        let summary = PlanSummary::from_entries(&entries);
        let changes = entries.iter().map(|e| PlanEntry {
            change: e.change.masked(),
            ..e.clone()
        });
        Self {
            changes: changes.collect(),
            summary,
        }
    }
}

/// Execute the plan command
pub async fn execute(args: PlanArgs) -> CliResult<()> {
    let manifest = Manifest::load(&args.file)?;
    let provider = configured_provider(&manifest.provider)?;

    let entries = run(&provider, &manifest, &args.state).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&PlanReport::new(entries))?);
    } else {
        print!("{}", render_plan(&entries));
    }
    Ok(())
}

/// Refresh an in-memory copy of the state and plan against it. The state
/// file is not written.
pub async fn run(
    provider: &Provider,
    manifest: &Manifest,
    state_path: &Path,
) -> CliResult<Vec<PlanEntry>> {
    let mut state = StateFile::load(state_path)?;
    refresh_state(provider, &mut state).await?;
    compute_plan(provider, manifest, &state)
}
