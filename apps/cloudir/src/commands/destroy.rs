//! Delete every managed object

use clap::Args;
use cloudir_provider::Provider;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use super::configured_provider;
use crate::error::CliResult;
use crate::manifest::Manifest;
use crate::state::{StateFile, DEFAULT_STATE_PATH};

/// Delete every object recorded in the state file
#[derive(Args, Debug)]
pub struct DestroyArgs {
    /// Path to the manifest file
    #[arg(short = 'f', long = "file")]
    pub file: PathBuf,

    /// Path to the state file
    #[arg(long, default_value = DEFAULT_STATE_PATH)]
    pub state: PathBuf,
}

/// Execute the destroy command
pub async fn execute(args: DestroyArgs) -> CliResult<()> {
    let manifest = Manifest::load(&args.file)?;
    let provider = configured_provider(&manifest.provider)?;

    let destroyed = run(&provider, &manifest, &args.state).await?;

    if destroyed.is_empty() {
        println!("Nothing to destroy.");
    } else {
        for name in &destroyed {
            println!("  - {}", name);
        }
        println!("\nDestroy complete! {} object(s) deleted.", destroyed.len());
    }
    Ok(())
}

/// Order in which state entries are deleted: manifest resources in reverse
/// order, then entries the manifest does not name.
pub fn destroy_order(manifest: &Manifest, state: &StateFile) -> Vec<String> {
    let mut order: Vec<String> = manifest
        .resources
        .iter()
        .rev()
        .filter(|b| state.contains(&b.name))
        .map(|b| b.name.clone())
        .collect();

    order.extend(
        state
            .resources
            .keys()
            .rev()
            .filter(|name| manifest.resource(name).is_none())
            .cloned(),
    );
    order
}

/// Delete every state entry, saving the state after each deletion.
/// Returns the deleted names.
pub async fn run(
    provider: &Provider,
    manifest: &Manifest,
    state_path: &Path,
) -> CliResult<Vec<String>> {
    let mut state = StateFile::load(state_path)?;
    let mut destroyed = Vec::new();

    for name in destroy_order(manifest, &state) {
        let Some(entry) = state.get(&name) else {
            continue;
        };

        if let Err(e) = provider
            .apply(&entry.type_name, Some(&entry.attributes), None)
            .await
        {
            error!(name = %name, error = %e, "Destroy failed");
            state.save(state_path)?;
            return Err(e.into());
        }

        info!(name = %name, "Destroyed");
        state.remove(&name);
        state.save(state_path)?;
        destroyed.push(name);
    }

    Ok(destroyed)
}
