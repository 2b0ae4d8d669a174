//! Import an existing object into state

use clap::Args;
use cloudir_provider::{Provider, ProviderSettings, State};
use std::path::{Path, PathBuf};

use super::configured_provider;
use crate::error::{CliError, CliResult};
use crate::manifest::Manifest;
use crate::state::{StateEntry, StateFile, DEFAULT_STATE_PATH};

/// Bring an existing directory object under management
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Name to record the object under
    pub name: String,

    /// Resource type, e.g. cloudir_user
    #[arg(value_name = "TYPE")]
    pub type_name: String,

    /// Object identifier (composite for memberships and associations)
    pub id: String,

    /// Manifest whose provider block configures the API connection
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Path to the state file
    #[arg(long, default_value = DEFAULT_STATE_PATH)]
    pub state: PathBuf,
}

/// Execute the import command
pub async fn execute(args: ImportArgs) -> CliResult<()> {
    let settings = match &args.file {
        Some(file) => Manifest::load(file)?.provider,
        None => ProviderSettings::default(),
    };
    let provider = configured_provider(&settings)?;

    let attributes = run(&provider, &args.name, &args.type_name, &args.id, &args.state).await?;

    println!(
        "Imported {}.{} (id {})",
        args.type_name,
        args.name,
        attributes.get("id").and_then(|v| v.as_str()).unwrap_or(&args.id)
    );
    Ok(())
}

/// Import `id` as `name` and save the state.
pub async fn run(
    provider: &Provider,
    name: &str,
    type_name: &str,
    id: &str,
    state_path: &Path,
) -> CliResult<State> {
    let mut state = StateFile::load(state_path)?;
    if let Some(existing) = state.get(name) {
        return Err(CliError::Validation(format!(
            "'{}' is already managed as {}. Pick another name.",
            name, existing.type_name
        )));
    }

    let attributes = provider.import(type_name, id).await?;
    state.insert(name, StateEntry::new(type_name, attributes.clone()));
    state.save(state_path)?;

    Ok(attributes)
}
