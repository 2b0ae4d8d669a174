//! cloudir - manage directory-service objects from a manifest
//!
//! - `schema`: print resource and data source schemas
//! - `plan`: show what would change
//! - `apply`: make the directory match the manifest
//! - `destroy`: delete everything in the state file
//! - `import`: adopt an existing object

use clap::{Parser, Subcommand};

use cloudir::commands;
use cloudir::error::CliResult;
use cloudir::logging::init_logging;

/// cloudir - directory-service infrastructure as code
#[derive(Parser)]
#[command(name = "cloudir")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the provider schema as JSON
    Schema(commands::schema::SchemaArgs),

    /// Show the changes apply would make
    Plan(commands::plan::PlanArgs),

    /// Apply the manifest
    Apply(commands::apply::ApplyArgs),

    /// Delete every managed object
    Destroy(commands::destroy::DestroyArgs),

    /// Import an existing object into state
    Import(commands::import::ImportArgs),
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Schema(args) => commands::schema::execute(args).await,
        Commands::Plan(args) => commands::plan::execute(args).await,
        Commands::Apply(args) => commands::apply::execute(args).await,
        Commands::Destroy(args) => commands::destroy::execute(args).await,
        Commands::Import(args) => commands::import::execute(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_apply_flags() {
        let cli = Cli::try_parse_from(["cloudir", "-vv", "apply", "-f", "infra.yaml", "--dry-run"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Apply(args) => {
                assert!(args.dry_run);
                assert_eq!(args.state.to_str(), Some("cloudir.state.json"));
            }
            _ => panic!("expected apply"),
        }
    }

    #[test]
    fn test_parse_import_positionals() {
        let cli = Cli::try_parse_from(["cloudir", "import", "eng", "cloudir_user_group", "g1"]).unwrap();
        match cli.command {
            Commands::Import(args) => {
                assert_eq!(args.name, "eng");
                assert_eq!(args.type_name, "cloudir_user_group");
                assert_eq!(args.id, "g1");
                assert!(args.file.is_none());
            }
            _ => panic!("expected import"),
        }
    }
}
