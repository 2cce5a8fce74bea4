//! Command-line entry point.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use entraseed::commands::{cleanup, generate, tags};
use entraseed::error::CliResult;

#[derive(Parser)]
#[command(
    name = "entraseed",
    version,
    about = "Seed and clean up synthetic Entra ID load-test data"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create tagged users, nested groups, and memberships.
    Generate(generate::GenerateArgs),
    /// Remove everything a previous run created.
    Cleanup(cleanup::CleanupArgs),
    /// List leftover run tags in the tenant.
    Tags(tags::TagsArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        e.print();
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Generate(args) => generate::execute(args).await,
        Commands::Cleanup(args) => cleanup::execute(args).await,
        Commands::Tags(args) => tags::execute(args).await,
    }
}
