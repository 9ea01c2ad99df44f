use clap::Parser;
use tracing_subscriber::EnvFilter;

use tokenreg::commands;

/// Build version string with git hash
fn version_string() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (",
        env!("GIT_HASH"),
        ")"
    )
}

/// tokreg - register an issued auth token for local cookie-auth debugging
#[derive(Parser)]
#[command(name = "tokreg")]
#[command(version = version_string())]
#[command(about = "Mark an issued auth token as authenticated in a local D1 database", long_about = None)]
struct Cli {
    /// Token (cookie value) to mark as authenticated
    #[arg(short, long)]
    token: String,

    /// Name of the local D1 database to run against
    #[arg(long)]
    db: String,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Status lines, including captured wrangler diagnostics, go to stdout;
    // any failure exits 1.
    if let Err(err) = commands::register::register(&cli.db, &cli.token).await {
        println!("{err:#}");
        std::process::exit(1);
    }
}
