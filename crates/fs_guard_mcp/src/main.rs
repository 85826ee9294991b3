mod cli;
mod config;
mod errors;
mod service;
mod utils;

use clap::Parser;

use cli::Cli;
use utils::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on environment
    logging::init_logging()?;

    // Run the requested guard command
    match cli::run(cli).await {
        Ok(0) => Ok(()),
        Ok(failed) => {
            tracing::warn!("{} path check(s) failed", failed);
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("Failed to run filesystem guard: {}", e);
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
