mod cli;
mod handlers;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use debrid_dl::config::ConfigManager;
use std::process;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Validate CLI arguments first
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    // Initialize logging based on verbosity
    if args.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    let config_manager = ConfigManager::new()?;

    if !handlers::should_skip_config_validation(&args.command) {
        if let Err(e) = config_manager.validate() {
            eprintln!("Configuration validation failed: {}", e);
            eprintln!(
                "Edit {} or delete it to regenerate the defaults",
                config_manager.config_file().display()
            );
            process::exit(1);
        }
    }

    let api_key = args.api_key.clone();

    match args.command {
        Commands::Fetch {
            magnet,
            output,
            poll_seconds,
            timeout_seconds,
        } => {
            handlers::handle_fetch(
                &config_manager,
                api_key,
                magnet,
                output,
                poll_seconds,
                timeout_seconds,
            )
            .await?;
        }
        Commands::Key { action } => {
            handlers::handle_key(action).await?;
        }
        Commands::Config { action } => {
            handlers::handle_config(&config_manager, action).await?;
        }
    }

    Ok(())
}
