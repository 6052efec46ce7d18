//! SSU notice bot CLI
//!
//! Runs once per invocation; schedule it with cron or a CI timer.

use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};
use notice_bot::{
    error::Result,
    models::{Config, Secrets},
    notify::SlackNotifier,
    pipeline::Orchestrator,
    services::HttpSource,
    storage::{LocalStore, NotifiedStore},
    utils::http,
};

/// ssu-notice-bot - University Notice Board Notifier
#[derive(Parser, Debug)]
#[command(
    name = "ssu-notice-bot",
    version,
    about = "Posts new university notices to a Slack webhook"
)]
struct Cli {
    /// Path to the configuration file (defaults are used when it does not exist)
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Directory holding the notified-post files
    #[arg(short, long, default_value = "database")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check every board once and post new notices (default)
    Run,

    /// Validate the configuration without touching the network
    Validate,

    /// Show where each board's state lives and how many posts it holds
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config)?;
    let store = LocalStore::new(&cli.storage_dir).with_boards(&config.boards);

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let secrets = Secrets::from_env()?;
            config.validate()?;

            let client = http::create_client(&config.http)?;
            let source = HttpSource::with_client(client.clone());
            let notifier = SlackNotifier::new(secrets.webhook_url, client);

            log::info!(
                "Checking {} boards, state in {}",
                config.boards.len(),
                store.root().display()
            );

            let summary = Orchestrator::new(&config, &source, &store, &notifier)
                .run()
                .await?;

            let failed = summary.failed_boards();
            if !failed.is_empty() {
                log::warn!("Boards treated as empty: {}", failed.join(", "));
            }
            log::info!("Notified {} new posts", summary.new_count());

            println!("Checked for new posts at {}", Local::now().format("%Y-%m-%d %H:%M:%S%.6f"));
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            for board in &config.boards {
                log::info!("✓ {} ({}) - {} page(s)", board.name, board.id, board.urls.len());
            }
            log::info!("All validations passed!");
        }

        Command::Info => {
            log::info!("Storage directory: {}", store.root().display());
            for board in &config.boards {
                let path = store.path_for(&board.id);
                if path.exists() {
                    let links = store.load(&board.id).await?;
                    log::info!("{}: {} notified posts in {}", board.name, links.len(), path.display());
                } else {
                    log::info!("{}: no state yet ({})", board.name, path.display());
                }
            }
        }
    }

    Ok(())
}
