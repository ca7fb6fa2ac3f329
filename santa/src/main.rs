//! Main entry point for the santa binary
//!
//! Loads the run configuration, wires the real services into `SecretSanta`
//! and processes every group.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use santa::{
    services::{ConsoleNotifier, FileRecordStore, HttpRelayNotifier},
    Config, Notifier, RunSummary, SantaError, SantaResult, SecretSanta, Strategy,
};
use shared::logging;

/// Assign secret santa recipients and notify every participant
#[derive(Parser)]
#[command(name = "santa")]
#[command(about = "Assigns secret santa recipients without repeating past years")]
pub struct Args {
    /// Path to the JSON run configuration
    #[arg(long, default_value = "santa.json")]
    pub config: PathBuf,

    /// Print messages instead of sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Override the number of assignment attempts per group
    #[arg(long)]
    pub retry_limit: Option<u32>,

    /// Override the assignment search strategy
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Command line names for the assignment strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Greedy,
    Exhaustive,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Greedy => Strategy::Greedy,
            StrategyArg::Exhaustive => Strategy::Exhaustive,
        }
    }
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if self.dry_run {
            config.dry_run = true;
        }
        if let Some(retry_limit) = self.retry_limit {
            config.retry_limit = retry_limit;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy.into();
        }
    }
}

#[tokio::main]
async fn main() -> SantaResult<()> {
    let args = Args::parse();
    logging::init_tracing(Some(&args.log_level));

    let mut config = Config::load(&args.config).await?;
    args.apply(&mut config);
    config.validate()?;

    logging::log_startup(&format!(
        "secret santa for {} group(s){}",
        config.groups.len(),
        if config.dry_run { " (dry run)" } else { "" }
    ));

    let summary = if config.dry_run {
        execute(config, ConsoleNotifier::new()).await?
    } else {
        let relay = config
            .relay
            .as_ref()
            .ok_or_else(|| SantaError::config("relay"))?;
        let notifier = HttpRelayNotifier::from_config(&config.from_address, relay)?;
        execute(config, notifier).await?
    };

    let failed: Vec<String> = summary.failures().map(|(group, _)| group.to_string()).collect();
    if !failed.is_empty() {
        logging::log_error("Secret santa", &format!("{} group(s) not assigned: {}", failed.len(), failed.join(", ")));
        std::process::exit(1);
    }

    tracing::info!("🎁 All groups assigned");
    Ok(())
}

async fn execute<N: Notifier>(config: Config, notifier: N) -> SantaResult<RunSummary> {
    SecretSanta::new(config, FileRecordStore::new(), notifier).run().await
}
