//! CardCognition web shell server.
//!
//! ```text
//! cardcognition --config shell.toml
//! cardcognition --config shell.toml --check
//! cardcognition --bind 127.0.0.1:3000
//! ```

use std::path::PathBuf;

use clap::Parser;

use cardcognition::config::{load_config, validation::validate_config, ConfigError, ShellConfig};
use cardcognition::lifecycle::startup;
use cardcognition::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "cardcognition")]
#[command(about = "CardCognition web shell and deck-optimizer API gateway", long_about = None)]
struct Args {
    /// TOML configuration file; watched for changes while running.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ShellConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    if args.check {
        println!("configuration OK");
        return Ok(());
    }

    init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        api_upstream = %config.api.upstream,
        request_timeout_secs = config.timeouts.request_secs,
        "cardcognition starting"
    );

    startup::run(config, args.config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
