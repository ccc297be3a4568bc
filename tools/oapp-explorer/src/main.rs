//! OApp Explorer entry point.

use anyhow::Result;
use clap::Parser;
use tracing::warn;

use oapp_02_security_crawler::CancelFlag;
use oapp_explorer::cli::{Cli, Command};
use oapp_explorer::commands;
use oapp_telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if cli.verbose {
        telemetry = telemetry.with_log_level("debug");
    }
    init_telemetry(&telemetry)?;

    let config = commands::load_config(cli.config.as_deref())?;

    let output = match cli.command {
        Command::Crawl {
            seed,
            depth,
            source,
            output,
        } => {
            let cancel = CancelFlag::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("[explorer] Interrupted, stopping after the current node");
                    on_signal.cancel();
                }
            });
            commands::crawl(&config, &seed, depth, &source, output.as_deref(), cancel).await?
        }
        Command::Analyze { crawl } => commands::analyze(&config, &crawl).await?,
        Command::Layout { crawl, center } => {
            commands::layout(&config, &crawl, center.as_deref()).await?
        }
        Command::Defaults { source, limit } => commands::defaults(&config, &source, limit).await?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    if cli.metrics {
        eprint!("{}", commands::metrics_report()?);
    }
    Ok(())
}
