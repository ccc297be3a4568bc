//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// OApp Explorer: security graph around a LayerZero OApp
#[derive(Parser, Debug)]
#[command(name = "oapp-explorer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(short = 'c', long = "config", env = "OAPP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Print Prometheus metrics to stderr after the command
    #[arg(long, global = true)]
    pub metrics: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Where batches come from.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// GraphQL endpoint URL (overrides `loader.endpoint`)
    #[arg(short, long, conflicts_with = "snapshot")]
    pub endpoint: Option<String>,

    /// Serve batches from a JSON snapshot instead of the network
    #[arg(short, long)]
    pub snapshot: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Crawl the peer graph around a seed OApp
    Crawl {
        /// Seed OApp id, `<eid>_<address>`
        seed: String,

        /// Maximum crawl depth (capped at 20)
        #[arg(short, long)]
        depth: Option<u32>,

        #[command(flatten)]
        source: SourceArgs,

        /// Write the crawl to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Analyze a saved crawl
    Analyze {
        /// Crawl file written by `crawl --output`
        crawl: PathBuf,
    },
    /// Compute node positions for a saved crawl
    Layout {
        /// Crawl file written by `crawl --output`
        crawl: PathBuf,

        /// Center node; the crawl seed when omitted
        #[arg(long)]
        center: Option<String>,
    },
    /// List OApps on the chain default config, busiest first
    Defaults {
        #[command(flatten)]
        source: SourceArgs,

        /// Number of OApps to list
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },
}
