//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    config::{ApiConfig, StorageConfig},
    request::Network,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Get daily surface weather observations
    Weather {
        #[command(flatten)]
        range: RangeArgs,
        #[command(flatten)]
        api: ApiConfig,
    },
    /// Get minute marine buoy observations, sampled once per day
    Marine {
        #[command(flatten)]
        range: RangeArgs,
        #[command(flatten)]
        api: ApiConfig,
    },
    /// Get station metadata
    Stations {
        /// Station network
        #[arg(long, default_value = "SFC", value_parser = parse_network)]
        network: Network,
        /// Station ids separated by `:`; `0` for all
        #[arg(long, default_value = "0")]
        stations: String,
        #[command(flatten)]
        api: ApiConfig,
    },
    /// Merge per-day CSV files into one file
    Merge {
        #[arg(value_enum)]
        dataset: Dataset,
        /// Directory holding the downloaded files
        #[arg(long, env = "KMA_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,
    },
    /// Upload the merged files and metadata to S3
    Sync {
        /// Directory holding the files to upload
        #[arg(long, env = "KMA_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,
        /// Compare content digests when sizes match
        #[arg(long)]
        checksum: bool,
        #[command(flatten)]
        storage: StorageConfig,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RangeArgs {
    /// First date (or date and time for marine data); latest data when omitted
    #[arg(long)]
    pub start: Option<String>,
    /// Last date, inclusive; defaults to the start
    #[arg(long, requires = "start")]
    pub end: Option<String>,
    /// Station ids separated by `:`; `0` for all
    #[arg(long, default_value = "0")]
    pub stations: String,
    /// Do not request the field explanation block
    #[arg(long)]
    pub no_help: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Weather,
    Marine,
}

fn parse_network(s: &str) -> Result<Network, String> {
    Network::from_str(s).ok_or_else(|| format!("unknown station network `{}`", s))
}

/// Sends logs to stderr, filtered by `RUST_LOG` when set.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("kma_etl={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    let style =
        ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");

    ProgressBar::new(size).with_message(message).with_style(style)
}
