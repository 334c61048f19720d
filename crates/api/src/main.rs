//! Music Features - Main Entry Point

use anyhow::Result;
use api::{init_logging, run_extract, run_server, AppConfig};
use clap::{Parser, Subcommand};
use dataset_builder::FailurePolicy;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "music-features")]
#[command(about = "Build and serve a tabular dataset of audio features")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true, env = "MUSIC_FEATURES_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse a directory of audio files and write the dataset CSV
    Extract {
        /// Directory containing the audio files
        #[arg(short, long)]
        input_dir: Option<PathBuf>,
        /// Output CSV path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Record failing files and continue instead of aborting
        #[arg(long)]
        skip_failures: bool,
    },
    /// Serve the dataset to the dashboard
    Serve {
        /// Dataset CSV to serve
        #[arg(short, long)]
        dataset: Option<PathBuf>,
        /// Address to listen on
        #[arg(short, long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    init_logging(&config.log_level)?;

    info!("=== Music Features v{} ===", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Extract {
            input_dir,
            output,
            skip_failures,
        } => {
            if input_dir.is_some() {
                config.input_dir = input_dir;
            }
            if let Some(output) = output {
                config.output_csv = output;
            }
            if skip_failures {
                config.failure_policy = FailurePolicy::SkipAndRecord;
            }
            // Extraction is blocking; keep it off the async workers
            let report = tokio::task::spawn_blocking(move || run_extract(&config)).await??;
            info!("Extraction finished: {} rows, {} faults", report.succeeded(), report.failed());
        }
        Command::Serve { dataset, bind } => {
            if let Some(dataset) = dataset {
                config.output_csv = dataset;
            }
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            run_server(&config).await?;
        }
    }

    Ok(())
}
