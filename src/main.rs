//! sdnatui: text UI for a serval-dna mesh daemon
//!
//! Without a subcommand the dialog UI starts. `size` and `parse` expose the
//! byte size converter on the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use num_bigint::BigInt;
use std::path::PathBuf;
use std::process::ExitCode;

use sdnatui::logging::{default_log_path, init_file_logging};
use sdnatui::settings::SettingsStore;
use sdnatui::size::{bytes_to_human_named, human_to_bytes, SizeTemplate, DEFAULT_TEMPLATE};
use sdnatui::ui::runner::{run_tui, RunOutcome};

fn main() -> Result<ExitCode> {
    let args = Cli::parse();

    match args.command {
        Some(Command::Size {
            count,
            table,
            format,
        }) => {
            let template: SizeTemplate = format.parse()?;
            println!("{}", bytes_to_human_named(count, &template, &table)?);
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Parse { input }) => {
            println!("{}", human_to_bytes(&input)?);
            Ok(ExitCode::SUCCESS)
        }
        None => run_ui(args.config, args.log_file),
    }
}

fn run_ui(config: Option<PathBuf>, log_file: Option<PathBuf>) -> Result<ExitCode> {
    let log_path = log_file
        .or_else(default_log_path)
        .context("Could not determine a log file location; pass --log-file")?;
    let _log_guard = init_file_logging(&log_path)?;

    let store = match config {
        Some(path) => SettingsStore::new(path),
        None => SettingsStore::in_home()?,
    };
    tracing::info!("Using settings file {:?}", store.path());

    match run_tui(store)? {
        RunOutcome::Exited => Ok(ExitCode::SUCCESS),
        RunOutcome::SettingsCancelled => Ok(ExitCode::from(1)),
    }
}

#[derive(Debug, Parser)]
#[command(name = "sdnatui", version, about = "Text UI for the serval-dna mesh daemon")]
struct Cli {
    /// Settings file (default: ~/.sdnatuirc)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log file (default: <cache dir>/sdnatui/sdnatui.log)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Format a byte count with binary unit prefixes
    Size {
        /// Number of bytes
        #[arg(allow_negative_numbers = true)]
        count: BigInt,

        /// Symbol table: customary, customary_ext, iec or iec_ext
        #[arg(long, default_value = "customary")]
        table: String,

        /// Output template with `{value}` (or `{value:.N}`) and `{symbol}`
        #[arg(long, default_value = DEFAULT_TEMPLATE)]
        format: String,
    },

    /// Parse a size such as `1.5 K` or `10 mebi` into bytes
    Parse {
        input: String,
    },
}
