#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for extracting segment sales and profit from earnings
//! disclosures.
//!
//! `tanshin extract` prints one row per period, segment and account as
//! JSON or CSV; `tanshin inspect` shows what the reader finds in each
//! segment table of one file. Without a subcommand, `tanshin` prompts for
//! what to do.
//!
//! Uses `indicatif-log-bridge` (via [`tanshin_cli_utils::init_logger`]) so
//! that log lines and the progress bar never fight for the terminal.

mod commands;
mod config;
mod input;
mod interactive;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::ExtractArgs;
use crate::config::TanshinConfig;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "tanshin",
    about = "Extract segment sales and profit from earnings disclosures"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract segment rows from disclosure files or directories
    Extract {
        /// Disclosure files, or directories of `.htm`/`.html` files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Output format for the rows
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Path to a `tanshin.toml` config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Expected number of segment tables per document (overrides the config)
        #[arg(long)]
        expected_tables: Option<usize>,
        /// Write the read logs as JSON to this file instead of a summary on stderr
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Show the period, segments and accounts found in each segment table
    Inspect {
        /// Disclosure file
        path: PathBuf,
        /// Path to a `tanshin.toml` config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = tanshin_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Extract {
            paths,
            format,
            config,
            expected_tables,
            log,
        }) => {
            let config = TanshinConfig::load(config.as_deref())?;
            let args = ExtractArgs {
                paths,
                format,
                expected_tables,
                log,
            };
            commands::extract(&multi, &config, &args)?;
        }
        Some(Commands::Inspect { path, config }) => {
            let config = TanshinConfig::load(config.as_deref())?;
            commands::inspect(&config, &path)?;
        }
        None => interactive::run(&multi)?,
    }

    Ok(())
}
