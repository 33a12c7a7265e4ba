//! CLI interface for mcd-target-hunter.
//!
//! Provides command-line argument parsing using clap.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::commands::ScanOverrides;

/// Command-line interface for mcd-target-hunter.
#[derive(Parser)]
#[command(name = "mcdtargethunter")]
#[command(
    author,
    version,
    about = "Find target markers in CNC post-processor output and report their context",
    long_about = None
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable logging.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Scan an output file and write a CSV report of every target hit.
    Scan {
        /// Path to the post-processor output file to scan.
        /// Defaults to the last input saved in config.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Folder to write the CSV report into.
        /// Defaults to the saved output folder, then the desktop.
        #[arg(short, long)]
        outdir: Option<PathBuf>,

        /// Target search text.
        #[arg(long)]
        target: Option<String>,

        /// Parent search text.
        #[arg(long)]
        parent: Option<String>,

        /// Disable parent lookup.
        #[arg(long)]
        no_parent: bool,

        /// Operation number search text.
        #[arg(long)]
        opno: Option<String>,

        /// Tool change search text.
        #[arg(long)]
        toolchg: Option<String>,

        /// Use case-sensitive matching (default is case-insensitive).
        #[arg(long = "case")]
        case_sensitive: bool,

        /// Print the bare report path before the summary.
        #[arg(long)]
        print_report_path: bool,

        /// Print the result as JSON instead of text.
        #[arg(long, conflicts_with = "print_report_path")]
        json: bool,

        /// Save these settings and paths as the new defaults.
        #[arg(long)]
        save: bool,
    },

    /// Show or change the saved configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Start the MCP server for editor integration.
    #[cfg(feature = "mcp")]
    Serve,
}

/// Configuration subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration.
    Show {
        /// Print as JSON instead of TOML.
        #[arg(long)]
        json: bool,
    },

    /// Print the config file location.
    Path,

    /// Update saved settings. Omitted options keep their current value.
    Set {
        #[arg(long)]
        target: Option<String>,

        #[arg(long)]
        parent: Option<String>,

        #[arg(long, action = ArgAction::Set)]
        use_parent: Option<bool>,

        #[arg(long)]
        opno: Option<String>,

        #[arg(long)]
        toolchg: Option<String>,

        #[arg(long, action = ArgAction::Set)]
        case_sensitive: Option<bool>,

        /// Remembered input file.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Remembered output folder.
        #[arg(long)]
        outdir: Option<PathBuf>,
    },

    /// Restore the built-in defaults.
    Reset,
}

/// Build run overrides from `scan` flags. Switches only override when given.
#[must_use]
#[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
pub fn scan_overrides(
    input: Option<PathBuf>,
    outdir: Option<PathBuf>,
    target: Option<String>,
    parent: Option<String>,
    no_parent: bool,
    opno: Option<String>,
    toolchg: Option<String>,
    case_sensitive: bool,
) -> ScanOverrides {
    ScanOverrides {
        input,
        output_dir: outdir,
        target_text: target,
        parent_text: parent,
        use_parent: no_parent.then_some(false),
        op_no_text: opno,
        tool_change_text: toolchg,
        case_sensitive: case_sensitive.then_some(true),
    }
}

/// Install the tracing subscriber for the chosen verbosity.
///
/// `RUST_LOG` wins over `-v` when set. Logs go to stderr.
pub fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}
