//! flint CLI tool.
//!
//! Usage:
//! ```bash
//! flint check [OPTIONS] [PATHS]...
//! flint list-rules
//! flint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use flint_core::Severity;
use flint_rules::Preset;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Token-based linter for C and C++ sources
#[derive(Parser)]
#[command(name = "flint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "FLINT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run lint checks
    Check {
        /// Files or directories to analyze (default: current directory)
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Skip C++-only checks
        #[arg(short, long)]
        c_mode: bool,

        /// Weakest severity to run and report
        #[arg(short, long)]
        level: Option<Level>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated names or codes)
        #[arg(long)]
        rules: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,

        /// Which rule tiers the generated config runs
        #[arg(long, default_value = "strict")]
        preset: PresetArg,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-diagnostic compact format.
    Compact,
}

/// Severity threshold accepted on the command line.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum Level {
    /// Errors only.
    Error,
    /// Errors and warnings.
    Warning,
    /// Everything.
    Advice,
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => Self::Error,
            Level::Warning => Self::Warning,
            Level::Advice => Self::Advice,
        }
    }
}

/// Rule preset accepted by `init`.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum PresetArg {
    /// Error-tier rules only.
    Minimal,
    /// Error and warning tiers.
    Recommended,
    /// Every rule.
    Strict,
}

impl From<PresetArg> for Preset {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Minimal => Self::Minimal,
            PresetArg::Recommended => Self::Recommended,
            PresetArg::Strict => Self::Strict,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            paths,
            recursive,
            c_mode,
            level,
            format,
            rules,
            exclude,
        } => commands::check::run(&commands::check::CheckArgs {
            paths,
            recursive,
            c_mode,
            level: level.map(Severity::from),
            format,
            rules,
            exclude,
            config: cli.config,
            verbose: cli.verbose,
        }),
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force, preset } => commands::init::run(force, preset.into()),
    }
}
