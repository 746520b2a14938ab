//! pyscan CLI tool.
//!
//! Usage:
//! ```bash
//! pyscan check [OPTIONS] [PATH]
//! pyscan list-rules
//! pyscan init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Structural linter for indentation-sensitive source code
#[derive(Parser)]
#[command(name = "pyscan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (logs skipped malformed constructs)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "PYSCAN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a source file
    Check {
        /// File to analyze
        #[arg(default_value = "example.py")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated names or codes)
        #[arg(long)]
        rules: Option<String>,

        /// Override the maximum number of function parameters
        #[arg(long)]
        max_parameters: Option<u32>,

        /// Override the maximum conditional nesting depth
        #[arg(long)]
        max_depth: Option<u32>,
    },

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for analysis results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Summary line followed by `<location>: <message>` lines.
    #[default]
    Text,
    /// One `file:line:column: [rule] message` line per issue.
    Compact,
    /// JSON output.
    Json,
    /// Annotated source snippets.
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            rules,
            max_parameters,
            max_depth,
        } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            let overrides = commands::check::Overrides {
                max_parameters,
                max_depth,
            };
            commands::check::run(&path, format, rules, overrides, &source)
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
