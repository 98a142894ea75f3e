//! # Burrow CLI
//!
//! Command-line interface for the Burrow filesystem traversal library.
//!
//! ## Commands
//!
//! - `burrow find <path> [pattern]` - List matching entries under a directory
//! - `burrow info <path>` - Show the record of one entry
//! - `burrow exact <path>` - Print a path with its on-disk spelling
//! - `burrow empty <dir>` - Check whether a directory is empty
//! - `burrow bench <path>` - Compare a walk against plain `read_dir` recursion
//!
//! ## Example Usage
//!
//! ```bash
//! # All Rust files below the current directory
//! burrow find . "*.rs"
//!
//! # Depth-first listing of directories only, as JSON
//! burrow find /var --order all-subdirectories --dirs --output json
//!
//! # Keep going past unreadable directories
//! burrow find / "*.conf" --skip-errors
//! ```

mod app;
mod commands;

use burrow_core::{EntryKind, OutputFormat, SearchOrder};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Burrow - Lazy filesystem traversal
#[derive(Parser)]
#[command(name = "burrow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List entries below a directory
    Find {
        /// Directory to search
        path: PathBuf,

        /// Wildcard pattern (`*` and `?`)
        #[arg(conflicts_with = "regex")]
        pattern: Option<String>,

        /// Traversal order (top, all-directories, all-subdirectories, all-depths)
        #[arg(short, long)]
        order: Option<SearchOrder>,

        /// Only list files
        #[arg(short, long, conflicts_with = "dirs")]
        files: bool,

        /// Only list directories
        #[arg(short, long)]
        dirs: bool,

        /// Match names case-sensitively
        #[arg(short = 's', long, conflicts_with = "ignore_case")]
        case_sensitive: bool,

        /// Match names case-insensitively
        #[arg(short, long)]
        ignore_case: bool,

        /// Match names against a regular expression instead of a pattern
        #[arg(short = 'r', long)]
        regex: Option<String>,

        /// Warn about unreadable sub-directories instead of stopping
        #[arg(long)]
        skip_errors: bool,

        /// Maximum number of results to show (0 = no limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Show kind, size and modification time
        #[arg(short = 'L', long)]
        long: bool,

        /// Output format (text, json)
        #[arg(long)]
        output: Option<OutputFormat>,
    },

    /// Show the record of one entry
    Info {
        path: PathBuf,
    },

    /// Print a path with every component spelled as on disk
    Exact {
        path: PathBuf,
    },

    /// Check whether a directory has no entries
    Empty {
        dir: PathBuf,
    },

    /// Time a walk against plain `read_dir` recursion
    Bench {
        /// Directory to walk
        path: PathBuf,

        /// Wildcard pattern
        #[arg(default_value = "*")]
        pattern: String,

        /// Traversal order
        #[arg(short, long, default_value = "all-directories")]
        order: SearchOrder,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => burrow_core::Config::load_from(path)?,
        None => burrow_core::Config::load()?,
    };

    // Setup logging
    let log_level = if cli.quiet {
        "error".to_string()
    } else {
        match cli.verbose {
            0 => config.general.log_level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();

    // Execute command
    match cli.command {
        Commands::Find {
            path,
            pattern,
            order,
            files,
            dirs,
            case_sensitive,
            ignore_case,
            regex,
            skip_errors,
            limit,
            long,
            output,
        } => {
            let kind = if files {
                EntryKind::Files
            } else if dirs {
                EntryKind::Directories
            } else {
                EntryKind::All
            };
            let case = if case_sensitive {
                Some(false)
            } else if ignore_case {
                Some(true)
            } else {
                None
            };
            commands::find::run(
                config,
                commands::find::FindOptions {
                    path,
                    pattern,
                    regex,
                    order,
                    kind,
                    ignore_case: case,
                    skip_errors,
                    limit,
                    long,
                    output,
                },
            )
        }
        Commands::Info { path } => commands::info::run(config, &path),
        Commands::Exact { path } => commands::exact::run(config, &path),
        Commands::Empty { dir } => commands::empty::run(config, &dir),
        Commands::Bench {
            path,
            pattern,
            order,
        } => commands::bench::run(config, &path, &pattern, order),
    }
}
