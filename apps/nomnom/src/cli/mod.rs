//! # nomnom CLI Module
//!
//! This module implements the command-line interface for nomnom.
//!
//! ## Available Commands
//!
//! - `repl` - Interactive session (the default)
//! - `run` - Execute command lines non-interactively
//! - `status` - Show store locations and contents
//! - `init` - Write fresh stores

mod commands;
pub mod parser;

use clap::{Parser, Subcommand, ValueEnum};
use nomnom_core::NomError;
use std::path::PathBuf;

use crate::config::{DEFAULT_PREFERENCES_FILE, Preferences};

pub use commands::*;
pub use parser::CommandParser;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// nomnom - track what you eat against a daily calorie goal
#[derive(Parser, Debug)]
#[command(name = "nomnom")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the preferences file
    #[arg(short = 'P', long, global = true, default_value = DEFAULT_PREFERENCES_FILE)]
    pub prefs: PathBuf,

    /// Directory holding the stores (overrides the preferences file)
    #[arg(short = 'd', long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Storage backend
    #[arg(short = 'B', long, global = true, value_enum, default_value_t = Backend::Json)]
    pub backend: Backend,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where the stores live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// One JSON file per store
    Json,
    /// Volatile, discarded on exit
    Memory,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive session
    Repl,

    /// Execute each argument as one command line, then exit
    Run {
        /// Command lines, e.g. "nom name/Apple" "summary"
        #[arg(required = true)]
        lines: Vec<String>,
    },

    /// Show store locations and contents
    Status,

    /// Write fresh stores (sample catalog, empty record, no goal)
    Init {
        /// Overwrite existing stores
        #[arg(short, long)]
        force: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), NomError> {
    let (stored, source) = Preferences::load(&cli.prefs);
    let mut prefs = stored.clone();
    if let Some(dir) = &cli.data_dir {
        prefs.data_dir.clone_from(dir);
    }

    let result = match cli.command {
        Some(Commands::Run { lines }) => cmd_run(&prefs, cli.backend, &lines),
        Some(Commands::Status) => cmd_status(&prefs, cli.backend, cli.json_mode),
        Some(Commands::Init { force }) => cmd_init(&prefs, cli.backend, force),
        Some(Commands::Repl) | None => cmd_repl(&prefs, cli.backend, cli.quiet),
    };

    // The command-line override is not written back.
    if let Err(e) = stored.save_back(&cli.prefs, source) {
        tracing::warn!("Could not save preferences to {}: {}", cli.prefs.display(), e);
    }
    result
}
