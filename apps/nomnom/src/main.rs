//! # nomnom
//!
//! Track what you eat against a daily calorie goal.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 apps/nomnom (THE BINARY)                 │
//! │                                                          │
//! │  ┌────────────┐   ┌─────────────┐   ┌────────────────┐   │
//! │  │    CLI     │   │   Parser    │   │  Preferences   │   │
//! │  │  (clap)    │   │ (prefix/v)  │   │    (toml)      │   │
//! │  └─────┬──────┘   └──────┬──────┘   └───────┬────────┘   │
//! │        └─────────────────┼──────────────────┘            │
//! │                          ▼                               │
//! │                  ┌───────────────┐                       │
//! │                  │  nomnom-core  │                       │
//! │                  │  (THE CORE)   │                       │
//! │                  └───────────────┘                       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Interactive session
//! nomnom
//!
//! # One-off commands
//! nomnom run "goal 2000" "nom name/Apple rating/8" "summary"
//!
//! # Store overview
//! nomnom status --json-mode
//! ```

use clap::Parser;
use nomnom::cli;
use nomnom::logging::init_tracing;

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    // NOMNOM_LOG_FORMAT=json enables machine-parseable output.
    init_tracing(cli.verbose);

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
