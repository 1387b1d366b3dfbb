//! # nomnom
//!
//! The terminal front end for nomnom-core: command-line interface, REPL,
//! command text parser, preferences and logging.

pub mod cli;
pub mod config;
pub mod logging;
