//! # Formats
//!
//! Text encodings of the persisted aggregates. Pure transformations only.

mod persistence;

pub use persistence::*;
