//! Utilities shared across Quarry crates.

pub mod error;
