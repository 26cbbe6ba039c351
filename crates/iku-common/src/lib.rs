//! Shared utilities for IKU crates.
//!
//! This crate provides common utilities used across the IKU workspace,
//! including Polars DataFrame helpers and label formatting.

pub mod format;
pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use format::{format_fraction, format_numeric, format_percent_short, round2, wrap_text};
pub use polars::{
    any_to_i64, any_to_string, any_to_string_non_empty, column_strings, parse_f64,
};
