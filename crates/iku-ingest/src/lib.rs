//! IKU spreadsheet ingestion.
//!
//! This crate locates the monitoring exports of each metric and loads them
//! into Polars DataFrames.
//!
//! # Features
//!
//! - **Discovery**: Find `monitoring-iku-<code>-<pembilang|penyebut>.xlsx` files
//! - **xlsx Loading**: Read the first worksheet with an explicit header row
//! - **Label Normalization**: Program columns are rewritten to canonical names on load
//! - **Sources**: A cached directory source and an in-memory source behind one trait
//!
//! # Example
//!
//! ```ignore
//! use iku_ingest::{FileKind, MetricSource, XlsxSource};
//! use iku_model::IkuCode;
//!
//! let source = XlsxSource::new("data/2025");
//! let numerator = source.load(IkuCode::Iku11, FileKind::Pembilang)?;
//! let denominator = source.load(IkuCode::Iku11, FileKind::Penyebut)?;
//! ```

mod discovery;
mod error;
mod source;
mod xlsx;

// === Error Types ===
pub use error::{IngestError, Result};

// === File Discovery ===
pub use discovery::{
    DiscoveredFile, FileKind, list_metric_files, metric_file_name, metric_file_path,
    parse_metric_file_name,
};

// === xlsx Reading ===
pub use xlsx::{DEFAULT_HEADER_ROW, PROGRAM_COLUMNS, normalize_program_columns, read_metric_table};

// === Sources ===
pub use source::{MemorySource, MetricSource, XlsxSource};
