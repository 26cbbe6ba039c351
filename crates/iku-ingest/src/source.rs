//! Metric table sources.
//!
//! Combined indicators re-read the sub-metric spreadsheets, so the
//! directory-backed source keeps every table it has loaded.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use iku_model::IkuCode;
use polars::prelude::DataFrame;

use crate::discovery::{FileKind, metric_file_path};
use crate::error::{IngestError, Result};
use crate::xlsx::{DEFAULT_HEADER_ROW, read_metric_table};

/// Loads the numerator or denominator table of a metric.
pub trait MetricSource {
    fn load(&self, code: IkuCode, kind: FileKind) -> Result<DataFrame>;
}

/// Reads `monitoring-iku-<code>-<kind>.xlsx` files from a directory.
#[derive(Debug)]
pub struct XlsxSource {
    base: PathBuf,
    header_row: usize,
    cache: RefCell<HashMap<(IkuCode, FileKind), DataFrame>>,
}

impl XlsxSource {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            header_row: DEFAULT_HEADER_ROW,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }

    /// Number of tables read so far.
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl MetricSource for XlsxSource {
    fn load(&self, code: IkuCode, kind: FileKind) -> Result<DataFrame> {
        if let Some(df) = self.cache.borrow().get(&(code, kind)) {
            return Ok(df.clone());
        }
        let path = metric_file_path(&self.base, code, kind);
        let df = read_metric_table(&path, self.header_row)?;
        tracing::info!(
            iku = %code,
            kind = %kind,
            rows = df.height(),
            "read spreadsheet"
        );
        self.cache.borrow_mut().insert((code, kind), df.clone());
        Ok(df)
    }
}

/// Tables held in memory, keyed by metric and kind.
#[derive(Debug, Default)]
pub struct MemorySource {
    tables: HashMap<(IkuCode, FileKind), DataFrame>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, code: IkuCode, kind: FileKind, df: DataFrame) -> Self {
        self.tables.insert((code, kind), df);
        self
    }
}

impl MetricSource for MemorySource {
    fn load(&self, code: IkuCode, kind: FileKind) -> Result<DataFrame> {
        self.tables
            .get(&(code, kind))
            .cloned()
            .ok_or_else(|| IngestError::FileNotFound {
                path: PathBuf::from(crate::discovery::metric_file_name(code, kind)),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_reported_with_path() {
        let dir = TempDir::new().unwrap();
        let source = XlsxSource::new(dir.path());
        let err = source.load(IkuCode::Iku11, FileKind::Pembilang).unwrap_err();
        assert!(
            err.to_string()
                .ends_with("monitoring-iku-11-pembilang.xlsx")
        );
        assert_eq!(source.cached(), 0);
    }

    #[test]
    fn test_memory_source() {
        let df = DataFrame::new(vec![
            Series::new("NIM".into(), ["1", "2"]).into_column(),
        ])
        .unwrap();
        let source = MemorySource::new().with(IkuCode::Iku22, FileKind::Pembilang, df);
        assert_eq!(
            source
                .load(IkuCode::Iku22, FileKind::Pembilang)
                .unwrap()
                .height(),
            2
        );
        assert!(source.load(IkuCode::Iku22, FileKind::Penyebut).is_err());
    }
}
