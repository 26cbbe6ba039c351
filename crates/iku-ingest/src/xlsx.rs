//! xlsx reading with an explicit header row.
//!
//! Metric exports carry a title line above the column names, so the header
//! sits at a fixed row offset. Every column is loaded as nullable strings;
//! the aggregation layer only groups, counts and joins on labels.

use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;

use calamine::{Data, DataType as _, Range, Reader, Xlsx, open_workbook};
use chrono::NaiveTime;
use iku_common::format_numeric;
use iku_model::normalize_program;
use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Header row (0-based) used by the monitoring exports.
pub const DEFAULT_HEADER_ROW: usize = 1;

/// Columns holding program labels; normalized on load.
pub const PROGRAM_COLUMNS: [&str; 2] = ["Program Studi", "Prodi"];

/// Reads the first worksheet of `path` into a DataFrame.
///
/// `header_row` is the absolute 0-based row holding column names; rows
/// below it are data. Blank cells become null and fully blank rows are
/// dropped. Blank header cells are named `Column_<n>` (1-based position) and
/// repeated names gain a `_<n>` suffix.
pub fn read_metric_table(path: &Path, header_row: usize) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e: calamine::XlsxError| {
        IngestError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(|e| IngestError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut df = range_to_frame(&range, header_row, path)?;
    normalize_program_columns(&mut df)?;

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded metric table"
    );

    Ok(df)
}

fn range_to_frame(range: &Range<Data>, header_row: usize, path: &Path) -> Result<DataFrame> {
    let no_header = || IngestError::NoHeaderRow {
        path: path.to_path_buf(),
        header_row,
    };

    let (start_row, start_col) = range.start().ok_or_else(no_header)?;
    let start_row = start_row as usize;
    if header_row < start_row {
        return Err(no_header());
    }
    let header_index = header_row - start_row;

    let mut rows = range.rows();
    let header = rows.nth(header_index).ok_or_else(no_header)?;
    let names = header_names(header, start_col as usize);

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
    for row in rows {
        let values: Vec<Option<String>> = row.iter().map(cell_text).collect();
        if values.iter().all(Option::is_none) {
            continue;
        }
        for (index, column) in columns.iter_mut().enumerate() {
            column.push(values.get(index).cloned().flatten());
        }
    }

    let columns: Vec<Column> = names
        .into_iter()
        .zip(columns)
        .map(|(name, values)| Series::new(name.into(), values).into_column())
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// Column names of the header row. `first_column` is the sheet column
/// (0-based) of the first cell, so `Column_<n>` counts from column A.
fn header_names(header: &[Data], first_column: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    header
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            let position = first_column + index + 1;
            let name = cell_text(cell).unwrap_or_else(|| format!("Column_{position}"));
            let mut unique = name.clone();
            let mut suffix = position;
            while seen.contains(&unique) {
                unique = format!("{name}_{suffix}");
                suffix += 1;
            }
            seen.insert(unique.clone());
            unique
        })
        .collect()
}

fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Float(v) => format_numeric(*v),
        Data::Int(v) => v.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) => {
            let dt = cell.as_datetime()?;
            if dt.time() == NaiveTime::MIN {
                dt.format("%Y-%m-%d").to_string()
            } else {
                dt.format("%Y-%m-%d %H:%M:%S").to_string()
            }
        }
    };
    if text.is_empty() { None } else { Some(text) }
}

/// Rewrites program label columns to their canonical form.
pub fn normalize_program_columns(df: &mut DataFrame) -> Result<()> {
    let present: Vec<&str> = PROGRAM_COLUMNS
        .into_iter()
        .filter(|name| df.get_column_index(name).is_some())
        .collect();
    if present.is_empty() {
        return Ok(());
    }

    let exprs: Vec<Expr> = present
        .into_iter()
        .map(|name| {
            col(name)
                .map(
                    |c: Column| {
                        let ca = c.str()?;
                        let out: StringChunked =
                            ca.apply_values(|s| Cow::Owned(normalize_program(s)));
                        Ok(out.into_column())
                    },
                    |_, field| Ok(Field::new(field.name().clone(), DataType::String)),
                )
                .alias(name)
        })
        .collect();

    *df = df.clone().lazy().with_columns(exprs).collect()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use iku_common::column_strings;
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    fn write_fixture(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("monitoring-iku-21-penyebut.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Data Mahasiswa Aktif 2025").unwrap();
        sheet.write_string(1, 0, "NIM").unwrap();
        sheet.write_string(1, 1, "Nama").unwrap();
        sheet.write_string(1, 2, "Program Studi").unwrap();
        sheet.write_string(1, 4, "Nama").unwrap();
        sheet.write_number(2, 0, 1001.0).unwrap();
        sheet.write_string(2, 1, "Ani").unwrap();
        sheet.write_string(2, 2, "Program Studi Kimia").unwrap();
        sheet.write_number(4, 0, 1002.0).unwrap();
        sheet.write_string(4, 1, "Budi").unwrap();
        sheet.write_string(4, 2, "Kimia").unwrap();
        sheet.write_number(4, 3, 2.5).unwrap();
        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn test_read_metric_table_header_offset() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir);
        let df = read_metric_table(&path, DEFAULT_HEADER_ROW).unwrap();

        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["NIM", "Nama", "Program Studi", "Column_4", "Nama_5"]);
        assert_eq!(df.height(), 2);
        assert_eq!(
            column_strings(&df, "NIM").unwrap(),
            vec![Some("1001".to_string()), Some("1002".to_string())]
        );
        assert_eq!(
            column_strings(&df, "Program Studi").unwrap(),
            vec![Some("Kimia".to_string()), Some("Kimia".to_string())]
        );
        assert_eq!(
            column_strings(&df, "Column_4").unwrap(),
            vec![None, Some("2.5".to_string())]
        );
    }

    #[test]
    fn test_read_metric_table_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = read_metric_table(&dir.path().join("missing.xlsx"), DEFAULT_HEADER_ROW);
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_read_metric_table_not_a_workbook() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"not a zip").unwrap();
        let result = read_metric_table(&path, DEFAULT_HEADER_ROW);
        assert!(matches!(result, Err(IngestError::Workbook { .. })));
    }

    #[test]
    fn test_header_row_beyond_sheet() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir);
        let result = read_metric_table(&path, 40);
        assert!(matches!(result, Err(IngestError::NoHeaderRow { header_row: 40, .. })));
    }

    #[test]
    fn test_header_names_skip_taken_suffixes() {
        let header = [
            Data::String("Nama".to_string()),
            Data::String("Nama_3".to_string()),
            Data::String("Nama".to_string()),
            Data::Empty,
        ];
        assert_eq!(
            header_names(&header, 0),
            vec!["Nama", "Nama_3", "Nama_4", "Column_4"]
        );
    }

    #[test]
    fn test_blank_header_counts_from_column_a() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("monitoring-iku-71-pembilang.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 1, "Mata Kuliah Berbasis Kasus").unwrap();
        sheet.write_string(1, 1, "Program Studi").unwrap();
        sheet.write_string(1, 3, "Metode Pembelajaran").unwrap();
        sheet.write_string(2, 1, "Fisika").unwrap();
        sheet.write_string(2, 2, "Fisika Dasar").unwrap();
        sheet.write_string(2, 3, "Case Method").unwrap();
        workbook.save(&path).unwrap();

        let df = read_metric_table(&path, DEFAULT_HEADER_ROW).unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["Program Studi", "Column_3", "Metode Pembelajaran"]);
        assert_eq!(
            column_strings(&df, "Column_3").unwrap(),
            vec![Some("Fisika Dasar".to_string())]
        );
    }

    #[test]
    fn test_normalize_program_columns() {
        let mut df = DataFrame::new(vec![
            Series::new(
                "Prodi".into(),
                [Some("Program Studi Fisika"), None, Some("Analis Kimia")],
            )
            .into_column(),
        ])
        .unwrap();
        normalize_program_columns(&mut df).unwrap();
        assert_eq!(
            column_strings(&df, "Prodi").unwrap(),
            vec![
                Some("Fisika".to_string()),
                None,
                Some("Analis Kimia (D3)".to_string())
            ]
        );
    }
}
