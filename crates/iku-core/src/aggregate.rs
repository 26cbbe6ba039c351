//! Per-program aggregation.
//!
//! Numerator rows are reduced to a program label, either read directly from
//! a column or recovered by joining an identifier (NIM, NIP) against the
//! denominator table. Counts are produced with Polars group-bys and the
//! denominator side decides which programs appear in the output.

use std::collections::{HashMap, HashSet};

use iku_common::{any_to_i64, any_to_string, column_strings};
use iku_model::{OverallStats, ProgramRow, normalize_program};
use polars::prelude::*;

use crate::error::{CoreError, Result};

const PROGRAM: &str = "program";
const NUMERATOR: &str = "numerator";
const DENOMINATOR: &str = "denominator";

/// How numerator rows are mapped to a program label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey<'a> {
    /// The numerator carries the program column itself.
    Column(&'a str),
    /// Look up `id` in the reference table and take its `column`.
    JoinOn { id: &'a str, column: &'a str },
}

/// Ratio of numerator to denominator rows for every program present in the
/// denominator.
///
/// Programs without numerator rows keep a count of 0. Numerator rows whose
/// program is not in the denominator, or whose identifier has no match, are
/// left out. Rows are sorted ascending by percentage, ties by program name.
pub fn aggregate_by_program(
    numerator: &DataFrame,
    denominator: &DataFrame,
    numerator_key: GroupKey<'_>,
    denominator_column: &str,
) -> Result<Vec<ProgramRow>> {
    let numerator_labels = numerator_programs(numerator, numerator_key, denominator)?;
    let denominator_labels = program_labels(denominator, denominator_column, "denominator")?;

    let counts = joined_counts(numerator_labels, denominator_labels)?;
    let mut rows: Vec<ProgramRow> = counts
        .into_iter()
        .map(|(program, numerator, denominator)| ProgramRow::new(program, numerator, denominator))
        .collect();
    sort_rows(&mut rows);
    Ok(rows)
}

/// Raw numerator counts for every program of the reference table, for
/// metrics measured against an absolute number per program.
///
/// Each row carries `fixed_denominator` and its percentage holds the count.
/// Sorted ascending by count, ties by program name.
pub fn count_by_program(
    numerator: &DataFrame,
    numerator_key: GroupKey<'_>,
    reference: &DataFrame,
    reference_column: &str,
    fixed_denominator: u32,
) -> Result<Vec<ProgramRow>> {
    let numerator_labels = numerator_programs(numerator, numerator_key, reference)?;
    let reference_labels = program_labels(reference, reference_column, "reference")?;
    let programs = distinct(&reference_labels);

    let counts = joined_counts(numerator_labels, reference_labels)?;
    let rows: Vec<ProgramRow> = counts
        .into_iter()
        .map(|(program, count, _)| ProgramRow::counted(program, count, fixed_denominator))
        .collect();
    let mut rows = include_programs(rows, &programs, fixed_denominator);
    sort_rows(&mut rows);
    Ok(rows)
}

/// One row per denominator program: 1/1 when the program appears in the
/// numerator, 0/1 otherwise.
pub fn presence_by_program(
    numerator: &DataFrame,
    numerator_column: &str,
    denominator: &DataFrame,
    denominator_column: &str,
) -> Result<Vec<ProgramRow>> {
    let present: HashSet<String> = program_labels(numerator, numerator_column, "numerator")?
        .into_iter()
        .flatten()
        .collect();
    let programs = distinct(&program_labels(denominator, denominator_column, "denominator")?);

    let mut rows: Vec<ProgramRow> = programs
        .into_iter()
        .map(|program| {
            let hit = u32::from(present.contains(&program));
            ProgramRow::new(program, hit, 1)
        })
        .collect();
    sort_rows(&mut rows);
    Ok(rows)
}

/// Faculty-wide totals: row counts of both tables.
pub fn overall_stats(numerator: &DataFrame, denominator: &DataFrame) -> OverallStats {
    OverallStats::from_counts(numerator.height(), denominator.height())
}

/// Adds a 0-count row for every listed program missing from `rows`.
pub fn include_programs(
    mut rows: Vec<ProgramRow>,
    programs: &[String],
    denominator: u32,
) -> Vec<ProgramRow> {
    let known: HashSet<String> = rows.iter().map(|row| row.program.clone()).collect();
    for program in programs {
        if !known.contains(program) {
            rows.push(ProgramRow::new(program.clone(), 0, denominator));
        }
    }
    rows
}

/// Category counts of a column, most frequent first (ties by label).
///
/// Values are trimmed; blank cells and nulls are not counted.
pub fn value_counts(df: &DataFrame, column: &str) -> Result<Vec<(String, u32)>> {
    let labels = identifiers(df, column, "table")?;

    let counts = count_labels(labels, NUMERATOR)?;
    let mut out = Vec::with_capacity(counts.height());
    let programs = counts.column(PROGRAM)?;
    let numbers = counts.column(NUMERATOR)?;
    for idx in 0..counts.height() {
        let label = any_to_string(programs.get(idx)?);
        let count = any_to_i64(numbers.get(idx)?).unwrap_or(0);
        out.push((label, to_u32(count)));
    }
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(out)
}

/// Program label of every numerator row, `None` where it cannot be resolved.
pub fn numerator_programs(
    numerator: &DataFrame,
    key: GroupKey<'_>,
    reference: &DataFrame,
) -> Result<Vec<Option<String>>> {
    match key {
        GroupKey::Column(name) => program_labels(numerator, name, "numerator"),
        GroupKey::JoinOn { id, column } => {
            let lookup = id_lookup(reference, id, column)?;
            let ids = identifiers(numerator, id, "numerator")?;
            Ok(ids
                .into_iter()
                .map(|id| id.and_then(|id| lookup.get(&id).cloned()))
                .collect())
        }
    }
}

/// `id → program` map from a reference table; the first row of an id wins.
pub fn id_lookup(reference: &DataFrame, id: &str, column: &str) -> Result<HashMap<String, String>> {
    let ids = identifiers(reference, id, "reference")?;
    let programs = program_labels(reference, column, "reference")?;
    let mut lookup = HashMap::with_capacity(ids.len());
    for (id, program) in ids.into_iter().zip(programs) {
        if let (Some(id), Some(program)) = (id, program) {
            lookup.entry(id).or_insert(program);
        }
    }
    Ok(lookup)
}

fn identifiers(df: &DataFrame, column: &str, table: &str) -> Result<Vec<Option<String>>> {
    require(df, column, table)?;
    Ok(column_strings(df, column)?
        .into_iter()
        .map(|value| value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
        .collect())
}

fn program_labels(df: &DataFrame, column: &str, table: &str) -> Result<Vec<Option<String>>> {
    require(df, column, table)?;
    Ok(column_strings(df, column)?
        .into_iter()
        .map(|value| value.map(|s| normalize_program(&s)).filter(|s| !s.is_empty()))
        .collect())
}

fn require(df: &DataFrame, column: &str, table: &str) -> Result<()> {
    if df.get_column_index(column).is_some() {
        Ok(())
    } else {
        Err(CoreError::missing_column(column, table))
    }
}

fn distinct(labels: &[Option<String>]) -> Vec<String> {
    let mut seen = HashSet::new();
    labels
        .iter()
        .flatten()
        .filter(|label| seen.insert(label.as_str()))
        .cloned()
        .collect()
}

fn count_labels(labels: Vec<Option<String>>, alias: &str) -> Result<DataFrame> {
    let df = DataFrame::new(vec![Series::new(PROGRAM.into(), labels).into_column()])?;
    let counts = df
        .lazy()
        .filter(col(PROGRAM).is_not_null())
        .group_by([col(PROGRAM)])
        .agg([len().alias(alias)])
        .collect()?;
    Ok(counts)
}

// (program, numerator count, denominator count) for each denominator program.
fn joined_counts(
    numerator_labels: Vec<Option<String>>,
    denominator_labels: Vec<Option<String>>,
) -> Result<Vec<(String, u32, u32)>> {
    let numerator_counts = count_labels(numerator_labels, NUMERATOR)?;
    let denominator_counts = count_labels(denominator_labels, DENOMINATOR)?;

    let joined = denominator_counts
        .lazy()
        .join(
            numerator_counts.lazy(),
            [col(PROGRAM)],
            [col(PROGRAM)],
            JoinArgs::new(JoinType::Left),
        )
        .with_columns([
            col(NUMERATOR).fill_null(lit(0)).cast(DataType::Int64),
            col(DENOMINATOR).cast(DataType::Int64),
        ])
        .collect()?;

    let programs = joined.column(PROGRAM)?;
    let numerators = joined.column(NUMERATOR)?;
    let denominators = joined.column(DENOMINATOR)?;
    let mut out = Vec::with_capacity(joined.height());
    for idx in 0..joined.height() {
        let program = any_to_string(programs.get(idx)?);
        let numerator = any_to_i64(numerators.get(idx)?).unwrap_or(0);
        let denominator = any_to_i64(denominators.get(idx)?).unwrap_or(0);
        out.push((program, to_u32(numerator), to_u32(denominator)));
    }
    Ok(out)
}

fn to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

fn sort_rows(rows: &mut [ProgramRow]) {
    rows.sort_by(|a, b| {
        a.percentage
            .total_cmp(&b.percentage)
            .then_with(|| a.program.cmp(&b.program))
    });
}
