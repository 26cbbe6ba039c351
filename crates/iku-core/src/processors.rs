//! Per-metric processing recipes.
//!
//! # Sub-metrics
//!
//! | Code | Numerator grouping | Denominator |
//! |------|--------------------|-------------|
//! | 11, 12, 13 | `Prodi` | `Prodi` rows |
//! | 21, 23, 33, 41, 42, 71 | `Program Studi` | `Program Studi` rows |
//! | 22 | `NIM` joined to the denominator | `Program Studi` rows |
//! | 31 | `NIP` joined to the denominator | `Program Studi` rows |
//! | 51 | `NIP` joined to the IKU 31 denominator | 1 per program |
//! | 62 | `Program Studi` | 2 per program, programs of the IKU 81 denominator |
//! | 81 | presence of the program | 1 per program |
//!
//! Combined codes are delegated to [`crate::combined`].

use iku_ingest::{FileKind, MetricSource};
use iku_model::{IkuCode, OverallStats, ProgramRow};
use polars::prelude::DataFrame;

use crate::aggregate::{
    GroupKey, aggregate_by_program, count_by_program, overall_stats, presence_by_program,
};
use crate::combined::process_combined;
use crate::error::Result;

pub const PRODI: &str = "Prodi";
pub const PROGRAM_STUDI: &str = "Program Studi";
pub const NIM: &str = "NIM";
pub const NIP: &str = "NIP";

/// Aggregated rows and faculty totals of one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricResult {
    pub code: IkuCode,
    pub rows: Vec<ProgramRow>,
    pub stats: OverallStats,
    /// Totals of each sub-metric, in catalogue order. Empty for sub-metrics.
    pub components: Vec<(IkuCode, OverallStats)>,
}

impl MetricResult {
    pub(crate) fn new(code: IkuCode, rows: Vec<ProgramRow>, stats: OverallStats) -> Self {
        Self {
            code,
            rows,
            stats,
            components: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Recipe {
    Ratio {
        numerator: GroupKey<'static>,
        denominator: &'static str,
    },
    RecognisedOutputs,
    Partnerships,
    Presence,
}

fn recipe(code: IkuCode) -> Recipe {
    match code {
        IkuCode::Iku11 | IkuCode::Iku12 | IkuCode::Iku13 => Recipe::Ratio {
            numerator: GroupKey::Column(PRODI),
            denominator: PRODI,
        },
        IkuCode::Iku22 => Recipe::Ratio {
            numerator: GroupKey::JoinOn {
                id: NIM,
                column: PROGRAM_STUDI,
            },
            denominator: PROGRAM_STUDI,
        },
        IkuCode::Iku31 => Recipe::Ratio {
            numerator: GroupKey::JoinOn {
                id: NIP,
                column: PROGRAM_STUDI,
            },
            denominator: PROGRAM_STUDI,
        },
        IkuCode::Iku51 | IkuCode::Iku5 => Recipe::RecognisedOutputs,
        IkuCode::Iku62 | IkuCode::Iku6 => Recipe::Partnerships,
        IkuCode::Iku81 | IkuCode::Iku8 => Recipe::Presence,
        _ => Recipe::Ratio {
            numerator: GroupKey::Column(PROGRAM_STUDI),
            denominator: PROGRAM_STUDI,
        },
    }
}

/// Loads and aggregates one metric.
pub fn process_metric(code: IkuCode, source: &dyn MetricSource) -> Result<MetricResult> {
    if code.is_combined() {
        process_combined(code, source)
    } else {
        process_sub_metric(code, source)
    }
}

/// Aggregates a sub-metric from its own spreadsheets.
pub fn process_sub_metric(code: IkuCode, source: &dyn MetricSource) -> Result<MetricResult> {
    let recipe = recipe(code);
    tracing::debug!(iku = %code, ?recipe, "processing sub-metric");
    match recipe {
        Recipe::Ratio {
            numerator: key,
            denominator: column,
        } => {
            let numerator = source.load(code, FileKind::Pembilang)?;
            let denominator = source.load(code, FileKind::Penyebut)?;
            let rows = aggregate_by_program(&numerator, &denominator, key, column)?;
            Ok(MetricResult::new(
                code,
                rows,
                overall_stats(&numerator, &denominator),
            ))
        }
        Recipe::RecognisedOutputs => recognised_outputs(code, source),
        Recipe::Partnerships => partnerships(code, source),
        Recipe::Presence => accreditation(code, source),
    }
}

/// Faculty totals of a sub-metric without building program rows where the
/// totals are plain row counts.
pub fn sub_metric_stats(code: IkuCode, source: &dyn MetricSource) -> Result<OverallStats> {
    match recipe(code) {
        Recipe::Ratio { .. } | Recipe::Presence => {
            let numerator = source.load(code, FileKind::Pembilang)?;
            let denominator = source.load(code, FileKind::Penyebut)?;
            Ok(overall_stats(&numerator, &denominator))
        }
        Recipe::RecognisedOutputs | Recipe::Partnerships => {
            Ok(process_sub_metric(code, source)?.stats)
        }
    }
}

// IKU 51: outputs counted per program against a baseline of one, programs
// taken from the lecturer list of IKU 31. Faculty total is measured against
// the absolute target of IKU 5.
fn recognised_outputs(code: IkuCode, source: &dyn MetricSource) -> Result<MetricResult> {
    let numerator = source.load(IkuCode::Iku51, FileKind::Pembilang)?;
    let lecturers = source.load(IkuCode::Iku31, FileKind::Penyebut)?;

    let key = if numerator.get_column_index(NIP).is_some() {
        GroupKey::JoinOn {
            id: NIP,
            column: PROGRAM_STUDI,
        }
    } else {
        GroupKey::Column(program_column(&numerator))
    };
    let rows = count_by_program(&numerator, key, &lecturers, PROGRAM_STUDI, 1)?;
    let stats = OverallStats::against_target(numerator.height() as f64, IkuCode::Iku5.target());
    tracing::debug!(
        iku = %code,
        outputs = numerator.height(),
        lecturers = lecturers.height(),
        "counted recognised outputs"
    );
    Ok(MetricResult::new(code, rows, stats))
}

// IKU 62: partnerships counted per program against two per program, programs
// taken from the accreditation denominator of IKU 81. Faculty total is the
// average per program.
fn partnerships(code: IkuCode, source: &dyn MetricSource) -> Result<MetricResult> {
    let numerator = source.load(IkuCode::Iku62, FileKind::Pembilang)?;
    let programs = source.load(IkuCode::Iku81, FileKind::Penyebut)?;

    let target = IkuCode::Iku6.target();
    let rows = count_by_program(
        &numerator,
        GroupKey::Column(PROGRAM_STUDI),
        &programs,
        PROGRAM_STUDI,
        target as u32,
    )?;
    let average = if programs.height() == 0 {
        0.0
    } else {
        numerator.height() as f64 / programs.height() as f64
    };
    Ok(MetricResult::new(
        code,
        rows,
        OverallStats::against_target(average, target),
    ))
}

fn accreditation(code: IkuCode, source: &dyn MetricSource) -> Result<MetricResult> {
    let numerator = source.load(IkuCode::Iku81, FileKind::Pembilang)?;
    let denominator = source.load(IkuCode::Iku81, FileKind::Penyebut)?;
    let rows = presence_by_program(&numerator, PROGRAM_STUDI, &denominator, PROGRAM_STUDI)?;
    Ok(MetricResult::new(
        code,
        rows,
        overall_stats(&numerator, &denominator),
    ))
}

/// `Program Studi` when present, otherwise `Prodi`.
pub fn program_column(df: &DataFrame) -> &'static str {
    if df.get_column_index(PROGRAM_STUDI).is_some() {
        PROGRAM_STUDI
    } else {
        PRODI
    }
}
