//! Faculty-level indicators built from their sub-metrics.
//!
//! IKU 1 to 4 pool the numerator rows of their sub-metrics into one table
//! (`id`, `Nama`, program, `Sumber`), keep the first row of every person and
//! divide by the denominator of the first sub-metric. IKU 5 to 8 reuse a
//! single sub-metric.

use std::collections::{HashMap, HashSet};

use iku_common::column_strings;
use iku_ingest::{FileKind, MetricSource};
use iku_model::{IkuCode, OverallStats};
use polars::prelude::*;

use crate::aggregate::{GroupKey, aggregate_by_program, id_lookup};
use crate::error::{CoreError, Result};
use crate::processors::{
    MetricResult, NIM, NIP, PRODI, PROGRAM_STUDI, process_sub_metric, sub_metric_stats,
};

pub const NAMA: &str = "Nama";
pub const SUMBER: &str = "Sumber";

/// Where a contribution takes its program label from.
#[derive(Debug, Clone, Copy)]
enum ProgramFrom<'a> {
    Column(&'a str),
    Lookup(&'a HashMap<String, String>),
}

/// One sub-metric's rows in the pooled layout.
#[derive(Debug)]
struct Contribution<'a> {
    table: &'a DataFrame,
    id: &'a str,
    name: Option<&'a str>,
    program: ProgramFrom<'a>,
    sumber: &'a str,
}

/// Builds a combined indicator. Sub-metric codes are processed as
/// themselves.
pub fn process_combined(code: IkuCode, source: &dyn MetricSource) -> Result<MetricResult> {
    let mut result = match code {
        IkuCode::Iku1 => graduates(source)?,
        IkuCode::Iku2 => students(source)?,
        IkuCode::Iku3 => lecturer_activities(source)?,
        IkuCode::Iku4 => lecturer_experience(source)?,
        IkuCode::Iku5 | IkuCode::Iku6 | IkuCode::Iku7 | IkuCode::Iku8 => {
            let sub = code.sub_metrics()[0];
            let mut result = process_sub_metric(sub, source)?;
            result.code = code;
            result
        }
        _ => return process_sub_metric(code, source),
    };

    result.components = components(code, source);

    tracing::debug!(
        iku = %code,
        numerator = result.stats.numerator,
        denominator = result.stats.denominator,
        components = result.components.len(),
        "combined indicator"
    );
    Ok(result)
}

/// Totals of every sub-metric that can be computed; a sub-metric that fails
/// is logged and left out.
fn components(code: IkuCode, source: &dyn MetricSource) -> Vec<(IkuCode, OverallStats)> {
    code.sub_metrics()
        .iter()
        .filter_map(|sub| match sub_metric_stats(*sub, source) {
            Ok(stats) => Some((*sub, stats)),
            Err(e) => {
                tracing::warn!(
                    iku = %code,
                    sub_metric = %sub,
                    error = %e,
                    "sub-metric left out of the breakdown donut"
                );
                None
            }
        })
        .collect()
}

// IKU 1: employed (11), further study (12) and self-employed (13) graduates.
fn graduates(source: &dyn MetricSource) -> Result<MetricResult> {
    let employed = source.load(IkuCode::Iku11, FileKind::Pembilang)?;
    let studying = source.load(IkuCode::Iku12, FileKind::Pembilang)?;
    let founders = source.load(IkuCode::Iku13, FileKind::Pembilang)?;
    let denominator = source.load(IkuCode::Iku11, FileKind::Penyebut)?;

    let parts = [
        (&employed, "Bekerja"),
        (&studying, "Studi Lanjut"),
        (&founders, "Wiraswasta"),
    ]
    .map(|(table, sumber)| Contribution {
        table,
        id: NIM,
        name: Some(NAMA),
        program: ProgramFrom::Column(PRODI),
        sumber,
    });

    let pooled = pool(&parts, NIM, PRODI)?;
    finish(IkuCode::Iku1, &pooled, &denominator, PRODI)
}

// IKU 2: MBKM (21), achievements (22, program and name recovered from the
// student list by NIM) and intellectual property (23).
fn students(source: &dyn MetricSource) -> Result<MetricResult> {
    let mbkm = source.load(IkuCode::Iku21, FileKind::Pembilang)?;
    let achievements = source.load(IkuCode::Iku22, FileKind::Pembilang)?;
    let patents = source.load(IkuCode::Iku23, FileKind::Pembilang)?;
    let denominator = source.load(IkuCode::Iku21, FileKind::Penyebut)?;

    let programs = id_lookup(&denominator, NIM, PROGRAM_STUDI)?;
    let names = name_lookup(&denominator, NIM, NAMA)?;
    let achievements = with_names(&achievements, NIM, &names)?;

    let parts = [
        Contribution {
            table: &mbkm,
            id: NIM,
            name: Some(NAMA),
            program: ProgramFrom::Column(PROGRAM_STUDI),
            sumber: "MBKM",
        },
        Contribution {
            table: &achievements,
            id: NIM,
            name: Some(NAMA),
            program: ProgramFrom::Lookup(&programs),
            sumber: "Prestasi",
        },
        Contribution {
            table: &patents,
            id: NIM,
            name: Some(NAMA),
            program: ProgramFrom::Column(PROGRAM_STUDI),
            sumber: "HKI",
        },
    ];

    let pooled = pool(&parts, NIM, PROGRAM_STUDI)?;
    finish(IkuCode::Iku2, &pooled, &denominator, PROGRAM_STUDI)
}

// IKU 3: tridharma at other institutions (31, program by NIP) and student
// supervision outside the home program (33).
fn lecturer_activities(source: &dyn MetricSource) -> Result<MetricResult> {
    let tridharma = source.load(IkuCode::Iku31, FileKind::Pembilang)?;
    let supervision = source.load(IkuCode::Iku33, FileKind::Pembilang)?;
    let denominator = source.load(IkuCode::Iku31, FileKind::Penyebut)?;

    let programs = id_lookup(&denominator, NIP, PROGRAM_STUDI)?;
    let parts = [
        Contribution {
            table: &tridharma,
            id: NIP,
            name: Some(NAMA),
            program: ProgramFrom::Lookup(&programs),
            sumber: "Tridharma",
        },
        Contribution {
            table: &supervision,
            id: NIP,
            name: Some("Dosen Pembimbing"),
            program: ProgramFrom::Column(PROGRAM_STUDI),
            sumber: "Bimbingan",
        },
    ];

    let pooled = pool(&parts, NIP, PROGRAM_STUDI)?;
    finish(IkuCode::Iku3, &pooled, &denominator, PROGRAM_STUDI)
}

// IKU 4: industry certification (41) and practitioners (42). Tables without a
// program column are matched to the lecturer list by NIP.
fn lecturer_experience(source: &dyn MetricSource) -> Result<MetricResult> {
    let certified = source.load(IkuCode::Iku41, FileKind::Pembilang)?;
    let practitioners = source.load(IkuCode::Iku42, FileKind::Pembilang)?;
    let denominator = source.load(IkuCode::Iku41, FileKind::Penyebut)?;

    let programs = id_lookup(&denominator, NIP, PROGRAM_STUDI)?;
    let program_of = |table: &DataFrame| {
        if table.get_column_index(PROGRAM_STUDI).is_some() {
            ProgramFrom::Column(PROGRAM_STUDI)
        } else {
            ProgramFrom::Lookup(&programs)
        }
    };

    let parts = [
        Contribution {
            table: &certified,
            id: NIP,
            name: Some(NAMA),
            program: program_of(&certified),
            sumber: "Sertifikat DUDI",
        },
        Contribution {
            table: &practitioners,
            id: NIP,
            name: Some(NAMA),
            program: program_of(&practitioners),
            sumber: "Praktisi",
        },
    ];

    let pooled = pool(&parts, NIP, PROGRAM_STUDI)?;
    finish(IkuCode::Iku4, &pooled, &denominator, PROGRAM_STUDI)
}

fn finish(
    code: IkuCode,
    pooled: &DataFrame,
    denominator: &DataFrame,
    program_column: &str,
) -> Result<MetricResult> {
    let rows = aggregate_by_program(
        pooled,
        denominator,
        GroupKey::Column(program_column),
        program_column,
    )?;
    let stats = OverallStats::from_counts(pooled.height(), denominator.height());
    Ok(MetricResult::new(code, rows, stats))
}

/// Stacks the contributions and keeps the first row of every id.
///
/// Rows with a blank id are kept as they are.
fn pool(parts: &[Contribution<'_>], id: &str, program_column: &str) -> Result<DataFrame> {
    let mut pooled: Option<DataFrame> = None;
    for part in parts {
        let frame = part.to_frame(id, program_column)?;
        tracing::debug!(sumber = part.sumber, rows = frame.height(), "pooling");
        match pooled.as_mut() {
            Some(existing) => {
                existing.vstack_mut(&frame)?;
            }
            None => pooled = Some(frame),
        }
    }
    let pooled = pooled.ok_or_else(|| CoreError::DataFrame {
        message: "no sub-metric tables to combine".to_string(),
    })?;

    let ids = column_strings(&pooled, id)?;
    let mut seen = HashSet::new();
    let keep: Vec<bool> = ids
        .iter()
        .map(|value| match value.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => seen.insert(value.to_string()),
            _ => true,
        })
        .collect();
    let mask = BooleanChunked::from_slice("first_per_id".into(), &keep);
    Ok(pooled.filter(&mask)?)
}

impl Contribution<'_> {
    fn to_frame(&self, id: &str, program_column: &str) -> Result<DataFrame> {
        let height = self.table.height();
        let ids = required(self.table, self.id)?;
        let names = match self.name {
            Some(name) if self.table.get_column_index(name).is_some() => {
                column_strings(self.table, name)?
            }
            _ => vec![None; height],
        };
        let programs = match self.program {
            ProgramFrom::Column(name) => required(self.table, name)?,
            ProgramFrom::Lookup(lookup) => ids
                .iter()
                .map(|id| {
                    id.as_deref()
                        .and_then(|id| lookup.get(id.trim()))
                        .cloned()
                })
                .collect(),
        };
        let sumber = vec![self.sumber; height];

        Ok(DataFrame::new(vec![
            Series::new(id.into(), ids).into_column(),
            Series::new(NAMA.into(), names).into_column(),
            Series::new(program_column.into(), programs).into_column(),
            Series::new(SUMBER.into(), sumber).into_column(),
        ])?)
    }
}

fn required(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    if df.get_column_index(column).is_none() {
        return Err(CoreError::missing_column(column, "numerator"));
    }
    Ok(column_strings(df, column)?)
}

// `id → name`, first row of an id wins.
fn name_lookup(df: &DataFrame, id: &str, name: &str) -> Result<HashMap<String, String>> {
    let ids = required(df, id)?;
    let names = required(df, name)?;
    let mut lookup = HashMap::new();
    for (id, name) in ids.into_iter().zip(names) {
        if let (Some(id), Some(name)) = (id, name) {
            lookup.entry(id.trim().to_string()).or_insert(name);
        }
    }
    Ok(lookup)
}

// Replaces the `Nama` column with the name registered for each id.
fn with_names(df: &DataFrame, id: &str, names: &HashMap<String, String>) -> Result<DataFrame> {
    let ids = required(df, id)?;
    let resolved: Vec<Option<String>> = ids
        .iter()
        .map(|id| id.as_deref().and_then(|id| names.get(id.trim())).cloned())
        .collect();
    let mut out = df.clone();
    out.with_column(Series::new(NAMA.into(), resolved))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use iku_ingest::MemorySource;

    fn frame(columns: &[(&str, &[&str])]) -> DataFrame {
        DataFrame::new(
            columns
                .iter()
                .map(|(name, values)| Series::new((*name).into(), values.to_vec()).into_column())
                .collect(),
        )
        .unwrap()
    }

    fn graduate_penyebut() -> DataFrame {
        frame(&[
            ("NIM", &["1", "2", "3", "4", "5"]),
            ("Nama", &["Ani", "Budi", "Cici", "Dedi", "Eka"]),
            ("Prodi", &["Fisika", "Fisika", "Kimia", "Kimia", "Kimia"]),
        ])
    }

    /// Numerators of 11, 12 and 13 with only the 11 denominator.
    fn graduate_numerators() -> MemorySource {
        MemorySource::new()
            .with(
                IkuCode::Iku11,
                FileKind::Pembilang,
                frame(&[("NIM", &["1", "3"]), ("Nama", &["Ani", "Cici"]), ("Prodi", &["Fisika", "Kimia"])]),
            )
            .with(
                IkuCode::Iku12,
                FileKind::Pembilang,
                frame(&[("NIM", &["1"]), ("Nama", &["Ani"]), ("Prodi", &["Fisika"])]),
            )
            .with(
                IkuCode::Iku13,
                FileKind::Pembilang,
                frame(&[("NIM", &["4"]), ("Nama", &["Dedi"]), ("Prodi", &["Program Studi Kimia"])]),
            )
            .with(IkuCode::Iku11, FileKind::Penyebut, graduate_penyebut())
    }

    fn graduate_source() -> MemorySource {
        graduate_numerators()
            .with(IkuCode::Iku12, FileKind::Penyebut, graduate_penyebut())
            .with(IkuCode::Iku13, FileKind::Penyebut, graduate_penyebut())
    }

    #[test]
    fn test_graduates_keep_first_source() {
        let source = graduate_source();
        let result = process_combined(IkuCode::Iku1, &source).unwrap();

        assert_eq!(result.code, IkuCode::Iku1);
        assert_eq!(result.stats.numerator, 3.0);
        assert_eq!(result.stats.denominator, 5.0);
        assert_eq!(result.stats.percentage, 60.0);

        let kimia = result.rows.iter().find(|row| row.program == "Kimia").unwrap();
        assert_eq!((kimia.numerator, kimia.denominator), (2, 3));

        let components: Vec<(IkuCode, f64)> = result
            .components
            .iter()
            .map(|(code, stats)| (*code, stats.percentage))
            .collect();
        assert_eq!(
            components,
            vec![
                (IkuCode::Iku11, 40.0),
                (IkuCode::Iku12, 20.0),
                (IkuCode::Iku13, 20.0)
            ]
        );
    }

    #[test]
    fn test_missing_sub_metric_denominator_keeps_indicator() {
        let source = graduate_numerators();
        let result = process_combined(IkuCode::Iku1, &source).unwrap();

        assert_eq!(result.stats.numerator, 3.0);
        assert_eq!(result.stats.denominator, 5.0);
        assert!(!result.rows.is_empty());
        let codes: Vec<IkuCode> = result.components.iter().map(|(code, _)| *code).collect();
        assert_eq!(codes, vec![IkuCode::Iku11]);
    }

    #[test]
    fn test_pool_keeps_first_occurrence() {
        let first = frame(&[("NIM", &["1", "2"]), ("Prodi", &["Fisika", "Kimia"])]);
        let second = frame(&[("NIM", &["2", "3", ""]), ("Prodi", &["Biologi", "Kimia", "Kimia"])]);
        let parts = [
            Contribution {
                table: &first,
                id: NIM,
                name: Some(NAMA),
                program: ProgramFrom::Column(PRODI),
                sumber: "Bekerja",
            },
            Contribution {
                table: &second,
                id: NIM,
                name: Some(NAMA),
                program: ProgramFrom::Column(PRODI),
                sumber: "Studi Lanjut",
            },
        ];

        let pooled = pool(&parts, NIM, PRODI).unwrap();
        assert_eq!(pooled.height(), 4);
        assert_eq!(
            column_strings(&pooled, SUMBER).unwrap(),
            vec![
                Some("Bekerja".to_string()),
                Some("Bekerja".to_string()),
                Some("Studi Lanjut".to_string()),
                Some("Studi Lanjut".to_string()),
            ]
        );
        assert_eq!(
            column_strings(&pooled, PRODI).unwrap()[1],
            Some("Kimia".to_string())
        );
        assert_eq!(column_strings(&pooled, NAMA).unwrap()[0], None);
    }

    #[test]
    fn test_students_recover_program_by_nim() {
        let source = MemorySource::new()
            .with(
                IkuCode::Iku21,
                FileKind::Pembilang,
                frame(&[("NIM", &["1"]), ("Nama", &["Ani"]), ("Program Studi", &["Informatika"])]),
            )
            .with(
                IkuCode::Iku22,
                FileKind::Pembilang,
                frame(&[("NIM", &["1", "2"]), ("Tingkat", &["Nasional", "Provinsi"])]),
            )
            .with(
                IkuCode::Iku23,
                FileKind::Pembilang,
                frame(&[("NIM", &["3"]), ("Nama", &["Cici"]), ("Program Studi", &["Fisika"])]),
            )
            .with(
                IkuCode::Iku21,
                FileKind::Penyebut,
                frame(&[
                    ("NIM", &["1", "2", "3", "4"]),
                    ("Nama", &["Ani", "Budi", "Cici", "Dedi"]),
                    ("Program Studi", &["Informatika", "Fisika", "Fisika", "Fisika"]),
                ]),
            );
        let source = source
            .with(
                IkuCode::Iku22,
                FileKind::Penyebut,
                frame(&[("NIM", &["1", "2"]), ("Program Studi", &["Informatika", "Fisika"])]),
            )
            .with(
                IkuCode::Iku23,
                FileKind::Penyebut,
                frame(&[("NIM", &["3"]), ("Program Studi", &["Fisika"])]),
            );

        let result = process_combined(IkuCode::Iku2, &source).unwrap();
        assert_eq!(result.stats.numerator, 3.0);
        let fisika = result.rows.iter().find(|row| row.program == "Fisika").unwrap();
        assert_eq!((fisika.numerator, fisika.denominator), (2, 3));
        assert_eq!(result.components.len(), 3);
    }

    #[test]
    fn test_single_sub_metric_indicator() {
        let source = MemorySource::new()
            .with(
                IkuCode::Iku71,
                FileKind::Pembilang,
                frame(&[("Program Studi", &["Fisika"])]),
            )
            .with(
                IkuCode::Iku71,
                FileKind::Penyebut,
                frame(&[("Program Studi", &["Fisika", "Fisika"])]),
            );

        let result = process_combined(IkuCode::Iku7, &source).unwrap();
        assert_eq!(result.code, IkuCode::Iku7);
        assert_eq!(result.stats.percentage, 50.0);
        assert_eq!(result.components, vec![(IkuCode::Iku71, result.stats)]);
    }

    #[test]
    fn test_missing_sub_metric_fails_indicator() {
        let source = MemorySource::new().with(
            IkuCode::Iku31,
            FileKind::Penyebut,
            frame(&[("NIP", &["a"]), ("Program Studi", &["Fisika"])]),
        );
        let err = process_combined(IkuCode::Iku3, &source).unwrap_err();
        assert!(err.is_missing_input());
    }
}
