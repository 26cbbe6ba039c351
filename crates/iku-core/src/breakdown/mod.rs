//! Breakdown ("detail") figures for the sub-metrics.
//!
//! Builders read the raw numerator and denominator tables of a sub-metric
//! and describe the figures to draw as [`Figure`] values. Drawing lives in
//! the render crate.
//!
//! # Figures
//!
//! | Code | Figures |
//! |------|---------|
//! | 11, 12, 13 | `statistik`: waiting time pie, cohort bars |
//! | 21 | `statistik`: SKS bins, top activities |
//! | 22 | `statistik`: level pie, achievement bars |
//! | 23 | `statistik`: annotated list (up to 10) or HKI types |
//! | 31 | `dosen_annotated`, `statistik` |
//! | 33 | `top_programs`, `statistik` |
//! | 41 | `statistik` |
//! | 42 | `tabel_praktisi`, `distribusi_jurusan`, `praktisi_annotated`, `statistik` |
//! | 71 | `matakuliah_annotated`, `statistik` |
//! | 81 | `overview`, `detail` |
//!
//! A panel whose optional columns are absent is skipped with a warning; a
//! figure left without panels is not produced.

mod figure;
mod graduates;
mod lecturers;
mod programs;
mod students;

pub use figure::{
    Bar, BarPanel, Figure, LegendEntry, Orientation, Panel, PiePanel, Slice, TablePanel,
};

use std::collections::HashMap;

use iku_common::{column_strings, wrap_text};
use iku_ingest::{FileKind, MetricSource};
use iku_model::{IkuCode, JURUSAN_ORDER, Jurusan, jurusan_for, normalize_program};
use polars::prelude::DataFrame;
use tracing::warn;

use crate::error::Result;

/// Colour used for categories without an assigned colour.
pub const OTHER_COLOR: &str = "#A5A5A5";

/// Builds every breakdown figure of a sub-metric.
///
/// Codes without breakdowns yield an empty list.
pub fn build_breakdowns(code: IkuCode, source: &dyn MetricSource) -> Result<Vec<Figure>> {
    if !code.has_breakdown() {
        return Ok(Vec::new());
    }
    let numerator = source.load(code, FileKind::Pembilang)?;
    let denominator = source.load(code, FileKind::Penyebut)?;
    let tables = Tables {
        numerator: &numerator,
        denominator: &denominator,
    };

    let figures = match code {
        IkuCode::Iku11 | IkuCode::Iku12 | IkuCode::Iku13 => graduates::figures(code, &tables)?,
        IkuCode::Iku21 => students::mbkm(&tables)?,
        IkuCode::Iku22 => students::achievements(&tables)?,
        IkuCode::Iku23 => students::intellectual_property(&tables)?,
        IkuCode::Iku31 => lecturers::tridharma(&tables)?,
        IkuCode::Iku33 => lecturers::supervision(&tables)?,
        IkuCode::Iku41 => lecturers::certification(&tables)?,
        IkuCode::Iku42 => lecturers::practitioners(&tables)?,
        IkuCode::Iku71 => programs::project_learning(&tables)?,
        IkuCode::Iku81 => programs::accreditation(&tables)?,
        _ => Vec::new(),
    };

    let figures: Vec<Figure> = figures
        .into_iter()
        .filter(|figure| {
            if figure.is_empty() {
                warn!(figure = %figure.name, "no panels left, figure skipped");
            }
            !figure.is_empty()
        })
        .collect();
    tracing::debug!(iku = %code, figures = figures.len(), "built breakdowns");
    Ok(figures)
}

/// Numerator and denominator of the sub-metric being broken down.
pub(crate) struct Tables<'a> {
    pub numerator: &'a DataFrame,
    pub denominator: &'a DataFrame,
}

impl Tables<'_> {
    /// `n/d × 100`, unrounded; 0 for an empty denominator.
    pub fn share(&self) -> f64 {
        share(self.numerator.height(), self.denominator.height())
    }
}

pub(crate) fn share(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

pub(crate) fn figure_name(code: IkuCode, suffix: &str) -> String {
    format!("IKU_{code}_breakdown_{suffix}")
}

/// True when every column is present; otherwise logs the panel as skipped.
pub(crate) fn has_columns(df: &DataFrame, panel: &str, columns: &[&str]) -> bool {
    let missing: Vec<&str> = columns
        .iter()
        .copied()
        .filter(|column| df.get_column_index(column).is_none())
        .collect();
    if missing.is_empty() {
        true
    } else {
        warn!(panel, ?missing, "columns not found, panel skipped");
        false
    }
}

/// Puts the labels listed in `order` first, in that order, followed by the
/// remaining labels as they came.
pub(crate) fn in_order(counts: Vec<(String, u32)>, order: &[&str]) -> Vec<(String, u32)> {
    let mut ordered: Vec<(String, u32)> = order
        .iter()
        .filter_map(|label| counts.iter().find(|(name, _)| name == label).cloned())
        .collect();
    ordered.extend(
        counts
            .into_iter()
            .filter(|(name, _)| !order.contains(&name.as_str())),
    );
    ordered
}

/// Colour from a fixed `(label, colour)` table, [`OTHER_COLOR`] otherwise.
pub(crate) fn color_of(label: &str, colors: &[(&str, &str)]) -> String {
    colors
        .iter()
        .find(|(name, _)| *name == label)
        .map_or(OTHER_COLOR, |(_, color)| *color)
        .to_string()
}

/// `n` shades of blue, light to dark.
pub(crate) fn blues(n: usize) -> Vec<String> {
    const LIGHT: (f64, f64, f64) = (107.0, 174.0, 214.0);
    const DARK: (f64, f64, f64) = (8.0, 48.0, 107.0);
    (0..n)
        .map(|idx| {
            let t = if n <= 1 {
                0.5
            } else {
                idx as f64 / (n - 1) as f64
            };
            let mix = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
            format!(
                "#{:02X}{:02X}{:02X}",
                mix(LIGHT.0, DARK.0),
                mix(LIGHT.1, DARK.1),
                mix(LIGHT.2, DARK.2)
            )
        })
        .collect()
}

pub(crate) fn wrap(label: &str, width: usize) -> String {
    wrap_text(label, width).join("\n")
}

/// Jurusan of each row, taken from a program column.
pub(crate) fn row_jurusan(df: &DataFrame, program_column: &str) -> Result<Vec<Option<Jurusan>>> {
    if df.get_column_index(program_column).is_none() {
        return Ok(vec![None; df.height()]);
    }
    Ok(column_strings(df, program_column)?
        .into_iter()
        .map(|program| program.map(|p| jurusan_for(&normalize_program(&p))))
        .collect())
}

/// Most frequent jurusan behind every label of `category`.
///
/// Ties go to the jurusan earlier in [`JURUSAN_ORDER`]; labels without any
/// known jurusan fall back to MIPA.
pub(crate) fn dominant_jurusan(
    labels: &[Option<String>],
    jurusan: &[Option<Jurusan>],
) -> HashMap<String, Jurusan> {
    let mut tally: HashMap<&str, [u32; JURUSAN_ORDER.len()]> = HashMap::new();
    for (label, jurusan) in labels.iter().zip(jurusan) {
        let Some(label) = label.as_deref() else {
            continue;
        };
        let counts = tally.entry(label).or_insert([0; JURUSAN_ORDER.len()]);
        if let Some(jurusan) = jurusan {
            counts[jurusan.order()] += 1;
        }
    }
    tally
        .into_iter()
        .map(|(label, counts)| {
            let best = counts
                .iter()
                .enumerate()
                .filter(|(_, count)| **count > 0)
                .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(&a.0)))
                .map_or(Jurusan::Mipa, |(idx, _)| JURUSAN_ORDER[idx]);
            (label.to_string(), best)
        })
        .collect()
}

/// Legend entries for the jurusan used, in display order.
pub(crate) fn jurusan_legend(used: impl IntoIterator<Item = Jurusan>) -> Vec<LegendEntry> {
    let used: Vec<Jurusan> = used.into_iter().collect();
    JURUSAN_ORDER
        .iter()
        .copied()
        .filter(|jurusan| used.contains(jurusan))
        .map(LegendEntry::jurusan)
        .collect()
}

/// Names shown beside a bar: all of them up to `limit`, otherwise the first
/// two followed by `dan N lainnya`. Only the part before the first comma of
/// each name is kept (academic titles are dropped).
pub(crate) fn name_summary(names: &[String], limit: usize) -> String {
    let short = |name: &String| name.split(',').next().unwrap_or(name).trim().to_string();
    if names.len() <= limit {
        names.iter().map(short).collect::<Vec<_>>().join(", ")
    } else {
        let first: Vec<String> = names.iter().take(2).map(short).collect();
        format!("{} dan {} lainnya", first.join(", "), names.len() - 2)
    }
}

/// Values of `value_column` grouped by the program of each row, programs
/// in first-seen order.
pub(crate) fn group_by_program(
    df: &DataFrame,
    program_column: &str,
    value_column: &str,
) -> Result<Vec<(String, Vec<String>)>> {
    let programs = column_strings(df, program_column)?;
    let values = column_strings(df, value_column)?;
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for (program, value) in programs.into_iter().zip(values) {
        let Some(program) = program.map(|p| normalize_program(&p)) else {
            continue;
        };
        let value = value.unwrap_or_default();
        match groups.iter_mut().find(|(name, _)| *name == program) {
            Some((_, members)) => members.push(value),
            None => groups.push((program, vec![value])),
        }
    }
    Ok(groups)
}

/// `(label, count)` pairs, most frequent first, ties by label.
pub(crate) fn tally(labels: impl IntoIterator<Item = String>) -> Vec<(String, u32)> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    let mut counts: Vec<(String, u32)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

/// Cuts `label` to `max` characters followed by `...`.
pub(crate) fn ellipsize(label: &str, max: usize) -> String {
    if label.chars().count() > max {
        format!("{}...", label.chars().take(max).collect::<String>())
    } else {
        label.to_string()
    }
}

/// Horizontal bars for `(label, count)` pairs in the given order.
pub(crate) fn count_bars(
    counts: &[(String, u32)],
    color: impl Fn(usize, &str) -> String,
    wrap_width: Option<usize>,
) -> Vec<Bar> {
    counts
        .iter()
        .enumerate()
        .map(|(idx, (label, count))| {
            let shown = match wrap_width {
                Some(width) => wrap(label, width),
                None => label.clone(),
            };
            Bar::new(shown, *count, color(idx, label))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use iku_ingest::MemorySource;
    use polars::prelude::*;

    #[test]
    fn test_in_order() {
        let counts = vec![
            ("> 6 Bulan".to_string(), 4),
            ("Lainnya".to_string(), 3),
            ("< 6 Bulan".to_string(), 2),
        ];
        let ordered = in_order(counts, &["< 6 Bulan", "> 6 Bulan", "0"]);
        let labels: Vec<&str> = ordered.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(labels, vec!["< 6 Bulan", "> 6 Bulan", "Lainnya"]);
    }

    #[test]
    fn test_name_summary() {
        let names: Vec<String> = ["Ani, S.Si., M.Si.", "Budi, Ph.D.", "Cici"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(name_summary(&names, 6), "Ani, Budi, Cici");
        assert_eq!(name_summary(&names, 2), "Ani, Budi dan 1 lainnya");
    }

    #[test]
    fn test_dominant_jurusan_prefers_display_order_on_ties() {
        let labels = vec![
            Some("Magang".to_string()),
            Some("Magang".to_string()),
            Some("Riset".to_string()),
            None,
        ];
        let jurusan = vec![
            Some(Jurusan::TeknikElektro),
            Some(Jurusan::Mipa),
            None,
            Some(Jurusan::D3),
        ];
        let dominant = dominant_jurusan(&labels, &jurusan);
        assert_eq!(dominant["Magang"], Jurusan::Mipa);
        assert_eq!(dominant["Riset"], Jurusan::Mipa);
        assert_eq!(dominant.len(), 2);
    }

    #[test]
    fn test_tally_and_ellipsize() {
        let counts = tally(["b", "a", "b", "c", "a", "b"].map(String::from));
        assert_eq!(
            counts,
            vec![
                ("b".to_string(), 3),
                ("a".to_string(), 2),
                ("c".to_string(), 1)
            ]
        );
        assert_eq!(ellipsize("Informatika", 4), "Info...");
        assert_eq!(ellipsize("Fisika", 6), "Fisika");
    }

    #[test]
    fn test_blues_gradient() {
        let shades = blues(3);
        assert_eq!(shades.len(), 3);
        assert_eq!(shades[0], "#6BAED6");
        assert_eq!(shades[2], "#08306B");
        assert_eq!(blues(1).len(), 1);
    }

    #[test]
    fn test_codes_without_breakdown() {
        let source = MemorySource::new();
        assert!(build_breakdowns(IkuCode::Iku51, &source).unwrap().is_empty());
        assert!(build_breakdowns(IkuCode::Iku1, &source).unwrap().is_empty());
    }

    #[test]
    fn test_figure_without_panels_is_dropped() {
        let numerator = DataFrame::new(vec![
            Series::new("NIM".into(), ["1"]).into_column(),
            Series::new("Prodi".into(), ["Fisika"]).into_column(),
        ])
        .unwrap();
        let source = MemorySource::new()
            .with(IkuCode::Iku12, FileKind::Pembilang, numerator.clone())
            .with(IkuCode::Iku12, FileKind::Penyebut, numerator);
        assert!(build_breakdowns(IkuCode::Iku12, &source).unwrap().is_empty());
    }
}
