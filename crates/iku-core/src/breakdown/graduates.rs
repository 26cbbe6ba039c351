//! IKU 11, 12 and 13: graduates who work, continue their studies or run a
//! business.

use iku_model::IkuCode;

use super::{
    Bar, BarPanel, Figure, Panel, PiePanel, Slice, Tables, blues, color_of, figure_name,
    has_columns, in_order,
};
use crate::aggregate::value_counts;
use crate::error::Result;

const MASA_TUNGGU: &str = "Masa Tunggu";

const WAITING_COLORS: [&str; 3] = ["#70AD47", "#ED7D31", "#E85D75"];

const JENJANG_COLORS: [(&str, &str); 5] = [
    ("S3", "#FFC000"),
    ("S2", "#70AD47"),
    ("S1", "#5B9BD5"),
    ("D4", "#A5A5A5"),
    ("D3", "#ED7D31"),
];

/// Second panel of the figure.
#[derive(Debug, Clone, Copy)]
enum Cohort {
    /// Chronological bars with a blue gradient; `semester` labels `20231`
    /// as `2023/1`.
    Period { column: &'static str, semester: bool },
    /// Education level bars.
    Jenjang,
}

struct Layout {
    subject: &'static str,
    noun: &'static str,
    waiting_order: [&'static str; 3],
    waiting_title: &'static str,
    cohort: Cohort,
    cohort_title: &'static str,
    cohort_axis: &'static str,
}

fn layout(code: IkuCode) -> Layout {
    match code {
        IkuCode::Iku12 => Layout {
            subject: "Lulusan yang Melanjutkan Studi",
            noun: "lulusan melanjutkan studi",
            waiting_order: ["< 12 Bulan", "> 12 Bulan", "0"],
            waiting_title: "Masa Tunggu Melanjutkan Studi",
            cohort: Cohort::Period {
                column: "Tahun Masuk",
                semester: false,
            },
            cohort_title: "Distribusi Lulusan Melanjutkan Studi\nper Angkatan (Tahun Masuk)",
            cohort_axis: "Jumlah Lulusan Melanjutkan Studi",
        },
        IkuCode::Iku13 => Layout {
            subject: "Lulusan yang Berwiraswasta",
            noun: "lulusan berwiraswasta",
            waiting_order: ["< 6 Bulan", "> 6 Bulan", "0"],
            waiting_title: "Masa Tunggu Memulai Wirausaha",
            cohort: Cohort::Jenjang,
            cohort_title: "Distribusi Lulusan Berwiraswasta\nper Jenjang Pendidikan",
            cohort_axis: "Jumlah Lulusan Berwiraswasta",
        },
        _ => Layout {
            subject: "Lulusan yang Memiliki Pekerjaan",
            noun: "lulusan bekerja",
            waiting_order: ["< 6 Bulan", "> 6 Bulan", "0"],
            waiting_title: "Distribusi Masa Tunggu Kerja",
            cohort: Cohort::Period {
                column: "Semester Lulus",
                semester: true,
            },
            cohort_title: "Distribusi Lulusan Bekerja\nper Semester Kelulusan",
            cohort_axis: "Jumlah Lulusan Bekerja",
        },
    }
}

pub(super) fn figures(code: IkuCode, tables: &Tables<'_>) -> Result<Vec<Figure>> {
    let layout = layout(code);
    let df = tables.numerator;
    let mut figure = Figure::new(
        figure_name(code, "statistik"),
        format!(
            "IKU {code}: Statistik Summary - {}\nTotal: {} {} ({:.1}% dari {} lulusan FST)",
            layout.subject,
            df.height(),
            layout.noun,
            tables.share(),
            tables.denominator.height()
        ),
    );

    if has_columns(df, MASA_TUNGGU, &[MASA_TUNGGU]) {
        let counts = in_order(value_counts(df, MASA_TUNGGU)?, &layout.waiting_order);
        let slices: Vec<Slice> = counts
            .into_iter()
            .map(|(label, value)| {
                let color = layout
                    .waiting_order
                    .iter()
                    .position(|known| *known == label)
                    .map_or(super::OTHER_COLOR, |idx| WAITING_COLORS[idx])
                    .to_string();
                Slice {
                    label,
                    value,
                    color,
                }
            })
            .collect();
        let total: u32 = slices.iter().map(|slice| slice.value).sum();
        figure.push(Panel::Pie(PiePanel {
            title: format!("{}\nTotal: {total} lulusan", layout.waiting_title),
            slices,
        }));
    }

    let bars = match layout.cohort {
        Cohort::Period { column, semester } => {
            if has_columns(df, column, &[column]) {
                let mut counts = value_counts(df, column)?;
                counts.sort_by(|a, b| a.0.cmp(&b.0));
                let shades = blues(counts.len());
                Some(
                    counts
                        .into_iter()
                        .zip(shades)
                        .map(|((label, value), color)| {
                            let label = if semester {
                                semester_label(&label)
                            } else {
                                label
                            };
                            Bar::new(label, value, color)
                        })
                        .collect::<Vec<_>>(),
                )
            } else {
                None
            }
        }
        Cohort::Jenjang => {
            let column = "Jenjang Pendidikan";
            if has_columns(df, column, &[column]) {
                let order: Vec<&str> = JENJANG_COLORS.iter().map(|(label, _)| *label).collect();
                let counts = in_order(value_counts(df, column)?, &order);
                Some(
                    counts
                        .into_iter()
                        .map(|(label, value)| {
                            let color = color_of(&label, &JENJANG_COLORS);
                            Bar::new(label, value, color)
                        })
                        .collect(),
                )
            } else {
                None
            }
        }
    };
    if let Some(bars) = bars {
        figure.push(Panel::Bars(BarPanel::vertical(
            layout.cohort_title,
            layout.cohort_axis,
            bars,
        )));
    }

    Ok(vec![figure])
}

/// `20231` → `2023/1`; other values are returned unchanged.
fn semester_label(value: &str) -> String {
    match (value.get(..4), value.get(4..5)) {
        (Some(year), Some(period)) if year.chars().all(|c| c.is_ascii_digit()) => {
            format!("{year}/{period}")
        }
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakdown::Orientation;
    use polars::prelude::*;

    fn frame(columns: &[(&str, Vec<Option<&str>>)]) -> DataFrame {
        DataFrame::new(
            columns
                .iter()
                .map(|(name, values)| Series::new((*name).into(), values.clone()).into_column())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_semester_label() {
        assert_eq!(semester_label("20231"), "2023/1");
        assert_eq!(semester_label("2024"), "2024");
        assert_eq!(semester_label("Genap"), "Genap");
    }

    #[test]
    fn test_employed_graduates_figure() {
        let numerator = frame(&[
            (
                "Masa Tunggu",
                vec![Some("> 6 Bulan"), Some("< 6 Bulan"), Some("< 6 Bulan"), None],
            ),
            (
                "Semester Lulus",
                vec![Some("20232"), Some("20231"), Some("20231"), Some("20222")],
            ),
        ]);
        let denominator = frame(&[("NIM", vec![Some("1"); 8])]);
        let tables = Tables {
            numerator: &numerator,
            denominator: &denominator,
        };

        let figures = figures(IkuCode::Iku11, &tables).unwrap();
        assert_eq!(figures.len(), 1);
        let figure = &figures[0];
        assert_eq!(figure.name, "IKU_11_breakdown_statistik");
        insta::assert_snapshot!(figure.title, @r"
        IKU 11: Statistik Summary - Lulusan yang Memiliki Pekerjaan
        Total: 4 lulusan bekerja (50.0% dari 8 lulusan FST)
        ");

        let Panel::Pie(pie) = &figure.panels[0] else {
            panic!("expected pie");
        };
        let labels: Vec<(&str, u32, &str)> = pie
            .slices
            .iter()
            .map(|slice| (slice.label.as_str(), slice.value, slice.color.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![("< 6 Bulan", 2, "#70AD47"), ("> 6 Bulan", 1, "#ED7D31")]
        );
        assert_eq!(pie.title, "Distribusi Masa Tunggu Kerja\nTotal: 3 lulusan");

        let Panel::Bars(bars) = &figure.panels[1] else {
            panic!("expected bars");
        };
        let labels: Vec<&str> = bars.bars.iter().map(|bar| bar.label.as_str()).collect();
        assert_eq!(labels, vec!["2022/2", "2023/1", "2023/2"]);
        assert_eq!(bars.orientation, Orientation::Vertical);
    }

    #[test]
    fn test_founders_use_jenjang_order() {
        let numerator = frame(&[(
            "Jenjang Pendidikan",
            vec![Some("S1"), Some("S1"), Some("S2"), Some("D3")],
        )]);
        let denominator = frame(&[("NIM", vec![Some("1"); 4])]);
        let tables = Tables {
            numerator: &numerator,
            denominator: &denominator,
        };

        let figures = figures(IkuCode::Iku13, &tables).unwrap();
        // No waiting-time column: only the jenjang panel remains.
        assert_eq!(figures[0].panels.len(), 1);
        let Panel::Bars(bars) = &figures[0].panels[0] else {
            panic!("expected bars");
        };
        let bars: Vec<(&str, &str)> = bars
            .bars
            .iter()
            .map(|bar| (bar.label.as_str(), bar.color.as_str()))
            .collect();
        assert_eq!(
            bars,
            vec![("S2", "#70AD47"), ("S1", "#5B9BD5"), ("D3", "#ED7D31")]
        );
    }
}
