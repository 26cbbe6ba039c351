//! IKU 71 and 81: program-level learning and accreditation.

use std::collections::HashSet;

use iku_common::column_strings;
use iku_model::{IkuCode, Jurusan, jurusan_for, normalize_program};
use polars::prelude::DataFrame;

use super::{
    Bar, BarPanel, Figure, LegendEntry, Panel, PiePanel, Slice, TablePanel, Tables, count_bars,
    dominant_jurusan, figure_name, group_by_program, has_columns, jurusan_legend, row_jurusan,
    tally, wrap,
};
use crate::aggregate::value_counts;
use crate::error::Result;
use crate::processors::PROGRAM_STUDI;

const COURSE_NAME: &str = "Nama Matakuliah";
const METHOD: &str = "Metode Pembelajaran";
const CONCLUSION: &str = "Kesimpulan";
const COURSE_LIMIT: usize = 5;

const ACCREDITED: &str = "#2E7D32";
const NOT_ACCREDITED: &str = "#BDBDBD";
const ACCREDITED_LABEL: &str = "Akreditasi Internasional";
const NOT_ACCREDITED_LABEL: &str = "Belum Terakreditasi Internasional";

/// Detail table columns: (header, source column).
const DETAIL_COLUMNS: [(&str, &str); 6] = [
    ("Program Studi", "Program Studi"),
    ("Jenjang", "Jenjang Pendidikan"),
    ("Peringkat", "Peringkat Akreditasi"),
    ("Lembaga Akreditasi", "Lembaga Akreditasi"),
    ("Tanggal SK", "Tanggal SK"),
    ("Kadaluarsa", "Tanggal Kadaluarsa"),
];

/// Indices where the jurusan changes along `jurusan`.
fn separators(jurusan: &[Jurusan]) -> Vec<usize> {
    jurusan
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0] != pair[1])
        .map(|(idx, _)| idx + 1)
        .collect()
}

fn course_summary(courses: &[String]) -> String {
    let shown = courses
        .iter()
        .take(COURSE_LIMIT)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if courses.len() > COURSE_LIMIT {
        format!("{shown}.. +{} lainnya", courses.len() - COURSE_LIMIT)
    } else {
        shown
    }
}

// IKU 71: courses taught with project-based learning or case methods.
pub(super) fn project_learning(tables: &Tables<'_>) -> Result<Vec<Figure>> {
    let df = tables.numerator;
    let mut figures = Vec::new();

    if has_columns(df, "matakuliah_annotated", &[PROGRAM_STUDI, COURSE_NAME]) {
        let mut groups = group_by_program(df, PROGRAM_STUDI, COURSE_NAME)?;
        groups.sort_by(|a, b| {
            jurusan_for(&a.0)
                .order()
                .cmp(&jurusan_for(&b.0).order())
                .then_with(|| b.1.len().cmp(&a.1.len()))
                .then_with(|| a.0.cmp(&b.0))
        });
        let jurusan: Vec<Jurusan> = groups.iter().map(|(program, _)| jurusan_for(program)).collect();
        let bars: Vec<Bar> = groups
            .iter()
            .zip(&jurusan)
            .map(|((program, courses), jurusan)| {
                let count = u32::try_from(courses.len()).unwrap_or(u32::MAX);
                Bar::new(program.clone(), count, jurusan.palette().base)
                    .annotated(wrap(&course_summary(courses), 60))
            })
            .collect();
        let mut figure = Figure::new(
            figure_name(IkuCode::Iku71, "matakuliah_annotated"),
            "IKU 71: Mata Kuliah PJBL/Case Method per Program Studi\ndengan Daftar Nama Mata Kuliah",
        );
        figure.push(Panel::Bars(
            BarPanel::horizontal("", "Jumlah Mata Kuliah", bars)
                .with_legend(jurusan_legend(jurusan.iter().copied()))
                .with_separators(separators(&jurusan)),
        ));
        figures.push(figure);
    }

    let total = df.height();
    let mut figure = Figure::new(
        figure_name(IkuCode::Iku71, "statistik"),
        format!(
            "IKU 71: Statistik Mata Kuliah PJBL/Case Method\nTotal: {total} mata kuliah PJBL dari {} total ({:.1}%)",
            tables.denominator.height(),
            tables.share()
        ),
    );
    let jurusan = row_jurusan(df, PROGRAM_STUDI)?;
    if has_columns(df, "Top 10 Metode Pembelajaran", &[METHOD]) {
        let mut methods = value_counts(df, METHOD)?;
        methods.truncate(10);
        let dominant = dominant_jurusan(&column_strings(df, METHOD)?, &jurusan);
        let mut panel = BarPanel::horizontal(
            "Top 10 Metode Pembelajaran",
            "Jumlah Mata Kuliah",
            count_bars(
                &methods,
                |_, label| {
                    dominant
                        .get(label)
                        .copied()
                        .unwrap_or(Jurusan::Mipa)
                        .palette()
                        .base
                        .to_string()
                },
                None,
            ),
        );
        for bar in &mut panel.bars {
            let short: String = bar.label.chars().take(60).collect();
            bar.label = wrap(&short, 40);
        }
        if df.get_column_index(CONCLUSION).is_some() {
            let mut info = vec!["Kesimpulan:".to_string()];
            info.extend(
                value_counts(df, CONCLUSION)?
                    .into_iter()
                    .map(|(label, count)| format!("  • {label}: {count}")),
            );
            panel = panel.with_info(info);
        }
        figure.push(Panel::Bars(panel));
    }

    let per_jurusan = tally(jurusan.iter().flatten().map(|jurusan| jurusan.name().to_string()));
    if per_jurusan.is_empty() {
        figure.push(Panel::Message("No Data".to_string()));
    } else {
        figure.push(Panel::Pie(PiePanel {
            title: "Distribusi per Jurusan".to_string(),
            slices: per_jurusan
                .into_iter()
                .map(|(label, value)| Slice {
                    color: Jurusan::from_label(&label)
                        .unwrap_or(Jurusan::Mipa)
                        .palette()
                        .base
                        .to_string(),
                    label,
                    value,
                })
                .collect(),
        }));
    }
    figures.push(figure);
    Ok(figures)
}

// IKU 81: international accreditation per program.
pub(super) fn accreditation(tables: &Tables<'_>) -> Result<Vec<Figure>> {
    let mut figures = Vec::new();
    let accredited = tables.numerator.height();
    let programs = tables.denominator.height();

    if has_columns(tables.denominator, "overview", &[PROGRAM_STUDI]) {
        let holders: HashSet<String> = if tables.numerator.get_column_index(PROGRAM_STUDI).is_some() {
            column_strings(tables.numerator, PROGRAM_STUDI)?
                .into_iter()
                .flatten()
                .map(|program| normalize_program(&program))
                .collect()
        } else {
            HashSet::new()
        };
        let mut rows: Vec<(String, Jurusan, bool)> = column_strings(tables.denominator, PROGRAM_STUDI)?
            .into_iter()
            .flatten()
            .map(|program| {
                let program = normalize_program(&program);
                let has = holders.contains(&program);
                let jurusan = jurusan_for(&program);
                (program, jurusan, has)
            })
            .collect();
        rows.sort_by(|a, b| a.1.order().cmp(&b.1.order()).then_with(|| b.2.cmp(&a.2)));

        let jurusan: Vec<Jurusan> = rows.iter().map(|(_, jurusan, _)| *jurusan).collect();
        let bars: Vec<Bar> = rows
            .into_iter()
            .map(|(program, _, has)| {
                let (color, status) = if has {
                    (ACCREDITED, ACCREDITED_LABEL)
                } else {
                    (NOT_ACCREDITED, NOT_ACCREDITED_LABEL)
                };
                Bar::new(program, 1, color).annotated(status)
            })
            .collect();
        let mut figure = Figure::new(
            figure_name(IkuCode::Iku81, "overview"),
            format!(
                "IKU 81: Status Akreditasi Internasional Program Studi\n{accredited} dari {programs} prodi ({:.1}%) memiliki akreditasi internasional",
                tables.share()
            ),
        );
        figure.push(Panel::Bars(
            BarPanel::horizontal("", "", bars)
                .with_legend(vec![
                    LegendEntry {
                        label: ACCREDITED_LABEL.to_string(),
                        color: ACCREDITED.to_string(),
                    },
                    LegendEntry {
                        label: NOT_ACCREDITED_LABEL.to_string(),
                        color: NOT_ACCREDITED.to_string(),
                    },
                ])
                .with_separators(separators(&jurusan)),
        ));
        figures.push(figure);
    }

    let mut detail = Figure::new(
        figure_name(IkuCode::Iku81, "detail"),
        format!(
            "IKU 81: Detail Program Studi dengan Akreditasi Internasional\n{accredited} Program Studi Terakreditasi Internasional"
        ),
    );
    if accredited == 0 {
        detail.push(Panel::Message(
            "Belum ada program studi dengan akreditasi internasional".to_string(),
        ));
    } else {
        detail.push(Panel::Table(detail_table(tables.numerator)?));
    }
    figures.push(detail);
    Ok(figures)
}

fn detail_table(df: &DataFrame) -> Result<TablePanel> {
    let mut columns = Vec::with_capacity(DETAIL_COLUMNS.len());
    for (_, source) in DETAIL_COLUMNS {
        if df.get_column_index(source).is_some() {
            columns.push(column_strings(df, source)?);
        } else {
            columns.push(vec![None; df.height()]);
        }
    }
    let rows = (0..df.height())
        .map(|idx| {
            columns
                .iter()
                .map(|column| column[idx].clone().unwrap_or_else(|| "-".to_string()))
                .collect()
        })
        .collect();
    Ok(TablePanel {
        title: String::new(),
        headers: DETAIL_COLUMNS
            .iter()
            .map(|(header, _)| (*header).to_string())
            .collect(),
        rows,
        header_color: ACCREDITED.to_string(),
        note: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn frame(columns: &[(&str, Vec<&str>)]) -> DataFrame {
        DataFrame::new(
            columns
                .iter()
                .map(|(name, values)| Series::new((*name).into(), values.clone()).into_column())
                .collect(),
        )
        .unwrap()
    }

    fn tables<'a>(numerator: &'a DataFrame, denominator: &'a DataFrame) -> Tables<'a> {
        Tables {
            numerator,
            denominator,
        }
    }

    #[test]
    fn test_course_summary() {
        let courses: Vec<String> = (1..=7).map(|idx| format!("MK{idx}")).collect();
        assert_eq!(course_summary(&courses[..2]), "MK1, MK2");
        assert_eq!(
            course_summary(&courses),
            "MK1, MK2, MK3, MK4, MK5.. +2 lainnya"
        );
    }

    #[test]
    fn test_project_learning_groups_by_jurusan() {
        let numerator = frame(&[
            (
                "Program Studi",
                vec!["Informatika", "Fisika", "Fisika", "Teknik Sipil"],
            ),
            ("Nama Matakuliah", vec!["Basis Data", "Optika", "Mekanika", "Beton"]),
            ("Metode Pembelajaran", vec!["PJBL", "Case Method", "PJBL", "PJBL"]),
            ("Kesimpulan", vec!["Ya", "Ya", "Ya", "Ya"]),
        ]);
        let denominator = frame(&[("Kode", vec!["A"; 8])]);
        let figures = project_learning(&tables(&numerator, &denominator)).unwrap();
        assert_eq!(figures.len(), 2);

        let Panel::Bars(annotated) = &figures[0].panels[0] else {
            panic!("expected bars");
        };
        let labels: Vec<&str> = annotated.bars.iter().map(|bar| bar.label.as_str()).collect();
        assert_eq!(labels, vec!["Fisika", "Teknik Sipil", "Informatika"]);
        assert_eq!(annotated.separators, vec![1, 2]);
        assert_eq!(annotated.bars[0].annotation.as_deref(), Some("Optika, Mekanika"));

        let statistik = &figures[1];
        assert!(statistik.title.ends_with("Total: 4 mata kuliah PJBL dari 8 total (50.0%)"));
        let Panel::Bars(methods) = &statistik.panels[0] else {
            panic!("expected bars");
        };
        assert_eq!(methods.bars[0].label, "PJBL");
        assert_eq!(methods.info, vec!["Kesimpulan:", "  • Ya: 4"]);
        let Panel::Pie(pie) = &statistik.panels[1] else {
            panic!("expected pie");
        };
        assert_eq!(pie.total(), 4);
        assert_eq!(pie.slices[0].label, "MIPA");
    }

    #[test]
    fn test_accreditation_overview_and_empty_detail() {
        let numerator = DataFrame::new(vec![
            Series::new("Program Studi".into(), Vec::<String>::new()).into_column(),
        ])
        .unwrap();
        let denominator = frame(&[("Program Studi", vec!["Informatika", "Fisika"])]);
        let figures = accreditation(&tables(&numerator, &denominator)).unwrap();

        let Panel::Bars(overview) = &figures[0].panels[0] else {
            panic!("expected bars");
        };
        assert_eq!(overview.bars[0].label, "Fisika");
        assert_eq!(overview.bars[0].color, NOT_ACCREDITED);
        assert_eq!(overview.separators, vec![1]);
        assert_eq!(
            figures[1].panels[0],
            Panel::Message("Belum ada program studi dengan akreditasi internasional".to_string())
        );
    }

    #[test]
    fn test_accreditation_detail_table() {
        let numerator = frame(&[
            ("Program Studi", vec!["Program Studi Informatika"]),
            ("Lembaga Akreditasi", vec!["ASIIN"]),
        ]);
        let denominator = frame(&[("Program Studi", vec!["Informatika", "Fisika"])]);
        let figures = accreditation(&tables(&numerator, &denominator)).unwrap();

        let Panel::Bars(overview) = &figures[0].panels[0] else {
            panic!("expected bars");
        };
        assert_eq!(overview.bars[1].annotation.as_deref(), Some(ACCREDITED_LABEL));
        assert!(figures[0].title.ends_with("1 dari 2 prodi (50.0%) memiliki akreditasi internasional"));

        let Panel::Table(table) = &figures[1].panels[0] else {
            panic!("expected table");
        };
        assert_eq!(
            table.rows[0],
            vec!["Program Studi Informatika", "-", "-", "ASIIN", "-", "-"]
        );
        assert_eq!(table.header_color, "#2E7D32");
    }
}
