//! IKU 31, 33, 41 and 42: lecturer activities outside the campus.

use std::collections::HashSet;

use iku_common::column_strings;
use iku_model::{IkuCode, Jurusan, jurusan_for, strip_program_prefix};
use polars::prelude::DataFrame;

use super::{
    Bar, BarPanel, Figure, LegendEntry, Panel, TablePanel, Tables, count_bars, ellipsize,
    figure_name, group_by_program, has_columns, jurusan_legend, name_summary, tally, wrap,
};
use crate::aggregate::{id_lookup, value_counts};
use crate::error::Result;
use crate::processors::{NIP, PROGRAM_STUDI};

const VIVID: [&str; 10] = [
    "#3498DB", "#E74C3C", "#F39C12", "#1ABC9C", "#9B59B6", "#E85D75", "#70AD47", "#5B9BD5",
    "#ED7D31", "#9966CC",
];

const SOFT: [&str; 10] = [
    "#70AD47", "#5B9BD5", "#ED7D31", "#9966CC", "#E85D75", "#FFC000", "#A8D08D", "#F4B183",
    "#C5A8E0", "#BDC3C7",
];

const ACTIVITY_KINDS: [&str; 3] = ["#70AD47", "#ED7D31", "#F39C12"];

const NAMA: &str = "Nama";
const JURUSAN: &str = "Jurusan";
const NAME_LIMIT: usize = 6;
const PRACTITIONER_ROWS: usize = 40;
const FALLBACK_COLOR: &str = "#5B9BD5";

fn cycle<'a>(palette: &'a [&'a str]) -> impl Fn(usize, &str) -> String + 'a {
    move |idx, _| palette[idx % palette.len()].to_string()
}

fn top(df: &DataFrame, column: &str, limit: usize) -> Result<Vec<(String, u32)>> {
    let mut counts = value_counts(df, column)?;
    counts.truncate(limit);
    Ok(counts)
}

/// Distinct lecturers behind the rows, with their share of the faculty and
/// the average rows per lecturer.
struct Activity {
    rows: usize,
    lecturers: usize,
    faculty: usize,
}

impl Activity {
    fn of(tables: &Tables<'_>) -> Result<Self> {
        let df = tables.numerator;
        let lecturers = if df.get_column_index(NIP).is_some() {
            column_strings(df, NIP)?
                .into_iter()
                .flatten()
                .collect::<HashSet<_>>()
                .len()
        } else {
            0
        };
        Ok(Self {
            rows: df.height(),
            lecturers,
            faculty: tables.denominator.height(),
        })
    }

    fn share(&self) -> f64 {
        super::share(self.lecturers, self.faculty)
    }

    fn average(&self) -> f64 {
        if self.lecturers == 0 {
            0.0
        } else {
            self.rows as f64 / self.lecturers as f64
        }
    }

    fn summary(&self, noun: &str, active: &str) -> String {
        format!(
            "Total: {} {noun} | {}/{} {active} ({:.1}%) | Rata-rata: {:.1} per dosen",
            self.rows,
            self.lecturers,
            self.faculty,
            self.share(),
            self.average()
        )
    }
}

/// Annotated bars: one per program, names written beside the bar.
fn annotated_bars(groups: Vec<(String, Vec<String>, Jurusan)>) -> (Vec<Bar>, Vec<LegendEntry>) {
    let mut groups = groups;
    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(&b.0)));
    let legend = jurusan_legend(groups.iter().map(|(_, _, jurusan)| *jurusan));
    let bars = groups
        .into_iter()
        .map(|(program, names, jurusan)| {
            let count = u32::try_from(names.len()).unwrap_or(u32::MAX);
            Bar::new(program, count, jurusan.palette().base)
                .annotated(wrap(&name_summary(&names, NAME_LIMIT), 60))
        })
        .collect();
    (bars, legend)
}

// IKU 31: tridharma activities at other universities.
pub(super) fn tridharma(tables: &Tables<'_>) -> Result<Vec<Figure>> {
    let df = tables.numerator;
    let mut figures = Vec::new();

    if has_columns(df, "dosen_annotated", &[NIP, NAMA])
        && has_columns(tables.denominator, "dosen_annotated", &[NIP, PROGRAM_STUDI])
    {
        let programs = id_lookup(tables.denominator, NIP, PROGRAM_STUDI)?;
        let mut seen = HashSet::new();
        let mut groups: Vec<(String, Vec<String>, Jurusan)> = Vec::new();
        let ids = column_strings(df, NIP)?;
        let names = column_strings(df, NAMA)?;
        for (id, name) in ids.into_iter().zip(names) {
            let Some(id) = id else { continue };
            if !seen.insert(id.clone()) {
                continue;
            }
            let Some(program) = programs.get(&id) else {
                continue;
            };
            let name = name.unwrap_or_else(|| id.clone());
            match groups.iter_mut().find(|(known, _, _)| known == program) {
                Some((_, members, _)) => members.push(name),
                None => groups.push((program.clone(), vec![name], jurusan_for(program))),
            }
        }
        let (bars, legend) = annotated_bars(groups);
        let mut figure = Figure::new(
            figure_name(IkuCode::Iku31, "dosen_annotated"),
            "IKU 31: Dosen Aktif Tridharma di PT Lain per Program Studi\ndengan Daftar Nama",
        );
        if !bars.is_empty() {
            figure.push(Panel::Bars(
                BarPanel::horizontal("", "Jumlah Dosen Aktif", bars).with_legend(legend),
            ));
        }
        figures.push(figure);
    }

    let activity = Activity::of(tables)?;
    let mut figure = Figure::new(
        figure_name(IkuCode::Iku31, "statistik"),
        format!(
            "IKU 31: Statistik Summary - Kegiatan Tridharma di PT Lain\n{}",
            activity.summary("kegiatan", "dosen aktif")
        ),
    );
    if has_columns(df, "Top 10 Kegiatan Tridharma", &["Kegiatan"]) {
        figure.push(Panel::Bars(BarPanel::horizontal(
            "Top 10 Kegiatan Tridharma",
            "Frekuensi",
            count_bars(&top(df, "Kegiatan", 10)?, cycle(&VIVID), Some(35)),
        )));
    }
    if has_columns(df, "Breakdown Jenis Kegiatan", &["Jenis"]) {
        figure.push(Panel::Bars(BarPanel::horizontal(
            "Breakdown Jenis Kegiatan",
            "Jumlah Kegiatan",
            count_bars(&value_counts(df, "Jenis")?, cycle(&ACTIVITY_KINDS), Some(35)),
        )));
    }
    figures.push(figure);
    Ok(figures)
}

// IKU 33: supervision of students outside their own program.
pub(super) fn supervision(tables: &Tables<'_>) -> Result<Vec<Figure>> {
    let df = tables.numerator;
    let mut figures = Vec::new();

    let mut top_programs = Figure::new(
        figure_name(IkuCode::Iku33, "top_programs"),
        "IKU 33: Top 10 Program Bimbingan Mahasiswa\nLuar Program Studi",
    );
    let mut statistik = Figure::new(
        figure_name(IkuCode::Iku33, "statistik"),
        format!(
            "IKU 33: Statistik Summary - Bimbingan Mahasiswa Luar Program Studi\n{}",
            Activity::of(tables)?.summary("mahasiswa", "dosen aktif")
        ),
    );
    if has_columns(df, "Nama Program", &["Nama Program"]) {
        top_programs.push(Panel::Bars(BarPanel::horizontal(
            "",
            "Jumlah Mahasiswa",
            count_bars(&top(df, "Nama Program", 10)?, cycle(&SOFT), Some(40)),
        )));
        statistik.push(Panel::Bars(BarPanel::horizontal(
            "Kategori Program Bimbingan",
            "Jumlah Mahasiswa",
            count_bars(&value_counts(df, "Nama Program")?, cycle(&SOFT), Some(35)),
        )));
    }
    if has_columns(df, "Top 10 Paket Program Spesifik", &["Paket Program"]) {
        statistik.push(Panel::Bars(BarPanel::horizontal(
            "Top 10 Paket Program Spesifik",
            "Jumlah Mahasiswa",
            count_bars(&top(df, "Paket Program", 10)?, cycle(&SOFT), Some(35)),
        )));
    }
    figures.push(top_programs);
    figures.push(statistik);
    Ok(figures)
}

// IKU 41: competency certificates issued by industry.
pub(super) fn certification(tables: &Tables<'_>) -> Result<Vec<Figure>> {
    let df = tables.numerator;
    let mut figure = Figure::new(
        figure_name(IkuCode::Iku41, "statistik"),
        format!(
            "IKU 41: Statistik Summary - Sertifikat Kompetensi/Profesi DUDI\n{}",
            Activity::of(tables)?.summary("sertifikat", "dosen bersertifikat")
        ),
    );
    for (column, title) in [
        ("Lembaga Sertifikasi", "Top 10 Lembaga Sertifikasi"),
        ("Bidang Sertifikasi", "Top 10 Bidang Sertifikasi"),
    ] {
        if has_columns(df, title, &[column]) {
            figure.push(Panel::Bars(BarPanel::horizontal(
                title,
                "Jumlah Sertifikat",
                count_bars(&top(df, column, 10)?, cycle(&VIVID), Some(35)),
            )));
        }
    }
    Ok(vec![figure])
}

/// One practitioner row: name, program without prefix, jurusan label.
struct Practitioner {
    name: String,
    program: String,
    jurusan: String,
}

fn practitioners_of(df: &DataFrame) -> Result<Vec<Practitioner>> {
    let names = column_strings(df, NAMA)?;
    let programs = column_strings(df, PROGRAM_STUDI)?;
    // The sheet usually names the jurusan; otherwise it follows the program.
    let jurusan = if df.get_column_index(JURUSAN).is_some() {
        column_strings(df, JURUSAN)?
    } else {
        vec![None; df.height()]
    };
    Ok(names
        .into_iter()
        .zip(programs)
        .zip(jurusan)
        .map(|((name, program), jurusan)| {
            let program = program
                .as_deref()
                .map(strip_program_prefix)
                .unwrap_or("-")
                .to_string();
            let jurusan = jurusan.unwrap_or_else(|| jurusan_for(&program).name().to_string());
            Practitioner {
                name: name.unwrap_or_else(|| "-".to_string()),
                program,
                jurusan,
            }
        })
        .collect())
}

fn jurusan_color(label: &str) -> String {
    Jurusan::from_label(label)
        .map_or(FALLBACK_COLOR, |jurusan| jurusan.palette().base)
        .to_string()
}

// IKU 42: practitioners teaching at the faculty.
pub(super) fn practitioners(tables: &Tables<'_>) -> Result<Vec<Figure>> {
    let df = tables.numerator;
    if !has_columns(df, "praktisi", &[NAMA, PROGRAM_STUDI]) {
        return Ok(Vec::new());
    }
    let mut rows = practitioners_of(df)?;
    rows.sort_by(|a, b| {
        a.jurusan
            .cmp(&b.jurusan)
            .then_with(|| a.program.cmp(&b.program))
            .then_with(|| a.name.cmp(&b.name))
    });
    let total = rows.len();

    let mut table = Figure::new(
        figure_name(IkuCode::Iku42, "tabel_praktisi"),
        "IKU 42: Daftar Pengajar Praktisi\nFakultas Sains & Teknologi",
    );
    table.push(Panel::Table(TablePanel {
        title: String::new(),
        headers: ["No", "Nama Dosen", "Program Studi", "Jurusan"]
            .map(String::from)
            .to_vec(),
        rows: rows
            .iter()
            .take(PRACTITIONER_ROWS)
            .enumerate()
            .map(|(idx, row)| {
                vec![
                    (idx + 1).to_string(),
                    row.name.clone(),
                    row.program.clone(),
                    row.jurusan.clone(),
                ]
            })
            .collect(),
        header_color: FALLBACK_COLOR.to_string(),
        note: (total > PRACTITIONER_ROWS)
            .then(|| format!("* Menampilkan {PRACTITIONER_ROWS} dari {total} praktisi")),
    }));

    let per_jurusan = tally(rows.iter().map(|row| row.jurusan.clone()));
    let jurusan_bars = count_bars(&per_jurusan, |_, label| jurusan_color(label), None);
    let mut distribution = Figure::new(
        figure_name(IkuCode::Iku42, "distribusi_jurusan"),
        "IKU 42: Distribusi Pengajar Praktisi per Jurusan",
    );
    distribution.push(Panel::Bars(BarPanel::horizontal(
        "",
        "Jumlah Praktisi",
        jurusan_bars.clone(),
    )));

    let groups = group_by_program(df, PROGRAM_STUDI, NAMA)?
        .into_iter()
        .map(|(program, names)| {
            let jurusan = rows
                .iter()
                .find(|row| row.program == program)
                .and_then(|row| Jurusan::from_label(&row.jurusan))
                .unwrap_or_else(|| jurusan_for(&program));
            (program, names, jurusan)
        })
        .collect();
    let (bars, legend) = annotated_bars(groups);
    let mut annotated = Figure::new(
        figure_name(IkuCode::Iku42, "praktisi_annotated"),
        "IKU 42: Distribusi Pengajar Praktisi per Program Studi\ndengan Daftar Nama",
    );
    annotated.push(Panel::Bars(
        BarPanel::horizontal("", "Jumlah Praktisi", bars).with_legend(legend),
    ));

    let faculty = tables.denominator.height();
    let mut statistik = Figure::new(
        figure_name(IkuCode::Iku42, "statistik"),
        format!(
            "IKU 42: Statistik Summary - Pengajar dari Kalangan Praktisi\nTotal: {total} praktisi | {faculty} dosen FST | Persentase: {:.1}%",
            tables.share()
        ),
    );
    statistik.push(Panel::Bars(BarPanel::horizontal(
        "Distribusi per Jurusan",
        "Jumlah Praktisi",
        jurusan_bars,
    )));
    let mut per_program = tally(rows.iter().map(|row| row.program.clone()));
    per_program.truncate(10);
    let per_program: Vec<(String, u32)> = per_program
        .into_iter()
        .map(|(program, count)| (ellipsize(&program, 35), count))
        .collect();
    statistik.push(Panel::Bars(BarPanel::horizontal(
        "Top 10 Program Studi",
        "Jumlah Praktisi",
        count_bars(&per_program, cycle(&VIVID), None),
    )));

    Ok(vec![table, distribution, annotated, statistik])
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

    fn bars(panel: &Panel) -> &BarPanel {
        match panel {
            Panel::Bars(bars) => bars,
            other => panic!("expected bars, got {other:?}"),
        }
    }

    #[test]
    fn test_tridharma_figures() {
        let numerator = frame(&[
            ("NIP", vec!["1", "1", "2", "3"]),
            ("Nama", vec!["Ani, M.Si.", "Ani, M.Si.", "Budi", "Cici"]),
            ("Kegiatan", vec!["Dosen Tamu", "Penguji", "Dosen Tamu", "Dosen Tamu"]),
            ("Jenis", vec!["Pengajaran", "Pengajaran", "Penelitian", "Pengajaran"]),
        ]);
        let denominator = frame(&[
            ("NIP", vec!["1", "2", "3", "4", "5"]),
            (
                "Program Studi",
                vec!["Fisika", "Fisika", "Informatika", "Kimia", "Biologi"],
            ),
        ]);
        let figures = tridharma(&tables(&numerator, &denominator)).unwrap();
        assert_eq!(figures.len(), 2);

        let annotated = bars(&figures[0].panels[0]);
        let rows: Vec<(&str, u32, Option<&str>)> = annotated
            .bars
            .iter()
            .map(|bar| (bar.label.as_str(), bar.value, bar.annotation.as_deref()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Fisika", 2, Some("Ani, Budi")),
                ("Informatika", 1, Some("Cici"))
            ]
        );

        let statistik = &figures[1];
        assert_eq!(statistik.name, "IKU_31_breakdown_statistik");
        insta::assert_snapshot!(statistik.title, @r"
        IKU 31: Statistik Summary - Kegiatan Tridharma di PT Lain
        Total: 4 kegiatan | 3/5 dosen aktif (60.0%) | Rata-rata: 1.3 per dosen
        ");
        let activities = bars(&statistik.panels[0]);
        assert_eq!(activities.bars[0].label, "Dosen Tamu");
        assert_eq!(activities.bars[0].color, "#3498DB");
        assert_eq!(activities.axis_label, "Frekuensi");
        let kinds = bars(&statistik.panels[1]);
        assert_eq!(kinds.bars[1].color, "#ED7D31");
    }

    #[test]
    fn test_certification_without_lecturer_ids() {
        let numerator = frame(&[("Lembaga Sertifikasi", vec!["BNSP", "BNSP", "LSP"])]);
        let denominator = frame(&[("NIP", vec!["1", "2"])]);
        let figures = certification(&tables(&numerator, &denominator)).unwrap();
        assert!(figures[0].title.ends_with(
            "Total: 3 sertifikat | 0/2 dosen bersertifikat (0.0%) | Rata-rata: 0.0 per dosen"
        ));
        // No `Bidang Sertifikasi` column.
        assert_eq!(figures[0].panels.len(), 1);
    }

    #[test]
    fn test_practitioner_table_and_distribution() {
        let names: Vec<String> = (0..42).map(|idx| format!("Praktisi {idx:02}")).collect();
        let programs: Vec<&str> = (0..42)
            .map(|idx| if idx % 3 == 0 { "Program Studi Informatika" } else { "Fisika" })
            .collect();
        let numerator = DataFrame::new(vec![
            Series::new("Nama".into(), names).into_column(),
            Series::new("Program Studi".into(), programs).into_column(),
        ])
        .unwrap();
        let denominator = frame(&[("NIP", vec!["1"; 84])]);
        let figures = practitioners(&tables(&numerator, &denominator)).unwrap();
        let names: Vec<&str> = figures.iter().map(|figure| figure.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "IKU_42_breakdown_tabel_praktisi",
                "IKU_42_breakdown_distribusi_jurusan",
                "IKU_42_breakdown_praktisi_annotated",
                "IKU_42_breakdown_statistik",
            ]
        );

        let Panel::Table(table) = &figures[0].panels[0] else {
            panic!("expected table");
        };
        assert_eq!(table.rows.len(), 40);
        assert_eq!(table.rows[0][2], "Fisika");
        assert_eq!(table.rows[0][3], "MIPA");
        assert_eq!(table.note.as_deref(), Some("* Menampilkan 40 dari 42 praktisi"));

        let jurusan = bars(&figures[1].panels[0]);
        let counts: Vec<(&str, u32)> = jurusan
            .bars
            .iter()
            .map(|bar| (bar.label.as_str(), bar.value))
            .collect();
        assert_eq!(counts, vec![("MIPA", 28), ("Teknik Elektro", 14)]);

        let annotated = bars(&figures[2].panels[0]);
        assert_eq!(
            annotated.bars[0].annotation.as_deref(),
            Some("Praktisi 01, Praktisi 02 dan 26 lainnya")
        );
        assert!(figures[3].title.ends_with("Total: 42 praktisi | 84 dosen FST | Persentase: 50.0%"));
    }
}
