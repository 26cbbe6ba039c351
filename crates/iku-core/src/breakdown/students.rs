//! IKU 21, 22 and 23: student activities, achievements and intellectual
//! property.

use std::collections::HashMap;

use iku_common::{column_strings, parse_f64};
use iku_model::{IkuCode, Jurusan, jurusan_for, normalize_program, strip_level_prefix};
use polars::prelude::*;

use super::{
    Bar, BarPanel, Figure, Panel, PiePanel, Slice, Tables, color_of, count_bars,
    dominant_jurusan, ellipsize, figure_name, has_columns, in_order, jurusan_legend, row_jurusan,
};
use crate::aggregate::{id_lookup, value_counts};
use crate::error::Result;
use crate::processors::{NIM, PROGRAM_STUDI};

const SKS_BINS: [(&str, &str); 3] = [
    ("2-8 SKS\n(Rendah)", "#ED7D31"),
    ("9-14 SKS\n(Sedang)", "#70AD47"),
    ("15-22 SKS\n(Tinggi)", "#5B9BD5"),
];

const LEVEL_COLORS: [(&str, &str); 4] = [
    ("Internasional", "#FFC000"),
    ("Nasional", "#70AD47"),
    ("Provinsi", "#5B9BD5"),
    ("Universitas", "#ED7D31"),
];

const RANK_COLORS: [(&str, &str); 6] = [
    ("Juara 1", "#FFC000"),
    ("Juara 2", "#C0C0C0"),
    ("Juara 3", "#CD7F32"),
    ("Harapan 1", "#70AD47"),
    ("Harapan 2", "#5B9BD5"),
    ("Peserta", "#ED7D31"),
];

/// Annotated list threshold for IKU 23.
const DETAIL_LIMIT: usize = 10;

fn sks_bin(sks: f64) -> &'static str {
    if sks <= 8.0 {
        SKS_BINS[0].0
    } else if sks <= 14.0 {
        SKS_BINS[1].0
    } else {
        SKS_BINS[2].0
    }
}

fn student_title(code: IkuCode, subject: &str, total: String, tables: &Tables<'_>) -> String {
    format!(
        "IKU {code}: Statistik Summary - {subject}\nTotal: {total} ({:.1}% dari {} mahasiswa FST)",
        tables.share(),
        tables.denominator.height()
    )
}

// IKU 21: MBKM credit load and the most joined activities.
pub(super) fn mbkm(tables: &Tables<'_>) -> Result<Vec<Figure>> {
    let df = tables.numerator;
    let mut figure = Figure::new(
        figure_name(IkuCode::Iku21, "statistik"),
        student_title(
            IkuCode::Iku21,
            "Mahasiswa yang Mengikuti Kegiatan MBKM",
            format!("{} kegiatan MBKM", df.height()),
            tables,
        ),
    );

    if has_columns(df, "Total SKS", &["Total SKS"]) {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for sks in column_strings(df, "Total SKS")?.into_iter().flatten() {
            if let Some(sks) = parse_f64(&sks) {
                *counts.entry(sks_bin(sks)).or_default() += 1;
            }
        }
        let total: u32 = counts.values().sum();
        let bars: Vec<Bar> = SKS_BINS
            .iter()
            .filter_map(|(label, color)| {
                counts
                    .get(label)
                    .map(|count| Bar::new(*label, *count, *color))
            })
            .collect();
        figure.push(Panel::Bars(BarPanel::vertical(
            format!("Distribusi Total SKS MBKM\nTotal: {total} mahasiswa"),
            "Jumlah Mahasiswa",
            bars,
        )));
    }

    if has_columns(df, "Nama Kegiatan", &["Nama Kegiatan"]) {
        let mut top = value_counts(df, "Nama Kegiatan")?;
        top.truncate(10);
        let dominant = dominant_jurusan(
            &column_strings(df, "Nama Kegiatan")?,
            &row_jurusan(df, PROGRAM_STUDI)?,
        );
        let jurusan_of = |label: &str| dominant.get(label).copied().unwrap_or(Jurusan::Mipa);
        let bars = count_bars(
            &top,
            |_, label| jurusan_of(label).palette().base.to_string(),
            Some(45),
        );
        let legend = jurusan_legend(top.iter().map(|(label, _)| jurusan_of(label)));
        figure.push(Panel::Bars(
            BarPanel::horizontal(
                "Top 10 Nama Kegiatan MBKM\nTerbanyak Diikuti",
                "Jumlah Mahasiswa",
                bars,
            )
            .with_legend(legend),
        ));
    }

    Ok(vec![figure])
}

// IKU 22: competition level and placement. The achievement sheet has no
// program column; programs come from the student list by NIM.
pub(super) fn achievements(tables: &Tables<'_>) -> Result<Vec<Figure>> {
    let df = tables.numerator;
    let mut figure = Figure::new(
        figure_name(IkuCode::Iku22, "statistik"),
        student_title(
            IkuCode::Iku22,
            "Mahasiswa yang Meraih Prestasi",
            format!("{} prestasi", df.height()),
            tables,
        ),
    );

    if has_columns(df, "Tingkat", &["Tingkat"]) {
        let mut levels: Vec<(String, u32)> = Vec::new();
        for (label, count) in value_counts(df, "Tingkat")? {
            let label = strip_level_prefix(&label).to_string();
            match levels.iter_mut().find(|(name, _)| *name == label) {
                Some((_, total)) => *total += count,
                None => levels.push((label, count)),
            }
        }
        let order: Vec<&str> = LEVEL_COLORS.iter().map(|(label, _)| *label).collect();
        let slices: Vec<Slice> = in_order(levels, &order)
            .into_iter()
            .map(|(label, value)| Slice {
                color: color_of(&label, &LEVEL_COLORS),
                label,
                value,
            })
            .collect();
        let total: u32 = slices.iter().map(|slice| slice.value).sum();
        figure.push(Panel::Pie(PiePanel {
            title: format!("Distribusi Tingkat Prestasi\nTotal: {total} prestasi"),
            slices,
        }));
    }

    if has_columns(df, "Pencapaian", &["Pencapaian"]) {
        let order: Vec<&str> = RANK_COLORS.iter().map(|(label, _)| *label).collect();
        let counts = in_order(value_counts(df, "Pencapaian")?, &order);
        let mut panel = BarPanel::vertical(
            "Distribusi Pencapaian\nMahasiswa Berprestasi",
            "Jumlah Prestasi",
            count_bars(&counts, |_, label| color_of(label, &RANK_COLORS), None),
        );
        if has_columns(df, NIM, &[NIM])
            && has_columns(tables.denominator, PROGRAM_STUDI, &[NIM, PROGRAM_STUDI])
        {
            let programs = id_lookup(tables.denominator, NIM, PROGRAM_STUDI)?;
            let jurusan = column_strings(df, NIM)?
                .into_iter()
                .filter_map(|nim| {
                    nim.and_then(|nim| {
                        programs
                            .get(&nim)
                            .map(|program| jurusan_for(&normalize_program(program)))
                    })
                });
            panel = panel.with_legend(jurusan_legend(jurusan));
        }
        figure.push(Panel::Bars(panel));
    }

    Ok(vec![figure])
}

// IKU 23: every registration listed when there are few, otherwise counts per
// HKI type.
pub(super) fn intellectual_property(tables: &Tables<'_>) -> Result<Vec<Figure>> {
    let df = tables.numerator;
    let total = df.height();
    let mut figure = Figure::new(
        figure_name(IkuCode::Iku23, "statistik"),
        format!(
            "IKU 23: Statistik Summary - Mahasiswa yang Memiliki HKI\nTotal: {total} HKI ({:.2}% dari {} mahasiswa FST)",
            tables.share(),
            tables.denominator.height()
        ),
    );
    if !has_columns(df, "Jenis HKI", &["Jenis HKI", PROGRAM_STUDI]) {
        return Ok(vec![figure]);
    }

    let jurusan = row_jurusan(df, PROGRAM_STUDI)?;
    if total <= DETAIL_LIMIT {
        figure.push(Panel::Bars(detail_panel(df, &jurusan)?));
    } else {
        let counts = value_counts(df, "Jenis HKI")?;
        let dominant = dominant_jurusan(&column_strings(df, "Jenis HKI")?, &jurusan);
        let jurusan_of = |label: &str| dominant.get(label).copied().unwrap_or(Jurusan::Mipa);
        let bars = count_bars(
            &counts,
            |_, label| jurusan_of(label).palette().base.to_string(),
            None,
        );
        let legend = jurusan_legend(counts.iter().map(|(label, _)| jurusan_of(label)));
        figure.push(Panel::Bars(
            BarPanel::horizontal("Distribusi Jenis HKI", "Jumlah HKI", bars).with_legend(legend),
        ));
    }
    Ok(vec![figure])
}

fn detail_panel(df: &DataFrame, jurusan: &[Option<Jurusan>]) -> Result<BarPanel> {
    let text = |column: &str| -> Result<Vec<String>> {
        if df.get_column_index(column).is_none() {
            return Ok(vec!["-".to_string(); df.height()]);
        }
        Ok(column_strings(df, column)?
            .into_iter()
            .map(|value| value.unwrap_or_else(|| "-".to_string()))
            .collect())
    };
    let kinds = text("Jenis HKI")?;
    let titles = text("Nama HKI")?;
    let levels = text("Tingkat")?;
    let names = text("Nama")?;
    let programs = text(PROGRAM_STUDI)?;

    let mut order: Vec<usize> = (0..df.height()).collect();
    order.sort_by(|a, b| {
        kinds[*b]
            .cmp(&kinds[*a])
            .then_with(|| titles[*a].cmp(&titles[*b]))
    });

    let bars: Vec<Bar> = order
        .iter()
        .map(|idx| {
            let idx = *idx;
            let title = if titles[idx].chars().count() > 50 {
                ellipsize(&titles[idx], 47)
            } else {
                titles[idx].clone()
            };
            let label = format!(
                "{title}\n[{} | {}] - {} ({})",
                kinds[idx],
                levels[idx],
                names[idx],
                normalize_program(&programs[idx])
            );
            let color = jurusan[idx].unwrap_or(Jurusan::Mipa).palette().base;
            Bar::new(label, 1, color)
        })
        .collect();

    let mut info = vec![format!("Total: {} HKI", df.height()), String::new()];
    info.push("Jenis HKI:".to_string());
    for (kind, count) in value_counts(df, "Jenis HKI")? {
        info.push(format!("  • {kind}: {count}"));
    }

    Ok(
        BarPanel::horizontal("Detail HKI Mahasiswa", "Detail HKI", bars)
            .with_legend(jurusan_legend(jurusan.iter().flatten().copied()))
            .with_info(info),
    )
}
