//! Per-program bar charts (`IKU_<code>_horizontal`, `IKU_<code>_vertical`).
//!
//! Programs are grouped by jurusan in [`iku_model::JURUSAN_ORDER`], coloured
//! with the jurusan gradient and separated by a line between groups. A
//! dashed line marks the target.

use iku_common::{format_percent_short, wrap_text};
use iku_model::{
    ChartConfig, IkuCode, JURUSAN_ORDER, ProgramRow, assign_colors, sort_by_jurusan,
};

use crate::chart::{Chart, metric_heading};
use crate::error::Result;
use crate::layout::{
    self, Corner, GRID, LegendItem, Plot, SEPARATOR, nice_ticks, tick_label, y_axis_label,
};
use crate::svg::{Anchor, Canvas, Paint, TextStyle, VAlign, text_width};

const BAR_EDGE: &str = "#1a1a1a";
const WRAP_WIDTH: usize = 12;

/// Codes whose vertical chart keeps the legend in the upper left corner.
const LEGEND_LEFT: [IkuCode; 8] = [
    IkuCode::Iku1,
    IkuCode::Iku11,
    IkuCode::Iku12,
    IkuCode::Iku13,
    IkuCode::Iku2,
    IkuCode::Iku21,
    IkuCode::Iku22,
    IkuCode::Iku23,
];

/// Horizontal bars, one row per program; the first program is drawn at the
/// bottom and the legend lists jurusan bottom-up to match.
pub fn horizontal(code: IkuCode, rows: &[ProgramRow], config: &ChartConfig) -> Result<Chart> {
    let rows = sorted(rows);
    let colors = assign_colors(&rows);
    let size = f64::from(config.font_size);
    let label_size = size * 0.9;

    let mut canvas = Canvas::new(11.0, (rows.len() as f64 * 0.4).max(6.0), &config.font_family);
    let top = layout::title(&mut canvas, 14.0, &metric_heading(code, config), size * 1.3, size * 1.05);
    let label_width = rows
        .iter()
        .map(|row| text_width(&row.program, label_size))
        .fold(0.0, f64::max);
    let plot = Plot {
        left: (label_width + 20.0).min(canvas.width() * 0.4),
        top: top + 16.0,
        right: canvas.width() - 24.0,
        bottom: canvas.height() - 48.0,
    };
    canvas.text(
        plot.center_x(),
        canvas.height() - 14.0,
        &axis_label(code),
        &TextStyle::new(size).bold().centered(),
    );
    if rows.is_empty() {
        layout::no_data(&mut canvas, &plot, "No Data", size * 1.2);
        return Chart::new(chart_name(code, "horizontal"), canvas);
    }

    let target = code.target();
    let axis_max = axis_max(&rows, target);
    let x_of = |value: f64| plot.left + value / axis_max * plot.width();
    let tick_style = TextStyle::new(size * 0.85).centered().valign(VAlign::Top);
    for tick in nice_ticks(axis_max) {
        let x = x_of(tick);
        canvas.line(x, plot.top, x, plot.bottom, &Paint::stroke(GRID, 0.8).dotted());
        canvas.text(x, plot.bottom + 6.0, &tick_label(tick), &tick_style);
    }

    let band = plot.height() / rows.len() as f64;
    let value_style = TextStyle::new(size * 0.95).bold();
    let program_style = TextStyle::new(label_size).anchor(Anchor::End);
    for (idx, (row, color)) in rows.iter().zip(&colors).enumerate() {
        let cy = plot.bottom - band * (idx as f64 + 0.5);
        let height = band * 0.75;
        let width = x_of(row.percentage) - plot.left;
        canvas.rect(
            plot.left,
            cy - height / 2.0,
            width,
            height,
            &Paint::fill(*color).with_stroke(BAR_EDGE, 1.5).opacity(0.88),
        );
        canvas.text(plot.left + width + 4.0, cy, &value_label(code, row, " "), &value_style);
        canvas.text(plot.left - 6.0, cy, &row.program, &program_style);
    }
    for idx in group_starts(&rows) {
        let y = plot.bottom - band * idx as f64;
        canvas.line(plot.left, y, plot.right, y, &Paint::stroke(SEPARATOR, 1.5).opacity(0.6));
    }

    let x = x_of(target);
    canvas.line(x, plot.top, x, plot.bottom, &target_paint(config));
    plot.spines(&mut canvas);

    let mut items = jurusan_items(&rows);
    items.reverse();
    items.push(target_item(code, config));
    layout::legend(&mut canvas, &plot, Corner::UpperRight, &items, size * 0.85);

    Chart::new(chart_name(code, "horizontal"), canvas)
}

/// Vertical bars with program names wrapped under the axis.
pub fn vertical(code: IkuCode, rows: &[ProgramRow], config: &ChartConfig) -> Result<Chart> {
    let rows = sorted(rows);
    let colors = assign_colors(&rows);
    let size = f64::from(config.font_size);
    let label_size = size * 0.85;

    let labels: Vec<String> = rows
        .iter()
        .map(|row| wrap_text(&row.program, WRAP_WIDTH).join("\n"))
        .collect();
    let label_lines = labels
        .iter()
        .map(|label| label.lines().count())
        .max()
        .unwrap_or(1);

    let mut canvas = Canvas::new((rows.len() as f64).max(14.0), 7.0, &config.font_family);
    let top = layout::title(&mut canvas, 14.0, &metric_heading(code, config), size * 1.3, size * 1.05);
    let label_block = TextStyle::new(label_size).block_height(label_lines);
    let plot = Plot {
        left: 64.0,
        top: top + 16.0,
        right: canvas.width() - 24.0,
        bottom: canvas.height() - label_block - 24.0,
    };
    y_axis_label(&mut canvas, 18.0, &plot, &axis_label(code), size);
    if rows.is_empty() {
        layout::no_data(&mut canvas, &plot, "No Data", size * 1.2);
        return Chart::new(chart_name(code, "vertical"), canvas);
    }

    let target = code.target();
    let axis_max = axis_max(&rows, target);
    let y_of = |value: f64| plot.bottom - value / axis_max * plot.height();
    let tick_style = TextStyle::new(size * 0.85).anchor(Anchor::End);
    for tick in nice_ticks(axis_max) {
        let y = y_of(tick);
        canvas.line(plot.left, y, plot.right, y, &Paint::stroke(GRID, 0.8).dotted());
        canvas.text(plot.left - 6.0, y, &tick_label(tick), &tick_style);
    }

    let band = plot.width() / rows.len() as f64;
    let value_style = TextStyle::new(size * 0.85)
        .bold()
        .centered()
        .valign(VAlign::Bottom);
    let program_style = TextStyle::new(label_size).centered().valign(VAlign::Top);
    for (idx, ((row, color), label)) in rows.iter().zip(&colors).zip(&labels).enumerate() {
        let cx = plot.left + band * (idx as f64 + 0.5);
        let width = band * 0.75;
        let y = y_of(row.percentage);
        canvas.rect(
            cx - width / 2.0,
            y,
            width,
            plot.bottom - y,
            &Paint::fill(*color).with_stroke(BAR_EDGE, 1.5).opacity(0.88),
        );
        canvas.text(
            cx,
            y - plot.height() * 0.02,
            &value_label(code, row, "\n"),
            &value_style,
        );
        canvas.text(cx, plot.bottom + 6.0, label, &program_style);
    }
    for idx in group_starts(&rows) {
        let x = plot.left + band * idx as f64;
        canvas.line(x, plot.top, x, plot.bottom, &Paint::stroke(SEPARATOR, 1.5).opacity(0.6));
    }

    let y = y_of(target);
    canvas.line(plot.left, y, plot.right, y, &target_paint(config));
    plot.spines(&mut canvas);

    let mut items = jurusan_items(&rows);
    items.push(target_item(code, config));
    let corner = if LEGEND_LEFT.contains(&code) {
        Corner::UpperLeft
    } else {
        Corner::UpperRight
    };
    layout::legend(&mut canvas, &plot, corner, &items, size * 0.85);

    Chart::new(chart_name(code, "vertical"), canvas)
}

fn chart_name(code: IkuCode, orientation: &str) -> String {
    format!("IKU_{code}_{orientation}")
}

fn sorted(rows: &[ProgramRow]) -> Vec<ProgramRow> {
    let mut rows = rows.to_vec();
    sort_by_jurusan(&mut rows);
    rows
}

/// `max(largest value, target) × 1.15`
fn axis_max(rows: &[ProgramRow], target: f64) -> f64 {
    let max = rows
        .iter()
        .map(|row| row.percentage)
        .fold(target, f64::max);
    if max > 0.0 { max * 1.15 } else { 1.0 }
}

/// `40% (4/10)`, or the raw count for number-based metrics.
fn value_label(code: IkuCode, row: &ProgramRow, separator: &str) -> String {
    if code.is_number_based() {
        iku_common::format_numeric(row.percentage)
    } else {
        format!(
            "{}%{separator}({}/{})",
            format_percent_short(row.percentage),
            row.numerator,
            row.denominator
        )
    }
}

fn axis_label(code: IkuCode) -> String {
    if code.is_number_based() {
        format!("Jumlah {}", code.info().unit)
    } else {
        "Persentase (%)".to_string()
    }
}

/// Indices where a new jurusan group starts, excluding the first group.
fn group_starts(rows: &[ProgramRow]) -> Vec<usize> {
    rows.windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0].jurusan != pair[1].jurusan)
        .map(|(idx, _)| idx + 1)
        .collect()
}

fn jurusan_items(rows: &[ProgramRow]) -> Vec<LegendItem> {
    JURUSAN_ORDER
        .iter()
        .filter(|jurusan| rows.iter().any(|row| row.jurusan == **jurusan))
        .map(|jurusan| LegendItem::patch(jurusan.name(), jurusan.palette().base))
        .collect()
}

fn target_item(code: IkuCode, config: &ChartConfig) -> LegendItem {
    LegendItem::dashed(
        format!("Target ({})", code.target_label()),
        config.colors.target.as_str(),
    )
}

fn target_paint(config: &ChartConfig) -> Paint {
    Paint::stroke(config.colors.target.as_str(), f64::from(config.target_linewidth))
        .dashed()
        .opacity(0.95)
}
