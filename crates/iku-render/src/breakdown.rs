//! Drawing of breakdown [`Figure`]s.
//!
//! Panels are laid out left to right; each panel kind has its own preferred
//! size and the figure grows to fit them.

use iku_common::wrap_text;
use iku_core::{BarPanel, Figure, LegendEntry, Orientation, Panel, PiePanel, TablePanel};
use iku_model::ChartConfig;

use crate::chart::Chart;
use crate::error::Result;
use crate::layout::{
    self, AXIS, Corner, GRID, LegendItem, MUTED, Plot, SEPARATOR, nice_ticks, tick_label,
    y_axis_label,
};
use crate::svg::{
    Anchor, Canvas, POINTS_PER_INCH, Paint, TextStyle, VAlign, polar, text_width,
};

const BAR_EDGE: &str = "#1a1a1a";
const ROW_SHADE: &str = "#F2F2F2";

/// Draws every panel of `figure` under its title.
pub fn breakdown_figure(figure: &Figure, config: &ChartConfig) -> Result<Chart> {
    let size = f64::from(config.font_size);
    let sizes: Vec<(f64, f64)> = figure.panels.iter().map(panel_size).collect();
    let title_lines = figure.title.lines().count().max(1) as f64;
    let title_height = title_lines * 0.3 + 0.4;
    let width = sizes.iter().map(|(w, _)| w).sum::<f64>().max(6.0);
    let height = sizes.iter().map(|(_, h)| *h).fold(4.0, f64::max) + title_height;

    let mut canvas = Canvas::new(width, height, &config.font_family);
    let top = layout::title(&mut canvas, 14.0, &figure.title, size * 1.3, size * 1.05) + 10.0;

    let mut left = 0.0;
    for (panel, (panel_width, _)) in figure.panels.iter().zip(&sizes) {
        let region = Plot {
            left: left + 10.0,
            top,
            right: left + panel_width * POINTS_PER_INCH - 10.0,
            bottom: canvas.height() - 12.0,
        };
        match panel {
            Panel::Pie(pie) => draw_pie(&mut canvas, region, pie, size),
            Panel::Bars(bars) => match bars.orientation {
                Orientation::Horizontal => draw_horizontal(&mut canvas, region, bars, size),
                Orientation::Vertical => draw_vertical(&mut canvas, region, bars, size),
            },
            Panel::Table(table) => draw_table(&mut canvas, region, table, size),
            Panel::Message(message) => layout::no_data(&mut canvas, &region, message, size * 1.2),
        }
        left += panel_width * POINTS_PER_INCH;
    }

    Chart::new(figure.name.as_str(), canvas)
}

/// Preferred panel size in inches.
fn panel_size(panel: &Panel) -> (f64, f64) {
    match panel {
        Panel::Pie(_) => (7.0, 6.0),
        Panel::Bars(bars) => match bars.orientation {
            Orientation::Horizontal => {
                let lines = bars
                    .bars
                    .iter()
                    .map(|bar| bar.label.lines().count())
                    .max()
                    .unwrap_or(1) as f64;
                let annotated = bars.bars.iter().any(|bar| bar.annotation.is_some());
                let width = if annotated { 15.0 } else { 10.0 };
                (width, (bars.bars.len() as f64 * 0.45 * lines).max(5.0) + 1.0)
            }
            Orientation::Vertical => ((bars.bars.len() as f64 * 0.9).max(8.0), 6.0),
        },
        Panel::Table(table) => {
            let note = if table.note.is_some() { 0.4 } else { 0.0 };
            (12.0, (table.rows.len() + 1) as f64 * 0.3 + 1.2 + note)
        }
        Panel::Message(_) => (8.0, 4.0),
    }
}

/// Panel title; returns the y coordinate below it.
fn panel_title(canvas: &mut Canvas, region: &Plot, title: &str, size: f64) -> f64 {
    if title.is_empty() {
        return region.top;
    }
    let style = TextStyle::new(size * 1.05)
        .bold()
        .centered()
        .valign(VAlign::Top);
    canvas.text(region.center_x(), region.top, title, &style);
    region.top + style.block_height(title.lines().count()) + 8.0
}

fn legend_items(entries: &[LegendEntry]) -> Vec<LegendItem> {
    entries
        .iter()
        .map(|entry| LegendItem::patch(entry.label.as_str(), entry.color.as_str()))
        .collect()
}

fn draw_pie(canvas: &mut Canvas, region: Plot, pie: &PiePanel, size: f64) {
    let top = panel_title(canvas, &region, &pie.title, size);
    let area = Plot { top, ..region };
    let total = pie.total();
    if total == 0 {
        layout::no_data(canvas, &area, "No Data", size * 1.2);
        return;
    }

    let radius = area.width().min(area.height()) * 0.32;
    let center = (area.center_x(), (area.top + area.bottom) / 2.0);
    let label_style = TextStyle::new(size * 0.85).bold();
    let value_style = TextStyle::new(size * 0.8).bold().centered().color("white");
    let mut start = 0.0;
    for slice in &pie.slices {
        let sweep = f64::from(slice.value) / f64::from(total);
        canvas.sector(
            center,
            0.0,
            radius,
            start,
            sweep,
            &Paint::fill(slice.color.as_str()).with_stroke("white", 2.0),
        );
        let mid = start + sweep / 2.0;
        let (x, y) = polar(center.0, center.1, radius * 1.15, mid);
        let anchor = if x >= center.0 { Anchor::Start } else { Anchor::End };
        canvas.text(x, y, &slice.label, &label_style.clone().anchor(anchor));
        if sweep >= 0.04 {
            let (x, y) = polar(center.0, center.1, radius * 0.62, mid);
            canvas.text(
                x,
                y,
                &format!("{:.1}%\n({})", sweep * 100.0, slice.value),
                &value_style,
            );
        }
        start += sweep;
    }
}

fn draw_horizontal(canvas: &mut Canvas, region: Plot, panel: &BarPanel, size: f64) {
    let top = panel_title(canvas, &region, &panel.title, size);
    let label_size = size * 0.85;
    let label_width = panel
        .bars
        .iter()
        .map(|bar| text_width(&bar.label, label_size))
        .fold(0.0, f64::max)
        .min(region.width() * 0.4);
    let annotated = panel.bars.iter().any(|bar| bar.annotation.is_some());
    let plot = Plot {
        left: region.left + label_width + 14.0,
        top: top + 6.0,
        right: region.right - if annotated { region.width() * 0.38 } else { 30.0 },
        bottom: region.bottom - 40.0,
    };
    if panel.bars.is_empty() {
        layout::no_data(canvas, &plot, "No Data", size * 1.2);
        return;
    }

    let axis_max = f64::from(panel.max_value().max(1)) * 1.15;
    let x_of = |value: f64| plot.left + value / axis_max * plot.width();
    let tick_style = TextStyle::new(size * 0.8).centered().valign(VAlign::Top);
    for tick in nice_ticks(axis_max) {
        let x = x_of(tick);
        canvas.line(x, plot.top, x, plot.bottom, &Paint::stroke(GRID, 0.8).dotted());
        canvas.text(x, plot.bottom + 6.0, &tick_label(tick), &tick_style);
    }

    let band = plot.height() / panel.bars.len() as f64;
    let value_style = TextStyle::new(size * 0.85).bold();
    let note_style = TextStyle::new(size * 0.7).color(MUTED);
    let label_style = TextStyle::new(label_size).anchor(Anchor::End);
    for (idx, bar) in panel.bars.iter().enumerate() {
        let cy = plot.top + band * (idx as f64 + 0.5);
        let height = (band * 0.7).min(36.0);
        let end = x_of(f64::from(bar.value));
        canvas.rect(
            plot.left,
            cy - height / 2.0,
            end - plot.left,
            height,
            &Paint::fill(bar.color.as_str()).with_stroke(BAR_EDGE, 0.8),
        );
        let value = bar.value.to_string();
        canvas.text(end + 4.0, cy, &value, &value_style);
        if let Some(annotation) = &bar.annotation {
            let x = end + 12.0 + text_width(&value, value_style.size());
            canvas.text(x, cy, annotation, &note_style);
        }
        canvas.text(plot.left - 6.0, cy, &bar.label, &label_style);
    }
    for idx in &panel.separators {
        let y = plot.top + band * *idx as f64;
        canvas.line(
            plot.left,
            y,
            region.right,
            y,
            &Paint::stroke(SEPARATOR, 1.2).dashed().opacity(0.6),
        );
    }
    plot.spines(canvas);
    if !panel.axis_label.is_empty() {
        canvas.text(
            plot.center_x(),
            region.bottom - 6.0,
            &panel.axis_label,
            &TextStyle::new(size * 0.9).bold().centered(),
        );
    }

    let legend_area = Plot {
        right: region.right,
        ..plot
    };
    layout::legend(
        canvas,
        &legend_area,
        Corner::UpperRight,
        &legend_items(&panel.legend),
        size * 0.8,
    );
    info_box(canvas, &legend_area, &panel.info, size * 0.75);
}

fn draw_vertical(canvas: &mut Canvas, region: Plot, panel: &BarPanel, size: f64) {
    let top = panel_title(canvas, &region, &panel.title, size);
    let label_size = size * 0.8;
    let labels: Vec<String> = panel
        .bars
        .iter()
        .map(|bar| {
            if bar.label.contains('\n') {
                bar.label.clone()
            } else {
                wrap_text(&bar.label, 12).join("\n")
            }
        })
        .collect();
    let label_lines = labels
        .iter()
        .map(|label| label.lines().count())
        .max()
        .unwrap_or(1);
    let plot = Plot {
        left: region.left + 50.0,
        top: top + 6.0,
        right: region.right - 16.0,
        bottom: region.bottom - TextStyle::new(label_size).block_height(label_lines) - 12.0,
    };
    if panel.bars.is_empty() {
        layout::no_data(canvas, &plot, "No Data", size * 1.2);
        return;
    }
    if !panel.axis_label.is_empty() {
        y_axis_label(canvas, region.left + 12.0, &plot, &panel.axis_label, size * 0.9);
    }

    let axis_max = f64::from(panel.max_value().max(1)) * 1.15;
    let y_of = |value: f64| plot.bottom - value / axis_max * plot.height();
    let tick_style = TextStyle::new(size * 0.8).anchor(Anchor::End);
    for tick in nice_ticks(axis_max) {
        let y = y_of(tick);
        canvas.line(plot.left, y, plot.right, y, &Paint::stroke(GRID, 0.8).dotted());
        canvas.text(plot.left - 6.0, y, &tick_label(tick), &tick_style);
    }

    let band = plot.width() / panel.bars.len() as f64;
    let value_style = TextStyle::new(size * 0.85)
        .bold()
        .centered()
        .valign(VAlign::Bottom);
    let label_style = TextStyle::new(label_size).centered().valign(VAlign::Top);
    for (idx, (bar, label)) in panel.bars.iter().zip(&labels).enumerate() {
        let cx = plot.left + band * (idx as f64 + 0.5);
        let width = (band * 0.7).min(60.0);
        let y = y_of(f64::from(bar.value));
        canvas.rect(
            cx - width / 2.0,
            y,
            width,
            plot.bottom - y,
            &Paint::fill(bar.color.as_str()).with_stroke(BAR_EDGE, 0.8),
        );
        canvas.text(cx, y - 4.0, &bar.value.to_string(), &value_style);
        canvas.text(cx, plot.bottom + 6.0, label, &label_style);
    }
    for idx in &panel.separators {
        let x = plot.left + band * *idx as f64;
        canvas.line(
            x,
            plot.top,
            x,
            plot.bottom,
            &Paint::stroke(SEPARATOR, 1.2).dashed().opacity(0.6),
        );
    }
    plot.spines(canvas);
    layout::legend(
        canvas,
        &plot,
        Corner::UpperRight,
        &legend_items(&panel.legend),
        size * 0.8,
    );
    info_box(canvas, &plot, &panel.info, size * 0.75);
}

/// Boxed text lines in the lower right corner of `plot`.
fn info_box(canvas: &mut Canvas, plot: &Plot, lines: &[String], size: f64) {
    if lines.is_empty() {
        return;
    }
    let text = lines.join("\n");
    let style = TextStyle::new(size).valign(VAlign::Top);
    let pad = size * 0.6;
    let width = text_width(&text, size) + pad * 2.0;
    let height = style.block_height(lines.len()) + pad * 2.0;
    let x = plot.right - width - pad;
    let y = plot.bottom - height - pad;
    canvas.rect(
        x,
        y,
        width,
        height,
        &Paint::fill("#FFFBEA").with_stroke(MUTED, 0.8).rounded(4.0),
    );
    canvas.text(x + pad, y + pad, &text, &style);
}

fn draw_table(canvas: &mut Canvas, region: Plot, table: &TablePanel, size: f64) {
    let top = panel_title(canvas, &region, &table.title, size);
    let text_size = size * 0.8;
    let row_height = text_size * 1.9;
    let pad = text_size * 0.5;

    let natural: Vec<f64> = table
        .headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            table
                .rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| text_width(cell, text_size))
                .fold(text_width(header, text_size), f64::max)
                + pad * 2.0
        })
        .collect();
    let total: f64 = natural.iter().sum();
    let scale = if total > 0.0 {
        region.width() / total
    } else {
        1.0
    };
    let widths: Vec<f64> = natural.iter().map(|width| width * scale).collect();

    let header_style = TextStyle::new(text_size).bold().color("white");
    let cell_style = TextStyle::new(text_size);
    let mut y = top + 4.0;
    let mut x = region.left;
    for (header, width) in table.headers.iter().zip(&widths) {
        canvas.rect(
            x,
            y,
            *width,
            row_height,
            &Paint::fill(table.header_color.as_str()).with_stroke("white", 0.8),
        );
        canvas.text(x + pad, y + row_height / 2.0, header, &header_style);
        x += width;
    }
    for (idx, row) in table.rows.iter().enumerate() {
        y += row_height;
        let shade = if idx % 2 == 0 { "white" } else { ROW_SHADE };
        let mut x = region.left;
        for (cell, width) in row.iter().zip(&widths) {
            canvas.rect(
                x,
                y,
                *width,
                row_height,
                &Paint::fill(shade).with_stroke("#CCCCCC", 0.5),
            );
            canvas.text(x + pad, y + row_height / 2.0, cell, &cell_style);
            x += width;
        }
    }
    canvas.line(
        region.left,
        y + row_height,
        region.right,
        y + row_height,
        &Paint::stroke(AXIS, 0.8),
    );
    if let Some(note) = &table.note {
        canvas.text(
            region.left,
            y + row_height + 14.0,
            note,
            &TextStyle::new(text_size * 0.9).italic().color(MUTED),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iku_core::{Bar, Slice};

    fn config() -> ChartConfig {
        ChartConfig::default()
    }

    #[test]
    fn test_pie_and_bars_side_by_side() {
        let mut figure = Figure::new("IKU_11_breakdown_statistik", "IKU 11: Statistik\nTotal: 3");
        figure.push(Panel::Pie(PiePanel {
            title: "Masa Tunggu".to_string(),
            slices: vec![
                Slice {
                    label: "< 6 Bulan".to_string(),
                    value: 2,
                    color: "#70AD47".to_string(),
                },
                Slice {
                    label: "> 6 Bulan".to_string(),
                    value: 1,
                    color: "#ED7D31".to_string(),
                },
            ],
        }));
        figure.push(Panel::Bars(BarPanel::vertical(
            "Per Semester",
            "Jumlah",
            vec![Bar::new("2023/1", 2, "#2E75B6"), Bar::new("2023/2", 1, "#9DC3E6")],
        )));

        let chart = breakdown_figure(&figure, &config()).unwrap();
        assert_eq!(chart.name, "IKU_11_breakdown_statistik");
        // 7in pie + 8in bars.
        assert!(chart.svg.contains("width=\"1080\""));
        assert!(chart.svg.contains("&lt; 6 Bulan"));
        assert!(chart.svg.contains(">66.7%<"));
        assert!(chart.svg.contains(">2023/1<"));
    }

    #[test]
    fn test_annotated_bars_with_legend_and_info() {
        let mut figure = Figure::new("IKU_31_breakdown_dosen_annotated", "Dosen");
        figure.push(Panel::Bars(
            BarPanel::horizontal(
                "",
                "Jumlah Dosen Aktif",
                vec![Bar::new("Kimia", 2, "#5B9BD5").annotated("Ani, Budi")],
            )
            .with_legend(vec![LegendEntry {
                label: "MIPA".to_string(),
                color: "#5B9BD5".to_string(),
            }])
            .with_separators(vec![1])
            .with_info(vec!["Total: 2".to_string()]),
        ));
        let chart = breakdown_figure(&figure, &config()).unwrap();
        assert!(chart.svg.contains(">Ani, Budi<"));
        assert!(chart.svg.contains(">MIPA<"));
        assert!(chart.svg.contains(">Total: 2<"));
        assert!(chart.svg.contains(">Jumlah Dosen Aktif<"));
    }

    #[test]
    fn test_table_and_message() {
        let mut figure = Figure::new("IKU_42_breakdown_tabel_praktisi", "Praktisi");
        figure.push(Panel::Table(TablePanel {
            title: String::new(),
            headers: vec!["No".to_string(), "Nama Dosen".to_string()],
            rows: vec![vec!["1".to_string(), "Ani".to_string()]],
            header_color: "#5B9BD5".to_string(),
            note: Some("* Menampilkan 1 dari 1 praktisi".to_string()),
        }));
        figure.push(Panel::Message("No Data".to_string()));
        let chart = breakdown_figure(&figure, &config()).unwrap();
        assert!(chart.svg.contains(">Nama Dosen<"));
        assert!(chart.svg.contains(">Ani<"));
        assert!(chart.svg.contains("* Menampilkan 1 dari 1 praktisi"));
        assert!(chart.svg.contains(">No Data<"));
    }

    #[test]
    fn test_empty_pie_shows_placeholder() {
        let mut figure = Figure::new("IKU_22_breakdown_statistik", "Prestasi");
        figure.push(Panel::Pie(PiePanel {
            title: "Tingkat".to_string(),
            slices: Vec::new(),
        }));
        let chart = breakdown_figure(&figure, &config()).unwrap();
        assert!(chart.svg.contains(">No Data<"));
    }
}
