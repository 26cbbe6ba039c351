//! Faculty-level dashboards: the summary of every processed metric and the
//! overall achievement of the eight combined indicators.
//!
//! Every overall variant places the indicators `1`..`8` in the same order;
//! an indicator without results shows `IKU <code>\nNo Data`.

use iku_common::{format_fraction, format_numeric, wrap_text};
use iku_model::{
    Achievement, BULLET_ON_TRACK, COMBINED_IKU, ChartConfig, DONUT_ON_TRACK, DashboardVariant,
    IkuCode, OverallStats,
};

use crate::chart::Chart;
use crate::donut::{DonutFrame, DualRing, GAP, Status, difference, effective_target, put};
use crate::error::Result;
use crate::layout::{self, AXIS, LegendItem, MUTED, Plot, nice_ticks, tick_label};
use crate::svg::{Anchor, Canvas, Paint, TextStyle, VAlign, text_width};

const GREEN: &str = "#2E7D32";
const YELLOW: &str = "#F9A825";
const RED: &str = "#C62828";
const BADGE: &str = "#424242";
const EMPTY_CELL: &str = "#e0e0e0";
const NO_DATA: &str = "#999999";

/// Ring colours of the summary dashboard; other codes use [`SUMMARY_DEFAULT`].
const SUMMARY_COLORS: [(IkuCode, &str); 14] = [
    (IkuCode::Iku1, "#5B9BD5"),
    (IkuCode::Iku11, "#5B9BD5"),
    (IkuCode::Iku12, "#70AD47"),
    (IkuCode::Iku13, "#ED7D31"),
    (IkuCode::Iku2, "#9966CC"),
    (IkuCode::Iku21, "#9966CC"),
    (IkuCode::Iku22, "#E85D75"),
    (IkuCode::Iku23, "#7F8C8D"),
    (IkuCode::Iku3, "#5B9BD5"),
    (IkuCode::Iku31, "#5B9BD5"),
    (IkuCode::Iku33, "#70AD47"),
    (IkuCode::Iku4, "#ED7D31"),
    (IkuCode::Iku41, "#ED7D31"),
    (IkuCode::Iku42, "#9966CC"),
];
const SUMMARY_DEFAULT: &str = "#70AD47";

/// One donut per metric (`IKU_summary_dashboard`).
pub fn summary_dashboard(stats: &[(IkuCode, OverallStats)], config: &ChartConfig) -> Result<Chart> {
    let panels = stats.len().max(1);
    let mut canvas = Canvas::new(3.5 * panels as f64, 6.0, &config.font_family);
    let heading = format!("Ringkasan Pencapaian IKU\n{}", config.faculty);
    let top = layout::title(&mut canvas, 10.0, &heading, 12.0, 12.0) + 10.0;

    let panel_width = canvas.width() / panels as f64;
    let title_style = TextStyle::new(9.0).bold().centered().valign(VAlign::Top);
    for (idx, (code, metric)) in stats.iter().enumerate() {
        let cx = panel_width * (idx as f64 + 0.5);
        let title = format!("IKU {code}\n{}", wrap_text(code.info().title, 28).join("\n"));
        canvas.text(cx, top, &title, &title_style);
        let title_height = title_style.block_height(title.lines().count());

        let radius = (panel_width * 0.42).min((canvas.height() - top - title_height - 30.0) / 2.0);
        let center = (cx, top + title_height + 16.0 + radius);
        let color = SUMMARY_COLORS
            .iter()
            .find(|(known, _)| known == code)
            .map_or(SUMMARY_DEFAULT, |(_, color)| *color);
        let share = (metric.percentage / 100.0).clamp(0.0, 1.0);
        let edge = |fill: &str| Paint::fill(fill).with_stroke("white", 2.5);
        let hole = radius * 0.65;
        canvas.sector(center, hole, radius, 0.0, 1.0, &edge("#E8E8E8"));
        canvas.sector(center, hole, radius, 0.0, share, &edge(color));

        canvas.text(
            center.0,
            center.1 - radius * 0.08,
            &format!("{:.1}%", metric.percentage),
            &TextStyle::new(24.0).bold().centered().color("#333333"),
        );
        canvas.text(
            center.0,
            center.1 + radius * 0.22,
            &format_fraction(metric.numerator, metric.denominator),
            &TextStyle::new(9.0).centered().color(MUTED),
        );
    }

    Chart::new("IKU_summary_dashboard", canvas)
}

/// Overall achievement of the combined indicators in one of the
/// [`DashboardVariant`] layouts (`IKU_overall_achievement_<variant>`).
pub fn overall_achievement(
    variant: DashboardVariant,
    stats: &[(IkuCode, OverallStats)],
    config: &ChartConfig,
) -> Result<Chart> {
    let gauges: Vec<(IkuCode, Option<Gauge>)> = COMBINED_IKU
        .iter()
        .map(|code| {
            let gauge = stats
                .iter()
                .find(|(known, _)| known == code)
                .map(|(_, stats)| Gauge::new(*code, stats));
            (*code, gauge)
        })
        .collect();

    let canvas = match variant {
        DashboardVariant::Grid4x2 => grid_4x2(&gauges, config),
        DashboardVariant::Bullet => bullet(&gauges, config),
        DashboardVariant::Cards => cards(&gauges, config),
        DashboardVariant::Bullet4x2 => bullet_4x2(&gauges, config),
        DashboardVariant::Thermometer => thermometer(&gauges, config),
        DashboardVariant::Waffle => waffle(&gauges, config),
    };
    Chart::new(variant.file_name(), canvas)
}

/// Display values of one combined indicator.
#[derive(Debug, Clone, PartialEq)]
struct Gauge {
    stats: OverallStats,
    /// Percentage compared against `target`.
    pct: f64,
    target: f64,
    /// Headline value: the percentage, or the absolute count for
    /// number-based indicators.
    value: String,
    /// `n/d`, or the absolute target.
    detail: String,
}

impl Gauge {
    fn new(code: IkuCode, stats: &OverallStats) -> Self {
        let target = effective_target(code, stats);
        let (value, detail) = if stats.number_based {
            let value = if code == IkuCode::Iku6 {
                format!("{:.2}", stats.numerator)
            } else {
                format_numeric(stats.numerator)
            };
            let goal = if code == IkuCode::Iku6 {
                "2/prodi".to_string()
            } else {
                format_numeric(code.target())
            };
            (value, format!("Target: {goal}"))
        } else {
            (
                format!("{:.1}%", stats.percentage),
                format_fraction(stats.numerator, stats.denominator),
            )
        };
        Self {
            stats: *stats,
            pct: stats.percentage,
            target,
            value,
            detail,
        }
    }

    fn achievement(&self, on_track_ratio: f64) -> Achievement {
        self.stats.achievement(self.target, on_track_ratio)
    }

    /// Colour and arrow of the bullet-style layouts.
    fn tone(&self) -> (&'static str, &'static str) {
        match self.achievement(BULLET_ON_TRACK) {
            Achievement::Achieved => (GREEN, "▲"),
            Achievement::OnTrack => (YELLOW, "▶"),
            Achievement::Gap => (RED, "▼"),
        }
    }
}

/// A sub-area of the figure; positions are fractions with y pointing up.
#[derive(Debug, Clone, Copy)]
struct Cell {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl Cell {
    fn at(&self, fx: f64, fy: f64) -> (f64, f64) {
        (self.x + fx * self.w, self.y + (1.0 - fy) * self.h)
    }

    fn min_side(&self) -> f64 {
        self.w.min(self.h)
    }
}

/// Splits the area between the margins into 4 × 2 cells, row-major.
fn cells(canvas: &Canvas, top: f64, bottom: f64, gap: f64) -> Vec<Cell> {
    let left = canvas.width() * 0.02;
    let width = (canvas.width() * 0.96 - gap * 3.0) / 4.0;
    let height = (bottom - top - gap) / 2.0;
    (0..8)
        .map(|idx| Cell {
            x: left + (idx % 4) as f64 * (width + gap),
            y: top + (idx / 4) as f64 * (height + gap),
            w: width,
            h: height,
        })
        .collect()
}

fn header(canvas: &mut Canvas, config: &ChartConfig, style: Option<&str>) -> f64 {
    let subtitle = match style {
        Some(style) => format!("{} | {style}", config.university_year()),
        None => config.university_year(),
    };
    let heading = format!("CAPAIAN IKU {}\n{subtitle}", config.faculty.to_uppercase());
    layout::title(canvas, 16.0, &heading, 20.0, 14.0) + 12.0
}

fn footer(canvas: &mut Canvas, text: &str) -> f64 {
    let y = canvas.height() - 16.0;
    canvas.text(
        canvas.width() / 2.0,
        y,
        text,
        &TextStyle::new(11.0).centered().color(MUTED),
    );
    y - 20.0
}

fn no_data(canvas: &mut Canvas, cell: &Cell, code: IkuCode) {
    put(
        canvas,
        cell.at(0.5, 0.5),
        &format!("IKU {code}\nNo Data"),
        &TextStyle::new(14.0).bold().centered().color(NO_DATA),
    );
}

/// Dark `IKU <code>` tag whose top-left corner sits at `(x, y)`.
fn tag(canvas: &mut Canvas, (x, y): (f64, f64), code: IkuCode, size: f64) {
    let text = format!("IKU {code}");
    let width = text_width(&text, size) + size;
    let height = size * 1.7;
    canvas.badge(
        x + width / 2.0,
        y + height / 2.0,
        &text,
        &TextStyle::new(size).bold().color("white"),
        &Paint::fill(BADGE),
    );
}

/// White status text on a coloured box centred at `(x, y)`.
fn status_badge(canvas: &mut Canvas, (x, y): (f64, f64), text: &str, color: &str, size: f64) {
    canvas.badge(
        x,
        y,
        text,
        &TextStyle::new(size).bold().color("white"),
        &Paint::fill(color).opacity(0.95),
    );
}

fn grid_4x2(gauges: &[(IkuCode, Option<Gauge>)], config: &ChartConfig) -> Canvas {
    let mut canvas = Canvas::new(20.0, 12.0, &config.font_family);
    let top = header(&mut canvas, config, None);
    let bottom = footer(
        &mut canvas,
        "■ Target (Outer Ring)    ■ Realisasi (Inner Ring)    |    Green = Achieved    Yellow = On Track    Red = Gap",
    );
    let ring = DualRing {
        outer: 1.15,
        outer_width: 0.12,
        inner: 0.98,
        inner_width: 0.18,
        outer_track: "#E8E8E8",
        hole: None,
    };

    for ((code, gauge), cell) in gauges.iter().zip(cells(&canvas, top, bottom, 24.0)) {
        let Some(gauge) = gauge else {
            no_data(&mut canvas, &cell, *code);
            continue;
        };
        // Cell extent in donut units: x ∈ [-1.5, 1.5], y ∈ [-2.3, 1.3].
        let unit = (cell.w / 3.0).min(cell.h / 3.6);
        let frame = DonutFrame {
            cx: cell.x + cell.w / 2.0,
            cy: cell.y + (cell.h - 3.6 * unit) / 2.0 + 1.3 * unit,
            unit,
        };

        let achievement = gauge.achievement(DONUT_ON_TRACK);
        let status = match achievement {
            Achievement::Achieved => Status {
                label: achievement.label(),
                ..Status::achieved()
            },
            Achievement::OnTrack => Status::on_track(achievement.label()),
            Achievement::Gap => Status::gap(GAP),
        };
        let (target_turn, actual_turn) = if gauge.stats.number_based {
            let target = if gauge.pct > 0.0 {
                (100.0 / gauge.pct).min(1.0)
            } else {
                1.0
            };
            (target, 1.0)
        } else {
            (gauge.target / 100.0, gauge.pct / 100.0)
        };
        ring.draw(&mut canvas, &frame, target_turn, actual_turn, status.fill);

        put(
            &mut canvas,
            frame.at(0.0, 0.08),
            &gauge.value,
            &TextStyle::new(28.0).bold().centered().color("#333333"),
        );
        put(
            &mut canvas,
            frame.at(0.0, -0.25),
            &gauge.detail,
            &TextStyle::new(11.0).bold().centered().color(MUTED),
        );
        let (x, y) = frame.at(0.0, 0.75);
        canvas.badge(
            x,
            y,
            &format!("IKU {code}"),
            &TextStyle::new(14.0).bold().color("#333333"),
            &Paint::fill("white").with_stroke("#CCCCCC", 1.5),
        );
        put(
            &mut canvas,
            frame.at(0.0, -1.45),
            &code.info().label.join("\n"),
            &TextStyle::new(11.0).bold().centered().color("#333333"),
        );
        let (x, y) = frame.at(0.0, -1.88);
        canvas.badge(
            x,
            y,
            &format!("{} {}", status.label, difference(gauge.pct, gauge.target)),
            &TextStyle::new(12.0).bold().color(status.text),
            &Paint::fill(status.background).with_stroke(status.text, 2.0),
        );
    }
    canvas
}

fn bullet(gauges: &[(IkuCode, Option<Gauge>)], config: &ChartConfig) -> Canvas {
    const AXIS_MAX: f64 = 220.0;
    const RANGES: [&str; 3] = ["#f0f0f0", "#d9d9d9", "#bdbdbd"];

    let mut canvas = Canvas::new(16.0, 10.0, &config.font_family);
    let top = header(&mut canvas, config, None);
    let legend_y = canvas.height() - 20.0;
    let plot = Plot {
        left: 230.0,
        top,
        right: canvas.width() - 30.0,
        bottom: legend_y - 50.0,
    };
    let x_of = |value: f64| plot.left + value.min(AXIS_MAX) / AXIS_MAX * plot.width();

    let tick_style = TextStyle::new(10.0).centered().valign(VAlign::Top);
    for tick in nice_ticks(150.0) {
        let x = x_of(tick);
        canvas.line(x, plot.top, x, plot.bottom, &Paint::stroke(layout::GRID, 0.8).dashed().opacity(0.6));
        canvas.text(x, plot.bottom + 6.0, &tick_label(tick), &tick_style);
    }
    canvas.text(
        plot.center_x(),
        plot.bottom + 30.0,
        "Persentase Capaian (%)",
        &TextStyle::new(12.0).bold().centered(),
    );

    let band = plot.height() / gauges.len().max(1) as f64;
    let label_style = TextStyle::new(11.0).bold().anchor(Anchor::End);
    for (idx, (code, gauge)) in gauges.iter().enumerate() {
        let cy = plot.top + band * (idx as f64 + 0.5);
        let label = format!("IKU {code}: {}", code.info().label.join("\n"));
        canvas.text(plot.left - 10.0, cy, &label, &label_style);
        let Some(gauge) = gauge else {
            canvas.text(
                x_of(50.0),
                cy,
                "No Data",
                &TextStyle::new(11.0).italic().centered().color(NO_DATA),
            );
            continue;
        };

        let (color, _) = gauge.tone();
        let max_range = 150f64.max(gauge.pct + 20.0);
        let range_height = band * 0.9;
        for (share, fill) in [1.0, 0.75, 0.5].iter().zip(RANGES.iter().rev()) {
            let width = x_of(max_range * share) - plot.left;
            canvas.rect(plot.left, cy - range_height / 2.0, width, range_height, &Paint::fill(*fill));
        }
        let bar_height = band * 0.36;
        let end = x_of(gauge.pct.min(max_range));
        canvas.rect(
            plot.left,
            cy - bar_height / 2.0,
            end - plot.left,
            bar_height,
            &Paint::fill(color).with_stroke(AXIS, 1.0),
        );
        let x = x_of(gauge.target);
        canvas.line(x, cy - band * 0.45, x, cy + band * 0.45, &Paint::stroke(AXIS, 3.0));
        canvas.text(end + 6.0, cy, &gauge.value, &TextStyle::new(12.0).bold().color(color));

        let badge_x = x_of(max_range + 25.0);
        let status = gauge.achievement(BULLET_ON_TRACK).label();
        let badge_width = text_width(status, 10.0) + 10.0;
        status_badge(&mut canvas, (badge_x + badge_width / 2.0, cy), status, color, 10.0);
        let note = if gauge.stats.number_based {
            gauge.detail.clone()
        } else {
            format!("({})", gauge.detail)
        };
        canvas.text(
            badge_x + badge_width + 10.0,
            cy,
            &note,
            &TextStyle::new(9.0).color(MUTED),
        );
    }
    plot.spines(&mut canvas);

    legend_row(
        &mut canvas,
        legend_y,
        &[
            LegendItem::patch("Poor (<50%)", RANGES[0]),
            LegendItem::patch("Satisfactory (50-75%)", RANGES[1]),
            LegendItem::patch("Good (>75%)", RANGES[2]),
            LegendItem::dashed("Target", AXIS),
            LegendItem::patch("Achieved", GREEN),
            LegendItem::patch("On Track", YELLOW),
            LegendItem::patch("Gap", RED),
        ],
        9.0,
    );
    canvas
}

/// Legend laid out on a single centred row.
fn legend_row(canvas: &mut Canvas, y: f64, items: &[LegendItem], size: f64) {
    let swatch = size * 1.4;
    let spacing = size * 1.5;
    let widths: Vec<f64> = items
        .iter()
        .map(|item| swatch + size * 0.5 + text_width(&item.label, size))
        .collect();
    let total = widths.iter().sum::<f64>() + spacing * items.len().saturating_sub(1) as f64;
    let mut x = (canvas.width() - total) / 2.0;
    for (item, width) in items.iter().zip(widths) {
        if item.line {
            canvas.line(x, y, x + swatch, y, &Paint::stroke(item.color.as_str(), 3.0));
        } else {
            canvas.rect(
                x,
                y - size * 0.45,
                swatch,
                size * 0.9,
                &Paint::fill(item.color.as_str()).with_stroke(NO_DATA, 0.5),
            );
        }
        canvas.text(x + swatch + size * 0.5, y, &item.label, &TextStyle::new(size));
        x += width + spacing;
    }
}

fn cards(gauges: &[(IkuCode, Option<Gauge>)], config: &ChartConfig) -> Canvas {
    let mut canvas = Canvas::new(20.0, 12.0, &config.font_family);
    let top = header(&mut canvas, config, None);
    let bottom = footer(
        &mut canvas,
        "▲ Achieved (Green)    ▶ On Track (Yellow)    ▼ Gap (Red)    |    Progress bar shows achievement vs target",
    );

    for ((code, gauge), cell) in gauges.iter().zip(cells(&canvas, top, bottom, 28.0)) {
        canvas.rect(
            cell.x,
            cell.y,
            cell.w,
            cell.h,
            &Paint::fill("white").with_stroke(EMPTY_CELL, 2.0).rounded(12.0),
        );
        let Some(gauge) = gauge else {
            no_data(&mut canvas, &cell, *code);
            continue;
        };
        let (color, arrow) = gauge.tone();

        tag(&mut canvas, cell.at(0.06, 0.94), *code, 11.0);
        put(
            &mut canvas,
            cell.at(0.5, 0.76),
            &code.info().label.join("\n"),
            &TextStyle::new(10.0).bold().centered().color(BADGE),
        );
        put(
            &mut canvas,
            cell.at(0.5, 0.56),
            &gauge.value,
            &TextStyle::new(36.0).bold().centered().color(color),
        );
        put(
            &mut canvas,
            cell.at(0.5, 0.38),
            &gauge.detail,
            &TextStyle::new(12.0).centered().color(MUTED),
        );

        let (bar_x, bar_top) = cell.at(0.08, 0.28);
        let bar_width = cell.w * 0.84;
        let bar_height = cell.h * 0.06;
        let radius = bar_height / 3.0;
        canvas.rect(bar_x, bar_top, bar_width, bar_height, &Paint::fill(EMPTY_CELL).rounded(radius));
        let fill = (gauge.pct / gauge.target).clamp(0.0, 1.0);
        canvas.rect(
            bar_x,
            bar_top,
            bar_width * fill,
            bar_height,
            &Paint::fill(color).rounded(radius),
        );
        if !gauge.stats.number_based {
            let x = bar_x + bar_width * (gauge.target / 100.0);
            canvas.line(
                x,
                bar_top - cell.h * 0.02,
                x,
                bar_top + bar_height + cell.h * 0.02,
                &Paint::stroke(AXIS, 2.0),
            );
        }

        let status = gauge.achievement(BULLET_ON_TRACK).label();
        put(
            &mut canvas,
            cell.at(0.5, 0.08),
            &format!("{arrow} {status} {}", difference(gauge.pct, gauge.target)),
            &TextStyle::new(11.0).bold().centered().color(color),
        );
    }
    canvas
}

fn bullet_4x2(gauges: &[(IkuCode, Option<Gauge>)], config: &ChartConfig) -> Canvas {
    const RANGES: [(f64, &str); 3] = [(1.0, "#bdbdbd"), (0.7, "#e0e0e0"), (0.4, "#f5f5f5")];

    let mut canvas = Canvas::new(18.0, 8.0, &config.font_family);
    let top = header(&mut canvas, config, Some("Bullet Chart Style"));
    let bottom = footer(
        &mut canvas,
        "█ Achieved   █ On Track   █ Gap   |   ▌Target Line   |   Background: Poor → Satisfactory → Good",
    );

    for ((code, gauge), cell) in gauges.iter().zip(cells(&canvas, top, bottom, 28.0)) {
        let Some(gauge) = gauge else {
            no_data(&mut canvas, &cell, *code);
            continue;
        };
        let (color, _) = gauge.tone();
        put(
            &mut canvas,
            cell.at(0.5, 0.92),
            code.info().compact_label,
            &TextStyle::new(11.0).bold().centered().color("#333333"),
        );
        tag(&mut canvas, cell.at(0.02, 0.82), *code, 10.0);

        let max_value = 120f64.max(gauge.pct + 10.0);
        let axis_max = max_value + 25.0;
        let (left, cy) = cell.at(0.0, 0.42);
        let x_of = |value: f64| left + value / axis_max * cell.w;
        let band = cell.h * 0.4;
        for (share, fill) in RANGES {
            canvas.rect(
                left,
                cy - band * 0.35,
                x_of(max_value * share) - left,
                band * 0.7,
                &Paint::fill(fill),
            );
        }
        canvas.rect(
            left,
            cy - band * 0.175,
            x_of(gauge.pct.min(max_value)) - left,
            band * 0.35,
            &Paint::fill(color).with_stroke(AXIS, 0.5),
        );
        let x = x_of(gauge.target);
        canvas.line(x, cy - band * 0.4, x, cy + band * 0.4, &Paint::stroke(AXIS, 3.0));
        canvas.text(
            x_of(max_value + 2.0),
            cy,
            &gauge.value,
            &TextStyle::new(14.0).bold().color(color),
        );

        let status = gauge.achievement(BULLET_ON_TRACK).label();
        status_badge(&mut canvas, cell.at(0.5, 0.1), status, color, 9.0);
    }
    canvas
}

fn thermometer(gauges: &[(IkuCode, Option<Gauge>)], config: &ChartConfig) -> Canvas {
    let mut canvas = Canvas::new(18.0, 12.0, &config.font_family);
    let top = header(&mut canvas, config, Some("Thermometer Style"));
    let bottom = footer(
        &mut canvas,
        "Fill level shows achievement   |   -- Target line   |   Green = Achieved   Yellow = On Track   Red = Gap",
    );

    for ((code, gauge), cell) in gauges.iter().zip(cells(&canvas, top, bottom, 24.0)) {
        let Some(gauge) = gauge else {
            no_data(&mut canvas, &cell, *code);
            continue;
        };
        let (color, _) = gauge.tone();
        let (_, tag_y) = cell.at(0.0, 0.98);
        let tag_width = text_width(&format!("IKU {code}"), 12.0) + 12.0;
        tag(&mut canvas, (cell.x + (cell.w - tag_width) / 2.0, tag_y), *code, 12.0);

        // Tube spans x ∈ [0.3, 0.7], y ∈ [0.2, 0.85] of the cell.
        let (tube_x, tube_top) = cell.at(0.3, 0.85);
        let tube_width = cell.w * 0.4;
        let tube_height = cell.h * 0.65;
        let tube_bottom = tube_top + tube_height;
        canvas.rect(
            tube_x,
            tube_top,
            tube_width,
            tube_height,
            &Paint::fill("#e8e8e8").with_stroke(NO_DATA, 2.0).rounded(tube_width * 0.15),
        );
        let level = (gauge.pct / 100.0).clamp(0.0, 1.2) * tube_height * 0.9;
        canvas.rect(
            tube_x + cell.w * 0.02,
            tube_bottom - cell.h * 0.02 - level,
            tube_width - cell.w * 0.04,
            level,
            &Paint::fill(color).rounded(tube_width * 0.1),
        );
        let (bulb_x, bulb_y) = cell.at(0.5, 0.18);
        canvas.circle(
            bulb_x,
            bulb_y,
            cell.min_side() * 0.12,
            &Paint::fill(color).with_stroke(NO_DATA, 2.0),
        );

        let target_y = tube_bottom - (gauge.target / 100.0) * tube_height * 0.9;
        canvas.line(
            tube_x - cell.w * 0.05,
            target_y,
            tube_x + tube_width + cell.w * 0.05,
            target_y,
            &Paint::stroke(AXIS, 2.0).dashed(),
        );
        canvas.text(
            tube_x + tube_width + cell.w * 0.08,
            target_y,
            &format!("Target\n{}%", format_numeric(gauge.target)),
            &TextStyle::new(8.0).color(MUTED),
        );

        put(
            &mut canvas,
            cell.at(0.15, 0.55),
            &wrap_text(code.info().compact_label, 12).join("\n"),
            &TextStyle::new(10.0).bold().centered().color("#333333"),
        );
        put(
            &mut canvas,
            cell.at(0.85, 0.6),
            &gauge.value,
            &TextStyle::new(22.0).bold().centered().color(color),
        );
        put(
            &mut canvas,
            cell.at(0.85, 0.48),
            &gauge.detail,
            &TextStyle::new(10.0).centered().color(MUTED),
        );
        let status = gauge.achievement(BULLET_ON_TRACK).label();
        status_badge(&mut canvas, cell.at(0.5, 0.03), status, color, 11.0);
    }
    canvas
}

fn waffle(gauges: &[(IkuCode, Option<Gauge>)], config: &ChartConfig) -> Canvas {
    const GRID_SIZE: usize = 10;

    let mut canvas = Canvas::new(18.0, 10.0, &config.font_family);
    let top = header(&mut canvas, config, Some("Waffle Chart Style"));
    let bottom = footer(
        &mut canvas,
        "■ Each square = 1%   |   Filled squares show achievement   |   Green = Achieved   Yellow = On Track   Red = Gap",
    );

    for ((code, gauge), cell) in gauges.iter().zip(cells(&canvas, top, bottom, 24.0)) {
        let Some(gauge) = gauge else {
            no_data(&mut canvas, &cell, *code);
            continue;
        };
        let (color, _) = gauge.tone();
        let (_, tag_y) = cell.at(0.0, 0.98);
        let tag_width = text_width(&format!("IKU {code}"), 11.0) + 11.0;
        tag(&mut canvas, (cell.x + (cell.w - tag_width) / 2.0, tag_y), *code, 11.0);
        put(
            &mut canvas,
            cell.at(0.5, 0.84),
            code.info().compact_label,
            &TextStyle::new(10.0).bold().centered().color("#333333"),
        );

        let side = (cell.w * 0.065).min(cell.h * 0.058);
        let (grid_x, grid_top) = cell.at(0.08, 0.78);
        let filled = filled_cells(gauge.pct);
        for idx in 0..GRID_SIZE * GRID_SIZE {
            let (row, col) = (idx / GRID_SIZE, idx % GRID_SIZE);
            let fill = if idx < filled { color } else { EMPTY_CELL };
            canvas.rect(
                grid_x + col as f64 * side,
                grid_top + row as f64 * side,
                side * 0.9,
                side * 0.9,
                &Paint::fill(fill).with_stroke("white", 0.5),
            );
        }

        let (x, y) = cell.at(0.95, 0.55);
        canvas.text(
            x,
            y,
            &gauge.value,
            &TextStyle::new(20.0).bold().anchor(Anchor::End).color(color),
        );
        let (x, y) = cell.at(0.95, 0.45);
        canvas.text(
            x,
            y,
            &gauge.detail,
            &TextStyle::new(9.0).anchor(Anchor::End).color(MUTED),
        );
        put(
            &mut canvas,
            cell.at(0.5, 0.13),
            &format!("Target: {}%", format_numeric(gauge.target)),
            &TextStyle::new(8.0).centered().color("#888888"),
        );
        let status = gauge.achievement(BULLET_ON_TRACK).label();
        status_badge(&mut canvas, cell.at(0.5, 0.04), status, color, 10.0);
    }
    canvas
}

/// Number of filled waffle squares: one per whole percent, at most 100.
fn filled_cells(pct: f64) -> usize {
    pct.clamp(0.0, 100.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combined_stats() -> Vec<(IkuCode, OverallStats)> {
        vec![
            (IkuCode::Iku1, OverallStats::from_counts(70, 100)),
            (IkuCode::Iku2, OverallStats::from_counts(25, 100)),
            (IkuCode::Iku3, OverallStats::from_counts(1, 100)),
            (IkuCode::Iku5, OverallStats::against_target(3.0, 5.0)),
            (IkuCode::Iku6, OverallStats::against_target(2.5, 2.0)),
        ]
    }

    #[test]
    fn test_gauge_values() {
        let gauge = Gauge::new(IkuCode::Iku1, &OverallStats::from_counts(70, 100));
        assert_eq!(gauge.value, "70.0%");
        assert_eq!(gauge.detail, "70/100");
        assert_eq!(gauge.target, 60.0);
        assert_eq!(gauge.tone(), (GREEN, "▲"));

        let gauge = Gauge::new(IkuCode::Iku5, &OverallStats::against_target(3.0, 5.0));
        assert_eq!(gauge.value, "3");
        assert_eq!(gauge.detail, "Target: 5");
        assert_eq!(gauge.pct, 60.0);
        assert_eq!(gauge.tone(), (RED, "▼"));

        let gauge = Gauge::new(IkuCode::Iku6, &OverallStats::against_target(1.75, 2.0));
        assert_eq!(gauge.value, "1.75");
        assert_eq!(gauge.detail, "Target: 2/prodi");
        assert_eq!(gauge.tone(), (YELLOW, "▶"));
    }

    #[test]
    fn test_filled_cells() {
        assert_eq!(filled_cells(45.7), 45);
        assert_eq!(filled_cells(180.0), 100);
        assert_eq!(filled_cells(-1.0), 0);
    }

    #[test]
    fn test_every_variant_renders() {
        let config = ChartConfig::default();
        for variant in DashboardVariant::ALL {
            let chart = overall_achievement(variant, &combined_stats(), &config).unwrap();
            assert_eq!(chart.name, variant.file_name());
            assert!(chart.svg.contains("CAPAIAN IKU FAKULTAS SAINS &amp; TEKNOLOGI"));
            assert!(chart.svg.contains("Universitas Jambi 2025"));
            // IKU 4, 7 and 8 have no results.
            assert_eq!(chart.svg.matches(">No Data<").count(), 3, "{variant}");
        }
    }

    #[test]
    fn test_grid_status_uses_donut_threshold() {
        let stats = vec![(IkuCode::Iku1, OverallStats::from_counts(45, 100))];
        let chart =
            overall_achievement(DashboardVariant::Grid4x2, &stats, &ChartConfig::default()).unwrap();
        // 45% of a 60% target is above 0.7 × target.
        assert!(chart.svg.contains("ON TRACK -15.0%"));
    }

    #[test]
    fn test_summary_dashboard() {
        let stats = vec![
            (IkuCode::Iku11, OverallStats::from_counts(1, 3)),
            (IkuCode::Iku23, OverallStats::from_counts(1, 4)),
        ];
        let chart = summary_dashboard(&stats, &ChartConfig::default()).unwrap();
        assert_eq!(chart.name, "IKU_summary_dashboard");
        assert!(chart.svg.contains(">33.3%<"));
        assert!(chart.svg.contains(">IKU 23<"));
        assert!(chart.svg.contains("#7F8C8D"));
        assert!(chart.svg.contains("Ringkasan Pencapaian IKU"));
    }
}
