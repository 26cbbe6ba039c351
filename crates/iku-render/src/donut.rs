//! Dual-ring donuts: the outer ring shows the target, the inner ring the
//! realisation.
//!
//! Geometry is expressed in donut units (outer radius ≈ 1.2) and mapped to
//! points by [`DonutFrame`].

use iku_common::{format_fraction, format_numeric, format_percent_short};
use iku_model::{ChartConfig, DONUT_ON_TRACK, IkuCode, OverallStats};

use crate::chart::Chart;
use crate::error::Result;
use crate::layout::{self, MUTED, Plot};
use crate::svg::{Canvas, Paint, TextStyle};

pub(crate) const ACHIEVED: &str = "#28a745";
pub(crate) const ACHIEVED_BG: &str = "#d4edda";
pub(crate) const ON_TRACK: &str = "#ffc107";
pub(crate) const ON_TRACK_TEXT: &str = "#856404";
pub(crate) const ON_TRACK_BG: &str = "#fff3cd";
pub(crate) const GAP: &str = "#dc3545";
pub(crate) const GAP_BG: &str = "#f8d7da";

const TARGET_FILL: &str = "#9E9E9E";
const TARGET_TRACK: &str = "#E0E0E0";
const ACTUAL_TRACK: &str = "#F5F5F5";
const INK: &str = "#1a1a1a";
const LABEL: &str = "#333333";

/// Maps donut units (y up) onto the canvas.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DonutFrame {
    pub cx: f64,
    pub cy: f64,
    pub unit: f64,
}

impl DonutFrame {
    pub fn at(&self, x: f64, y: f64) -> (f64, f64) {
        (self.cx + x * self.unit, self.cy - y * self.unit)
    }

    pub fn len(&self, value: f64) -> f64 {
        value * self.unit
    }
}

/// Radii of a dual-ring donut; `width`s are measured inwards.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DualRing {
    pub outer: f64,
    pub outer_width: f64,
    pub inner: f64,
    pub inner_width: f64,
    pub outer_track: &'static str,
    /// White disc covering the centre.
    pub hole: Option<f64>,
}

impl DualRing {
    /// Draws both rings; `target` and `actual` are fractions of a full turn.
    pub fn draw(&self, canvas: &mut Canvas, frame: &DonutFrame, target: f64, actual: f64, color: &str) {
        let center = frame.at(0.0, 0.0);
        let edge = |fill: &str| Paint::fill(fill).with_stroke("white", 2.0);
        let outer = frame.len(self.outer);
        let outer_inner = frame.len(self.outer - self.outer_width);
        let inner = frame.len(self.inner);
        let inner_inner = frame.len(self.inner - self.inner_width);

        canvas.sector(center, outer_inner, outer, 0.0, 1.0, &edge(self.outer_track));
        canvas.sector(center, outer_inner, outer, 0.0, target.min(1.0), &edge(TARGET_FILL));
        canvas.sector(center, inner_inner, inner, 0.0, 1.0, &edge(ACTUAL_TRACK));
        canvas.sector(center, inner_inner, inner, 0.0, actual.min(1.0), &edge(color));
        if let Some(hole) = self.hole {
            canvas.circle(center.0, center.1, frame.len(hole), &Paint::fill("white"));
        }
    }
}

/// Colours and wording of an achievement badge.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Status {
    pub fill: &'static str,
    pub text: &'static str,
    pub background: &'static str,
    pub label: &'static str,
}

impl Status {
    pub const fn achieved() -> Self {
        Self {
            fill: ACHIEVED,
            text: ACHIEVED,
            background: ACHIEVED_BG,
            label: "✓ ACHIEVED",
        }
    }

    pub const fn on_track(label: &'static str) -> Self {
        Self {
            fill: ON_TRACK,
            text: ON_TRACK_TEXT,
            background: ON_TRACK_BG,
            label,
        }
    }

    pub const fn gap(fill: &'static str) -> Self {
        Self {
            fill,
            text: GAP,
            background: GAP_BG,
            label: "GAP",
        }
    }
}

/// Target the percentage is compared against: number-based metrics store
/// the realisation as a percentage of their absolute target.
pub(crate) fn effective_target(code: IkuCode, stats: &OverallStats) -> f64 {
    if stats.number_based { 100.0 } else { code.target() }
}

/// `+4.5%` above target, `-4.5%` below.
pub(crate) fn difference(pct: f64, target: f64) -> String {
    if pct >= target {
        format!("+{:.1}%", pct - target)
    } else {
        format!("-{:.1}%", target - pct)
    }
}

/// One donut per sub-metric of a combined indicator
/// (`IKU_<code>_breakdown_donut`).
pub fn breakdown_donut(
    code: IkuCode,
    components: &[(IkuCode, OverallStats)],
    config: &ChartConfig,
) -> Result<Chart> {
    let panels = components.len().max(1);
    let mut canvas = Canvas::new(5.0 * panels as f64, 6.5, &config.font_family);
    let heading = format!("{}\n{}", code.info().title, config.faculty_year());
    let top = layout::title(&mut canvas, 16.0, &heading, 15.0, 10.0) + 8.0;

    let panel_width = canvas.width() / panels as f64;
    // Panel extent in donut units: x ∈ [-1.45, 1.45], y ∈ [-1.95, 1.35].
    let unit = (panel_width / 2.9).min((canvas.height() - top - 8.0) / 3.3);
    if components.is_empty() {
        let plot = Plot {
            left: 0.0,
            top,
            right: canvas.width(),
            bottom: canvas.height(),
        };
        layout::no_data(&mut canvas, &plot, "No Data", 14.0);
    }

    let ring = DualRing {
        outer: 1.15,
        outer_width: 0.12,
        inner: 0.98,
        inner_width: 0.22,
        outer_track: TARGET_TRACK,
        hole: Some(0.72),
    };
    for (idx, (sub, stats)) in components.iter().enumerate() {
        let frame = DonutFrame {
            cx: panel_width * (idx as f64 + 0.5),
            cy: top + 1.35 * unit,
            unit,
        };
        let target = effective_target(*sub, stats);
        let pct = stats.percentage;
        let status = if pct >= target {
            Status::achieved()
        } else {
            Status::gap(sub.info().color)
        };
        ring.draw(&mut canvas, &frame, target / 100.0, pct / 100.0, status.fill);

        put(
            &mut canvas,
            frame.at(0.0, 0.12),
            &format!("{}%", format_percent_short(pct)),
            &TextStyle::new(36.0).bold().centered().color(INK),
        );
        put(
            &mut canvas,
            frame.at(0.0, -0.18),
            &format_fraction(stats.numerator, stats.denominator),
            &TextStyle::new(12.0).bold().centered().color(MUTED),
        );
        put(
            &mut canvas,
            frame.at(0.0, -1.28),
            &sub.info().label.join(" "),
            &TextStyle::new(14.0).bold().centered().color(LABEL),
        );

        let row_y = -1.58;
        key_rows(
            &mut canvas,
            &frame,
            (-1.18, row_y),
            &[
                (TARGET_FILL, format!("Target {}%", format_numeric(target))),
                (status.fill, format!("Realisasi {pct:.1}%")),
            ],
            11.0,
        );
        let (bx, by) = frame.at(0.74, row_y);
        canvas.badge(
            bx,
            by,
            &format!("{}\n{}", status.label, difference(pct, target)),
            &TextStyle::new(13.0).bold().color(status.text),
            &Paint::fill(status.background).with_stroke(status.text, 2.5),
        );
    }

    Chart::new(format!("IKU_{code}_breakdown_donut"), canvas)
}

/// Single donut of a combined indicator (`IKU_<code>_main_donut`).
pub fn main_donut(code: IkuCode, stats: &OverallStats, config: &ChartConfig) -> Result<Chart> {
    let mut canvas = Canvas::new(6.0, 7.0, &config.font_family);
    let heading = format!("{}\n{}", code.info().title, config.faculty_year());
    let top = layout::title(&mut canvas, 16.0, &heading, 15.0, 10.0) + 8.0;

    // Extent in donut units: x ∈ [-1.55, 1.55], y ∈ [-2.10, 1.42].
    let unit = (canvas.width() / 3.1).min((canvas.height() - top - 8.0) / 3.52);
    let frame = DonutFrame {
        cx: canvas.width() / 2.0,
        cy: top + 1.42 * unit,
        unit,
    };
    let target = effective_target(code, stats);
    let pct = stats.percentage;
    let status = if pct >= target {
        Status::achieved()
    } else if pct >= target * DONUT_ON_TRACK {
        Status::on_track("GAP")
    } else {
        Status::gap(GAP)
    };
    let ring = DualRing {
        outer: 1.2,
        outer_width: 0.14,
        inner: 1.0,
        inner_width: 0.25,
        outer_track: TARGET_TRACK,
        hole: Some(0.70),
    };
    ring.draw(&mut canvas, &frame, target / 100.0, pct / 100.0, status.fill);

    put(
        &mut canvas,
        frame.at(0.0, 0.12),
        &percent_two(pct),
        &TextStyle::new(40.0).bold().centered().color(INK),
    );
    put(
        &mut canvas,
        frame.at(0.0, -0.20),
        &format_fraction(stats.numerator, stats.denominator),
        &TextStyle::new(14.0).bold().centered().color(MUTED),
    );
    put(
        &mut canvas,
        frame.at(0.0, -1.38),
        "COMBINED",
        &TextStyle::new(14.0).bold().centered().color("#888888"),
    );

    let row_y = -1.72;
    key_rows(
        &mut canvas,
        &frame,
        (-1.25, row_y),
        &[
            (TARGET_FILL, format!("Target {}%", format_numeric(target))),
            (status.fill, format!("Realisasi {pct:.1}%")),
        ],
        13.0,
    );
    let (bx, by) = frame.at(0.83, row_y);
    canvas.badge(
        bx,
        by,
        &format!("{}\n{}", status.label, difference(pct, target)),
        &TextStyle::new(15.0).bold().color(status.text),
        &Paint::fill(status.background).with_stroke(status.text, 2.5),
    );

    Chart::new(format!("IKU_{code}_main_donut"), canvas)
}

pub(crate) fn put(canvas: &mut Canvas, (x, y): (f64, f64), text: &str, style: &TextStyle) {
    canvas.text(x, y, text, style);
}

/// Two square-marker rows (target, realisation) stacked around `origin`.
fn key_rows(
    canvas: &mut Canvas,
    frame: &DonutFrame,
    origin: (f64, f64),
    rows: &[(&str, String); 2],
    size: f64,
) {
    let style = TextStyle::new(size).bold().color(MUTED);
    for (offset, (color, label)) in [0.12, -0.12].iter().zip(rows) {
        let (x, y) = frame.at(origin.0, origin.1 + offset);
        let marker = size * 0.8;
        canvas.rect(
            x - marker / 2.0,
            y - marker / 2.0,
            marker,
            marker,
            &Paint::fill(*color),
        );
        canvas.text(x + frame.len(0.13), y, label, &style);
    }
}

/// Two decimals unless whole: `45.25%`, `60%`.
fn percent_two(pct: f64) -> String {
    if pct.fract() == 0.0 {
        format!("{}%", pct as i64)
    } else {
        format!("{pct:.2}%")
    }
}
