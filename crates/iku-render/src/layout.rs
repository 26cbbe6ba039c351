//! Axes, ticks, titles and legends shared by the chart families.

use crate::svg::{Anchor, Canvas, Paint, TextStyle, VAlign, text_width};

pub const GRID: &str = "#CCCCCC";
pub const AXIS: &str = "#1a1a1a";
pub const MUTED: &str = "#666666";
pub const SEPARATOR: &str = "#333333";

/// Plot area inside the figure margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plot {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Plot {
    pub fn width(&self) -> f64 {
        (self.right - self.left).max(1.0)
    }

    pub fn height(&self) -> f64 {
        (self.bottom - self.top).max(1.0)
    }

    pub fn center_x(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    /// Left and bottom spines.
    pub fn spines(&self, canvas: &mut Canvas) {
        let paint = Paint::stroke(AXIS, 1.5);
        canvas.line(self.left, self.top, self.left, self.bottom, &paint);
        canvas.line(self.left, self.bottom, self.right, self.bottom, &paint);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    UpperLeft,
    UpperRight,
}

/// One legend row: a filled swatch or a dashed line sample.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub label: String,
    pub color: String,
    pub line: bool,
}

impl LegendItem {
    pub fn patch(label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
            line: false,
        }
    }

    pub fn dashed(label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
            line: true,
        }
    }
}

/// Draws a boxed legend in a corner of `plot`.
pub fn legend(canvas: &mut Canvas, plot: &Plot, corner: Corner, items: &[LegendItem], size: f64) {
    if items.is_empty() {
        return;
    }
    let row = size * 1.6;
    let swatch = size * 1.4;
    let pad = size * 0.6;
    let label_width = items
        .iter()
        .map(|item| text_width(&item.label, size))
        .fold(0.0, f64::max);
    let width = pad * 3.0 + swatch + label_width;
    let height = pad * 2.0 + row * items.len() as f64;
    let x = match corner {
        Corner::UpperLeft => plot.left + pad,
        Corner::UpperRight => plot.right - width - pad,
    };
    let y = plot.top + pad;

    canvas.rect(
        x,
        y,
        width,
        height,
        &Paint::fill("white").with_stroke(AXIS, 0.8).opacity(0.95),
    );
    let style = TextStyle::new(size);
    for (idx, item) in items.iter().enumerate() {
        let cy = y + pad + row * (idx as f64 + 0.5);
        let sx = x + pad;
        if item.line {
            canvas.line(
                sx,
                cy,
                sx + swatch,
                cy,
                &Paint::stroke(item.color.as_str(), 2.0).dashed(),
            );
        } else {
            canvas.rect(
                sx,
                cy - size * 0.45,
                swatch,
                size * 0.9,
                &Paint::fill(item.color.as_str()).with_stroke("black", 0.8),
            );
        }
        canvas.text(sx + swatch + pad, cy, &item.label, &style);
    }
}

/// Centred multi-line title starting at `top`; the first line is bold and
/// the rest use `subtitle_size`. Returns the y coordinate below the title.
pub fn title(canvas: &mut Canvas, top: f64, text: &str, size: f64, subtitle_size: f64) -> f64 {
    let x = canvas.width() / 2.0;
    let mut lines = text.split('\n');
    let mut y = top;
    if let Some(first) = lines.next() {
        let style = TextStyle::new(size).bold().centered().valign(VAlign::Top);
        canvas.text(x, y, first, &style);
        y += style.block_height(1);
    }
    let rest: Vec<&str> = lines.collect();
    if !rest.is_empty() {
        let style = TextStyle::new(subtitle_size)
            .centered()
            .valign(VAlign::Top)
            .color(MUTED);
        canvas.text(x, y, &rest.join("\n"), &style);
        y += style.block_height(rest.len());
    }
    y
}

/// Evenly spaced tick values from 0 covering `max` with a 1/2/2.5/5 step.
pub fn nice_ticks(max: f64) -> Vec<f64> {
    if max <= 0.0 || !max.is_finite() {
        return vec![0.0];
    }
    let raw = max / 5.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|factor| factor * magnitude)
        .find(|step| *step >= raw)
        .unwrap_or(10.0 * magnitude);
    let count = (max / step).floor() as usize;
    (0..=count).map(|idx| idx as f64 * step).collect()
}

/// Tick label without trailing zeros.
pub fn tick_label(value: f64) -> String {
    iku_common::format_numeric(iku_common::round2(value))
}

/// Draws a label rotated along the left edge.
pub fn y_axis_label(canvas: &mut Canvas, x: f64, plot: &Plot, text: &str, size: f64) {
    let style = TextStyle::new(size)
        .bold()
        .anchor(Anchor::Middle)
        .rotated(-90.0);
    canvas.text(x, (plot.top + plot.bottom) / 2.0, text, &style);
}

/// Grey placeholder text centred in `plot`.
pub fn no_data(canvas: &mut Canvas, plot: &Plot, text: &str, size: f64) {
    let style = TextStyle::new(size).centered().italic().color("#999999");
    canvas.text(plot.center_x(), (plot.top + plot.bottom) / 2.0, text, &style);
}
