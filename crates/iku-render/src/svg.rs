//! Minimal SVG canvas on top of `quick-xml`.
//!
//! Coordinates are in points (1/72 inch) with the origin at the top left.
//! Angles of [`Canvas::sector`] are fractions of a full turn, measured
//! clockwise from 12 o'clock.

use std::f64::consts::TAU;

use iku_common::{format_numeric, round2};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{RenderError, Result};

pub const POINTS_PER_INCH: f64 = 72.0;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const LINE_HEIGHT: f64 = 1.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    Start,
    Middle,
    End,
}

impl Anchor {
    const fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Vertical placement of a (possibly multi-line) text block relative to `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    /// `y` is the top of the first line.
    Top,
    #[default]
    Middle,
    /// `y` is the baseline of the last line.
    Bottom,
}

/// Fill and stroke of a shape.
#[derive(Debug, Clone, Default)]
pub struct Paint {
    fill: Option<String>,
    stroke: Option<String>,
    stroke_width: f64,
    dash: Option<&'static str>,
    opacity: Option<f64>,
    radius: f64,
}

impl Paint {
    pub fn fill(color: impl Into<String>) -> Self {
        Self {
            fill: Some(color.into()),
            ..Self::default()
        }
    }

    pub fn stroke(color: impl Into<String>, width: f64) -> Self {
        Self::default().with_stroke(color, width)
    }

    pub fn with_stroke(mut self, color: impl Into<String>, width: f64) -> Self {
        self.stroke = Some(color.into());
        self.stroke_width = width;
        self
    }

    pub fn dashed(mut self) -> Self {
        self.dash = Some("6,4");
        self
    }

    pub fn dotted(mut self) -> Self {
        self.dash = Some("1,3");
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Corner radius for rectangles.
    pub fn rounded(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    fn apply(&self, element: &mut BytesStart<'_>) {
        let fill = self.fill.as_deref().unwrap_or("none");
        element.push_attribute(("fill", fill));
        if let Some(stroke) = &self.stroke {
            element.push_attribute(("stroke", stroke.as_str()));
            element.push_attribute(("stroke-width", num(self.stroke_width).as_str()));
        }
        if let Some(dash) = self.dash {
            element.push_attribute(("stroke-dasharray", dash));
        }
        if let Some(opacity) = self.opacity {
            element.push_attribute(("opacity", num(opacity).as_str()));
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextStyle {
    size: f64,
    color: String,
    bold: bool,
    italic: bool,
    anchor: Anchor,
    valign: VAlign,
    rotate: Option<f64>,
}

impl TextStyle {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            color: "#1a1a1a".to_string(),
            bold: false,
            italic: false,
            anchor: Anchor::Start,
            valign: VAlign::Middle,
            rotate: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn centered(self) -> Self {
        self.anchor(Anchor::Middle)
    }

    pub fn valign(mut self, valign: VAlign) -> Self {
        self.valign = valign;
        self
    }

    /// Rotation in degrees around the anchor point.
    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotate = Some(degrees);
        self
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    /// Height of a block of `lines` lines.
    pub fn block_height(&self, lines: usize) -> f64 {
        self.size * LINE_HEIGHT * lines as f64
    }
}

/// Estimated rendered width of the widest line of `text`.
pub fn text_width(text: &str, size: f64) -> f64 {
    text.lines()
        .map(|line| line.chars().count() as f64 * size * 0.55)
        .fold(0.0, f64::max)
}

/// SVG document being drawn.
pub struct Canvas {
    xml: Writer<Vec<u8>>,
    width: f64,
    height: f64,
    error: Option<RenderError>,
}

impl Canvas {
    /// Starts a document of the given size in inches on a white background.
    pub fn new(width_in: f64, height_in: f64, font_family: &str) -> Self {
        let width = width_in * POINTS_PER_INCH;
        let height = height_in * POINTS_PER_INCH;
        let mut canvas = Self {
            xml: Writer::new(Vec::new()),
            width,
            height,
            error: None,
        };
        canvas.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)));
        let mut root = BytesStart::new("svg");
        root.push_attribute(("xmlns", SVG_NS));
        root.push_attribute(("width", num(width).as_str()));
        root.push_attribute(("height", num(height).as_str()));
        let view_box = format!("0 0 {} {}", num(width), num(height));
        root.push_attribute(("viewBox", view_box.as_str()));
        root.push_attribute(("font-family", font_family));
        canvas.emit(Event::Start(root));
        canvas.rect(0.0, 0.0, width, height, &Paint::fill("white"));
        canvas
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    fn emit(&mut self, event: Event<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.xml.write_event(event) {
            self.error = Some(RenderError::Svg(e.to_string()));
        }
    }

    fn shape(&mut self, mut element: BytesStart<'_>, paint: &Paint) {
        paint.apply(&mut element);
        self.emit(Event::Empty(element));
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: &Paint) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let mut rect = BytesStart::new("rect");
        rect.push_attribute(("x", num(x).as_str()));
        rect.push_attribute(("y", num(y).as_str()));
        rect.push_attribute(("width", num(width).as_str()));
        rect.push_attribute(("height", num(height).as_str()));
        if paint.radius > 0.0 {
            rect.push_attribute(("rx", num(paint.radius).as_str()));
        }
        self.shape(rect, paint);
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, paint: &Paint) {
        let mut line = BytesStart::new("line");
        line.push_attribute(("x1", num(x1).as_str()));
        line.push_attribute(("y1", num(y1).as_str()));
        line.push_attribute(("x2", num(x2).as_str()));
        line.push_attribute(("y2", num(y2).as_str()));
        self.shape(line, paint);
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, paint: &Paint) {
        let mut circle = BytesStart::new("circle");
        circle.push_attribute(("cx", num(cx).as_str()));
        circle.push_attribute(("cy", num(cy).as_str()));
        circle.push_attribute(("r", num(r).as_str()));
        self.shape(circle, paint);
    }

    pub fn polygon(&mut self, points: &[(f64, f64)], paint: &Paint) {
        let points = points
            .iter()
            .map(|(x, y)| format!("{},{}", num(*x), num(*y)))
            .collect::<Vec<_>>()
            .join(" ");
        let mut polygon = BytesStart::new("polygon");
        polygon.push_attribute(("points", points.as_str()));
        self.shape(polygon, paint);
    }

    /// Annular sector between `inner` and `outer` radius starting at
    /// `start` and spanning `sweep` turns. `inner` of 0 draws a pie wedge.
    pub fn sector(
        &mut self,
        (cx, cy): (f64, f64),
        inner: f64,
        outer: f64,
        start: f64,
        sweep: f64,
        paint: &Paint,
    ) {
        if sweep <= 0.0 || outer <= 0.0 {
            return;
        }
        let data = if sweep >= 1.0 {
            let mut data = full_circle(cx, cy, outer, true);
            if inner > 0.0 {
                data.push(' ');
                data.push_str(&full_circle(cx, cy, inner, false));
            }
            data
        } else {
            let end = start + sweep;
            let large = u8::from(sweep > 0.5);
            let (x0, y0) = polar(cx, cy, outer, start);
            let (x1, y1) = polar(cx, cy, outer, end);
            let mut data = format!(
                "M {} {} A {} {} 0 {large} 1 {} {}",
                num(x0),
                num(y0),
                num(outer),
                num(outer),
                num(x1),
                num(y1)
            );
            if inner > 0.0 {
                let (x2, y2) = polar(cx, cy, inner, end);
                let (x3, y3) = polar(cx, cy, inner, start);
                data.push_str(&format!(
                    " L {} {} A {} {} 0 {large} 0 {} {} Z",
                    num(x2),
                    num(y2),
                    num(inner),
                    num(inner),
                    num(x3),
                    num(y3)
                ));
            } else {
                data.push_str(&format!(" L {} {} Z", num(cx), num(cy)));
            }
            data
        };
        let mut path = BytesStart::new("path");
        path.push_attribute(("d", data.as_str()));
        path.push_attribute(("fill-rule", "evenodd"));
        self.shape(path, paint);
    }

    /// Draws `text`; `\n` starts a new line.
    pub fn text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle) {
        let lines: Vec<&str> = text.split('\n').collect();
        let step = style.size * LINE_HEIGHT;
        let first = match style.valign {
            VAlign::Top => y + style.size * 0.8,
            VAlign::Middle => y - step * (lines.len() - 1) as f64 / 2.0 + style.size * 0.35,
            VAlign::Bottom => y - step * (lines.len() - 1) as f64,
        };

        let mut element = BytesStart::new("text");
        element.push_attribute(("x", num(x).as_str()));
        element.push_attribute(("y", num(first).as_str()));
        element.push_attribute(("font-size", num(style.size).as_str()));
        element.push_attribute(("fill", style.color.as_str()));
        element.push_attribute(("text-anchor", style.anchor.as_str()));
        if style.bold {
            element.push_attribute(("font-weight", "bold"));
        }
        if style.italic {
            element.push_attribute(("font-style", "italic"));
        }
        if let Some(degrees) = style.rotate {
            let transform = format!("rotate({} {} {})", num(degrees), num(x), num(y));
            element.push_attribute(("transform", transform.as_str()));
        }
        self.emit(Event::Start(element));
        for (idx, line) in lines.iter().enumerate() {
            let mut span = BytesStart::new("tspan");
            span.push_attribute(("x", num(x).as_str()));
            if idx > 0 {
                span.push_attribute(("dy", num(step).as_str()));
            }
            self.emit(Event::Start(span));
            self.emit(Event::Text(BytesText::new(line)));
            self.emit(Event::End(BytesEnd::new("tspan")));
        }
        self.emit(Event::End(BytesEnd::new("text")));
    }

    /// Text centred on a rounded box.
    pub fn badge(&mut self, x: f64, y: f64, text: &str, style: &TextStyle, background: &Paint) {
        let style = style.clone().centered().valign(VAlign::Middle);
        let lines = text.lines().count().max(1);
        let pad = style.size * 0.5;
        let width = text_width(text, style.size) + pad * 2.0;
        let height = style.block_height(lines) + pad;
        self.rect(
            x - width / 2.0,
            y - height / 2.0,
            width,
            height,
            &background.clone().rounded(style.size * 0.4),
        );
        self.text(x, y, text, &style);
    }

    /// Closes the document and returns the markup.
    pub fn finish(mut self) -> Result<String> {
        self.emit(Event::End(BytesEnd::new("svg")));
        if let Some(error) = self.error {
            return Err(error);
        }
        String::from_utf8(self.xml.into_inner()).map_err(|e| RenderError::Svg(e.to_string()))
    }
}

pub(crate) fn polar(cx: f64, cy: f64, r: f64, turn: f64) -> (f64, f64) {
    let angle = turn * TAU;
    (cx + r * angle.sin(), cy - r * angle.cos())
}

fn full_circle(cx: f64, cy: f64, r: f64, clockwise: bool) -> String {
    let sweep = u8::from(clockwise);
    format!(
        "M {cx} {top} A {r} {r} 0 1 {sweep} {cx} {bottom} A {r} {r} 0 1 {sweep} {cx} {top} Z",
        cx = num(cx),
        r = num(r),
        top = num(cy - r),
        bottom = num(cy + r),
    )
}

fn num(value: f64) -> String {
    format_numeric(round2(value))
}
