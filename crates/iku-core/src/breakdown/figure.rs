//! Drawing-independent description of a breakdown figure.

use iku_model::Jurusan;

/// A titled figure made of one or more panels laid out side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// Output file stem, e.g. `IKU_11_breakdown_statistik`.
    pub name: String,
    /// Figure title; `\n` separates lines.
    pub title: String,
    pub panels: Vec<Panel>,
}

impl Figure {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            panels: Vec::new(),
        }
    }

    pub fn push(&mut self, panel: Panel) {
        self.panels.push(panel);
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Pie(PiePanel),
    Bars(BarPanel),
    Table(TablePanel),
    /// Centered text shown instead of a chart.
    Message(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PiePanel {
    pub title: String,
    pub slices: Vec<Slice>,
}

impl PiePanel {
    pub fn total(&self) -> u32 {
        self.slices.iter().map(|slice| slice.value).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Bars grow to the right; the first bar is drawn at the top.
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: u32,
    pub color: String,
    /// Text written beside the bar (names behind the count).
    pub annotation: Option<String>,
}

impl Bar {
    pub fn new(label: impl Into<String>, value: u32, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value,
            color: color.into(),
            annotation: None,
        }
    }

    pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

impl LegendEntry {
    pub fn jurusan(jurusan: Jurusan) -> Self {
        Self {
            label: jurusan.name().to_string(),
            color: jurusan.palette().base.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarPanel {
    pub title: String,
    /// Label of the value axis.
    pub axis_label: String,
    pub orientation: Orientation,
    pub bars: Vec<Bar>,
    pub legend: Vec<LegendEntry>,
    /// Bar indices before which a group separator line is drawn.
    pub separators: Vec<usize>,
    /// Boxed text drawn in a corner of the panel.
    pub info: Vec<String>,
}

impl BarPanel {
    pub fn horizontal(title: impl Into<String>, axis_label: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self::with_orientation(title, axis_label, bars, Orientation::Horizontal)
    }

    pub fn vertical(title: impl Into<String>, axis_label: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self::with_orientation(title, axis_label, bars, Orientation::Vertical)
    }

    fn with_orientation(
        title: impl Into<String>,
        axis_label: impl Into<String>,
        bars: Vec<Bar>,
        orientation: Orientation,
    ) -> Self {
        Self {
            title: title.into(),
            axis_label: axis_label.into(),
            orientation,
            bars,
            legend: Vec::new(),
            separators: Vec::new(),
            info: Vec::new(),
        }
    }

    pub fn with_legend(mut self, legend: Vec<LegendEntry>) -> Self {
        self.legend = legend;
        self
    }

    pub fn with_separators(mut self, separators: Vec<usize>) -> Self {
        self.separators = separators;
        self
    }

    pub fn with_info(mut self, info: Vec<String>) -> Self {
        self.info = info;
        self
    }

    pub fn max_value(&self) -> u32 {
        self.bars.iter().map(|bar| bar.value).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TablePanel {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Header background colour.
    pub header_color: String,
    /// Footnote under the table.
    pub note: Option<String>,
}
