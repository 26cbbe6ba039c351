//! Finished chart documents.

use iku_model::{ChartConfig, IkuCode};

use crate::error::Result;
use crate::svg::Canvas;

/// A drawn chart: the output file stem and the SVG markup.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub name: String,
    pub svg: String,
}

impl Chart {
    pub(crate) fn new(name: impl Into<String>, canvas: Canvas) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            svg: canvas.finish()?,
        })
    }
}

/// `<title>\n<faculty> <year> | Target: <target>`
pub fn metric_heading(code: IkuCode, config: &ChartConfig) -> String {
    format!(
        "{}\n{} | Target: {}",
        code.info().title,
        config.faculty_year(),
        code.target_label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_heading() {
        let config = ChartConfig::default();
        insta::assert_snapshot!(metric_heading(IkuCode::Iku62, &config), @r"
        IKU 6: Kerjasama per Program Studi
        Fakultas Sains & Teknologi 2025 | Target: 2 per prodi
        ");
        assert!(metric_heading(IkuCode::Iku41, &config).ends_with("Target: 20.14%"));
    }
}
