//! Output directory management.
//!
//! Charts land in `<root>/png/<name>.png` and, when SVG export is enabled,
//! `<root>/svg/<name>.svg`.

use std::fs;
use std::path::{Path, PathBuf};

use iku_model::ChartConfig;
use tracing::{debug, info};

use crate::chart::Chart;
use crate::error::{RenderError, Result};
use crate::raster::Rasterizer;

const PNG_DIR: &str = "png";
const SVG_DIR: &str = "svg";

/// Destination for rendered charts.
pub struct OutputDir {
    root: PathBuf,
    rasterizer: Option<Rasterizer>,
    export_svg: bool,
}

impl OutputDir {
    /// Creates the directories needed by the export formats in `config`.
    pub fn create(root: impl Into<PathBuf>, config: &ChartConfig) -> Result<Self> {
        let root = root.into();
        let output = Self {
            rasterizer: config.export_png.then(|| Rasterizer::new(config.dpi)),
            export_svg: config.export_svg,
            root,
        };
        if output.rasterizer.is_some() {
            ensure_dir(&output.png_dir())?;
        }
        if output.export_svg {
            ensure_dir(&output.svg_dir())?;
        }
        Ok(output)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn png_dir(&self) -> PathBuf {
        self.root.join(PNG_DIR)
    }

    pub fn svg_dir(&self) -> PathBuf {
        self.root.join(SVG_DIR)
    }

    /// Removes previously generated images from both subdirectories.
    ///
    /// Other files are left alone. Returns the number of files removed.
    pub fn cleanup(&self) -> Result<usize> {
        let mut removed = 0;
        for (dir, extension) in [(self.png_dir(), "png"), (self.svg_dir(), "svg")] {
            if !dir.is_dir() {
                continue;
            }
            let entries = fs::read_dir(&dir).map_err(|e| RenderError::io(&dir, e))?;
            for entry in entries {
                let path = entry.map_err(|e| RenderError::io(&dir, e))?.path();
                let matches = path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
                if matches && path.is_file() {
                    fs::remove_file(&path).map_err(|e| RenderError::io(&path, e))?;
                    removed += 1;
                }
            }
        }
        if removed > 0 {
            info!(removed, dir = %self.root.display(), "removed previous charts");
        }
        Ok(removed)
    }

    /// Writes `chart` in every enabled format and returns the written paths.
    pub fn save(&self, chart: &Chart) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(2);
        if let Some(rasterizer) = &self.rasterizer {
            let path = self.png_dir().join(format!("{}.png", chart.name));
            rasterizer.save_png(chart, &path)?;
            written.push(path);
        }
        if self.export_svg {
            let path = self.svg_dir().join(format!("{}.svg", chart.name));
            fs::write(&path, &chart.svg).map_err(|e| RenderError::io(&path, e))?;
            written.push(path);
        }
        debug!(chart = %chart.name, files = written.len(), "saved chart");
        Ok(written)
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| RenderError::io(dir, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::Canvas;

    fn svg_only() -> ChartConfig {
        ChartConfig {
            export_png: false,
            export_svg: true,
            ..ChartConfig::default()
        }
    }

    fn chart(name: &str) -> Chart {
        Chart::new(name, Canvas::new(1.0, 1.0, "sans-serif")).unwrap()
    }

    #[test]
    fn test_save_writes_svg_only() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputDir::create(dir.path().join("output"), &svg_only()).unwrap();

        let written = output.save(&chart("IKU_41_horizontal")).unwrap();
        assert_eq!(written, vec![output.svg_dir().join("IKU_41_horizontal.svg")]);
        assert!(!output.png_dir().exists());
        let svg = fs::read_to_string(&written[0]).unwrap();
        assert!(svg.starts_with("<?xml"));
    }

    #[test]
    fn test_save_writes_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let config = ChartConfig {
            dpi: 72,
            export_svg: true,
            ..ChartConfig::default()
        };
        let output = OutputDir::create(dir.path(), &config).unwrap();
        let written = output.save(&chart("IKU_summary_dashboard")).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written.iter().all(|path| path.is_file()));
    }

    #[test]
    fn test_cleanup_removes_only_images() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputDir::create(dir.path(), &svg_only()).unwrap();
        fs::create_dir_all(output.png_dir()).unwrap();
        fs::write(output.png_dir().join("old.png"), b"x").unwrap();
        fs::write(output.png_dir().join("notes.txt"), b"keep").unwrap();
        fs::write(output.svg_dir().join("old.svg"), b"<svg/>").unwrap();
        fs::write(output.svg_dir().join("old.PNG.bak"), b"keep").unwrap();

        assert_eq!(output.cleanup().unwrap(), 2);
        assert!(output.png_dir().join("notes.txt").exists());
        assert!(output.svg_dir().join("old.PNG.bak").exists());
        assert!(!output.png_dir().join("old.png").exists());
        assert!(!output.svg_dir().join("old.svg").exists());
    }

    #[test]
    fn test_cleanup_without_directories() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputDir {
            root: dir.path().join("missing"),
            rasterizer: None,
            export_svg: false,
        };
        assert_eq!(output.cleanup().unwrap(), 0);
    }
}
