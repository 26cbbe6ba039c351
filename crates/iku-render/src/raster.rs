//! PNG export through `resvg`.

use std::path::Path;

use image::{ImageBuffer, RgbaImage};
use resvg::tiny_skia::{self, Pixmap};
use resvg::usvg::{Options, Tree};
use tracing::debug;

use crate::chart::Chart;
use crate::error::{RenderError, Result};
use crate::svg::POINTS_PER_INCH;

/// Converts chart SVGs to bitmaps at a fixed resolution.
///
/// System fonts are loaded once when the rasterizer is created.
pub struct Rasterizer {
    options: Options<'static>,
    scale: f32,
}

impl Rasterizer {
    pub fn new(dpi: u32) -> Self {
        let mut options = Options::default();
        options.fontdb_mut().load_system_fonts();
        debug!(fonts = options.fontdb.len(), dpi, "loaded font database");
        Self {
            options,
            scale: dpi.max(1) as f32 / POINTS_PER_INCH as f32,
        }
    }

    pub fn render(&self, chart: &Chart) -> Result<RgbaImage> {
        let raster_error = |message: String| RenderError::Raster {
            name: chart.name.clone(),
            message,
        };
        let tree = Tree::from_data(chart.svg.as_bytes(), &self.options)
            .map_err(|e| raster_error(e.to_string()))?;

        let size = tree.size();
        let width = (size.width() * self.scale).ceil() as u32;
        let height = (size.height() * self.scale).ceil() as u32;
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| raster_error(format!("cannot allocate {width}x{height} pixmap")))?;

        let transform = tiny_skia::Transform::from_scale(self.scale, self.scale);
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        ImageBuffer::from_raw(width, height, pixmap.take())
            .ok_or_else(|| raster_error("pixmap size does not match image buffer".to_string()))
    }

    /// Renders `chart` and writes it to `path` as PNG.
    pub fn save_png(&self, chart: &Chart, path: &Path) -> Result<()> {
        let image = self.render(chart)?;
        image.save(path).map_err(|e| RenderError::Image {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::{Canvas, Paint};

    #[test]
    fn test_render_scales_with_dpi() {
        let mut canvas = Canvas::new(2.0, 1.0, "sans-serif");
        canvas.rect(10.0, 10.0, 50.0, 20.0, &Paint::fill("#28a745"));
        let chart = Chart::new("IKU_test_swatch", canvas).unwrap();

        let image = Rasterizer::new(144).render(&chart).unwrap();
        assert_eq!(image.dimensions(), (288, 144));
        // Inside the rectangle (scaled by 2).
        let pixel = image.get_pixel(40, 40);
        assert_eq!(pixel.0, [0x28, 0xa7, 0x45, 0xff]);
    }

    #[test]
    fn test_invalid_svg_is_reported() {
        let chart = Chart {
            name: "broken".to_string(),
            svg: "<svg".to_string(),
        };
        let err = Rasterizer::new(72).render(&chart).unwrap_err();
        assert!(matches!(err, RenderError::Raster { ref name, .. } if name == "broken"));
    }
}
