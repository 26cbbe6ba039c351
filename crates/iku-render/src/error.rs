//! Error types for chart drawing and export.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing SVG markup failed.
    #[error("failed to write SVG: {0}")]
    Svg(String),

    /// The SVG could not be parsed back for rasterization.
    #[error("failed to rasterize {name}: {message}")]
    Raster { name: String, message: String },

    /// Encoding or saving the PNG failed.
    #[error("failed to save image {path}: {message}")]
    Image { path: PathBuf, message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;
