//! Chart drawing for IKU results.
//!
//! Every chart is first drawn as an SVG document ([`Chart`]) and then
//! written by [`OutputDir`] as PNG (rasterized with `resvg`) and optionally
//! as SVG.
//!
//! | Family | Builder | File stem |
//! |--------|---------|-----------|
//! | Program bars | [`horizontal`], [`vertical`] | `IKU_<code>_horizontal`, `IKU_<code>_vertical` |
//! | Donuts | [`breakdown_donut`], [`main_donut`] | `IKU_<code>_breakdown_donut`, `IKU_<code>_main_donut` |
//! | Dashboards | [`summary_dashboard`], [`overall_achievement`] | `IKU_summary_dashboard`, `IKU_overall_achievement_<variant>` |
//! | Breakdowns | [`breakdown_figure`] | figure name |

pub mod bar;
pub mod breakdown;
pub mod chart;
pub mod dashboard;
pub mod donut;
pub mod error;
pub mod layout;
pub mod output;
pub mod raster;
pub mod svg;

pub use bar::{horizontal, vertical};
pub use breakdown::breakdown_figure;
pub use chart::{Chart, metric_heading};
pub use dashboard::{overall_achievement, summary_dashboard};
pub use donut::{breakdown_donut, main_donut};
pub use error::{RenderError, Result};
pub use output::OutputDir;
pub use raster::Rasterizer;
