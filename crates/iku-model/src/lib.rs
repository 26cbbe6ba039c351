//! IKU domain model.
//!
//! Static tables (metric catalogue, program → jurusan mapping, palettes),
//! label normalization, and the small result types the aggregation and
//! chart crates exchange.

mod config;
mod department;
mod error;
mod metric;
mod normalize;
mod stats;

// === Metrics ===
pub use metric::{ALL_IKU, COMBINED_IKU, IkuCode, MetricInfo, expand_codes};

// === Departments ===
pub use department::{
    HasProgram, JURUSAN_ORDER, Jurusan, PROGRAMS, Palette, assign_colors, jurusan_for,
    lookup_jurusan, program_color, sort_by_jurusan,
};

// === Normalization ===
pub use normalize::{normalize_program, strip_level_prefix, strip_program_prefix};

// === Results ===
pub use stats::{
    Achievement, BULLET_ON_TRACK, DONUT_ON_TRACK, OverallStats, ProgramRow, percentage,
};

// === Configuration ===
pub use config::{ChartConfig, ColorPalette, DashboardVariant};

// === Errors ===
pub use error::{IkuError, Result};
