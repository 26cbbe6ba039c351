//! Aggregation of IKU spreadsheets into per-program results.
//!
//! [`process_metric`] turns the numerator and denominator tables of a
//! metric into sorted [`iku_model::ProgramRow`]s plus faculty totals.
//! [`build_breakdowns`] describes the detail figures of the sub-metrics.

pub mod aggregate;
pub mod breakdown;
pub mod combined;
pub mod error;
pub mod processors;

pub use aggregate::{
    GroupKey, aggregate_by_program, count_by_program, id_lookup, include_programs,
    numerator_programs, overall_stats, presence_by_program, value_counts,
};
pub use breakdown::{
    Bar, BarPanel, Figure, LegendEntry, Orientation, Panel, PiePanel, Slice, TablePanel,
    build_breakdowns,
};
pub use combined::process_combined;
pub use error::{CoreError, Result};
pub use processors::{
    MetricResult, process_metric, process_sub_metric, program_column, sub_metric_stats,
};
