//! Library side of the `iku-charts` binary.

pub mod logging;
pub mod pipeline;
pub mod types;
