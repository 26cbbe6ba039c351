use std::path::PathBuf;

use iku_model::{ChartConfig, DashboardVariant, IkuCode, OverallStats};

/// Inputs of one pipeline run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Codes to process, already expanded, in processing order.
    pub codes: Vec<IkuCode>,
    pub header_row: usize,
    pub breakdowns: bool,
    /// Overall achievement layouts to draw; empty skips every dashboard.
    pub dashboards: Vec<DashboardVariant>,
    pub cleanup: bool,
    pub config: ChartConfig,
}

#[derive(Debug)]
pub struct RunResult {
    pub output_dir: PathBuf,
    /// Spreadsheets found in the input directory.
    pub inputs: usize,
    pub metrics: Vec<MetricSummary>,
    /// Charts that belong to no single metric (dashboards).
    pub shared_files: Vec<PathBuf>,
    pub errors: Vec<String>,
    /// A requested metric failed or one of its main charts could not be written.
    pub has_errors: bool,
}

impl RunResult {
    pub fn file_count(&self) -> usize {
        self.metrics.iter().map(|m| m.files.len()).sum::<usize>() + self.shared_files.len()
    }
}

#[derive(Debug)]
pub struct MetricSummary {
    pub code: IkuCode,
    pub stats: OverallStats,
    pub files: Vec<PathBuf>,
}
