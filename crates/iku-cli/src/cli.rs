//! CLI argument definitions for the IKU chart generator.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use iku_model::{DashboardVariant, IkuCode};

#[derive(Parser)]
#[command(
    name = "iku-charts",
    version,
    about = "Generate IKU achievement charts from monitoring spreadsheets",
    long_about = "Generate IKU achievement charts from monitoring spreadsheets.\n\n\
                  Reads monitoring-iku-<code>-<pembilang|penyebut>.xlsx files and writes\n\
                  per-program bar charts, donuts, breakdowns and dashboards as PNG/SVG."
)]
pub struct Cli {
    /// Metric codes to process (e.g. 1 21 41); combined codes include their
    /// sub-metrics. Default: every metric.
    #[arg(value_name = "CODES")]
    pub codes: Vec<IkuCode>,

    /// Folder containing the monitoring spreadsheets.
    #[arg(long = "input-dir", value_name = "DIR", default_value = ".")]
    pub input_dir: PathBuf,

    /// Folder receiving png/ and svg/ subfolders.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Chart configuration file (TOML); missing keys keep their defaults.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Zero-based spreadsheet row holding the column headers.
    #[arg(long = "header-row", value_name = "ROW", default_value_t = iku_ingest::DEFAULT_HEADER_ROW)]
    pub header_row: usize,

    /// Skip breakdown figures.
    #[arg(long = "no-breakdown")]
    pub no_breakdown: bool,

    /// Skip the summary and overall achievement dashboards.
    #[arg(long = "no-dashboard")]
    pub no_dashboard: bool,

    /// Keep charts from previous runs in the output folder.
    #[arg(long = "no-cleanup")]
    pub no_cleanup: bool,

    /// Overall achievement layout to draw.
    #[arg(long = "dashboard", value_enum, default_value = "all")]
    pub dashboard: DashboardArg,

    /// Also write SVG files.
    #[arg(long = "svg")]
    pub svg: bool,

    /// Do not write PNG files.
    #[arg(long = "no-png")]
    pub no_png: bool,

    /// PNG resolution (overrides the configuration file).
    #[arg(long = "dpi", value_name = "N")]
    pub dpi: Option<u32>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Overall achievement layout choices.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum DashboardArg {
    #[value(name = "4x2")]
    Grid4x2,
    Bullet,
    Cards,
    #[value(name = "bullet-4x2")]
    Bullet4x2,
    Thermometer,
    Waffle,
    All,
}

impl DashboardArg {
    pub fn variants(self) -> Vec<DashboardVariant> {
        match self {
            DashboardArg::Grid4x2 => vec![DashboardVariant::Grid4x2],
            DashboardArg::Bullet => vec![DashboardVariant::Bullet],
            DashboardArg::Cards => vec![DashboardVariant::Cards],
            DashboardArg::Bullet4x2 => vec![DashboardVariant::Bullet4x2],
            DashboardArg::Thermometer => vec![DashboardVariant::Thermometer],
            DashboardArg::Waffle => vec![DashboardVariant::Waffle],
            DashboardArg::All => DashboardVariant::ALL.to_vec(),
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_codes_and_flags() {
        let cli = Cli::try_parse_from([
            "iku-charts",
            "1",
            "41",
            "--input-dir",
            "data",
            "--dashboard",
            "bullet-4x2",
            "--svg",
            "--no-png",
            "--dpi",
            "150",
        ])
        .unwrap();
        assert_eq!(cli.codes, vec![IkuCode::Iku1, IkuCode::Iku41]);
        assert_eq!(cli.input_dir, PathBuf::from("data"));
        assert_eq!(cli.output_dir, PathBuf::from("output"));
        assert_eq!(cli.dashboard.variants(), vec![DashboardVariant::Bullet4x2]);
        assert!(cli.svg && cli.no_png);
        assert_eq!(cli.dpi, Some(150));
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        assert!(Cli::try_parse_from(["iku-charts", "99"]).is_err());
    }

    #[test]
    fn test_default_dashboard_is_all() {
        let cli = Cli::try_parse_from(["iku-charts"]).unwrap();
        assert_eq!(cli.dashboard.variants().len(), 6);
        assert!(cli.codes.is_empty());
    }
}
