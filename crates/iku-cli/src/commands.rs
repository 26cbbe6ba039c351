use std::time::Instant;

use anyhow::{Context, Result};
use iku_cli::pipeline::run;
use iku_cli::types::{RunOptions, RunResult};
use iku_model::{ChartConfig, expand_codes};
use tracing::{info, info_span};

use crate::cli::Cli;

pub fn run_charts(cli: &Cli) -> Result<RunResult> {
    let options = run_options(cli)?;
    let span = info_span!(
        "run",
        input_dir = %options.input_dir.display(),
        codes = options.codes.len()
    );
    let _guard = span.enter();
    let start = Instant::now();
    let result = run(&options)?;
    info!(
        files = result.file_count(),
        errors = result.errors.len(),
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );
    Ok(result)
}

/// Resolves configuration layers: defaults, then the TOML file, then flags.
pub fn run_options(cli: &Cli) -> Result<RunOptions> {
    let mut config = match &cli.config {
        Some(path) => ChartConfig::load(path)
            .with_context(|| format!("load chart config {}", path.display()))?,
        None => ChartConfig::default(),
    };
    if let Some(dpi) = cli.dpi {
        config.dpi = dpi;
    }
    if cli.svg {
        config.export_svg = true;
    }
    if cli.no_png {
        config.export_png = false;
    }

    Ok(RunOptions {
        input_dir: cli.input_dir.clone(),
        output_dir: cli.output_dir.clone(),
        codes: expand_codes(&cli.codes),
        header_row: cli.header_row,
        breakdowns: !cli.no_breakdown,
        dashboards: if cli.no_dashboard {
            Vec::new()
        } else {
            cli.dashboard.variants()
        },
        cleanup: !cli.no_cleanup,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use iku_model::IkuCode;
    use std::io::Write;

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dpi = 150\nexport_svg = false\nyear = 2026").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let cli = Cli::try_parse_from([
            "iku-charts",
            "2",
            "--config",
            path.as_str(),
            "--dpi",
            "96",
            "--svg",
            "--no-dashboard",
        ])
        .unwrap();
        let options = run_options(&cli).unwrap();
        assert_eq!(options.config.dpi, 96);
        assert!(options.config.export_svg);
        assert!(options.config.export_png);
        assert_eq!(options.config.year, 2026);
        assert_eq!(
            options.codes,
            vec![IkuCode::Iku2, IkuCode::Iku21, IkuCode::Iku22, IkuCode::Iku23]
        );
        assert!(options.dashboards.is_empty());
        assert!(options.breakdowns && options.cleanup);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli =
            Cli::try_parse_from(["iku-charts", "--config", "/nonexistent/iku.toml"]).unwrap();
        let err = run_options(&cli).unwrap_err();
        assert!(err.to_string().contains("load chart config"));
    }
}
