//! Chart generation pipeline.
//!
//! Stages run in order inside their own spans:
//!
//! 1. **prepare**: create the output directory and remove old charts
//! 2. **metric** (once per code): aggregate, draw the program charts, the
//!    donuts of combined indicators and the breakdown figures
//! 3. **dashboards**: summary dashboard and overall achievement layouts
//!
//! A metric that fails is reported and the run moves on to the next one.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use iku_core::{MetricResult, build_breakdowns, process_metric};
use iku_ingest::{MetricSource, XlsxSource, list_metric_files};
use iku_model::{ChartConfig, IkuCode};
use iku_render::{
    Chart, OutputDir, breakdown_donut, breakdown_figure, horizontal, main_donut,
    overall_achievement, summary_dashboard, vertical,
};
use tracing::{debug, error, info, info_span, warn};

use crate::types::{MetricSummary, RunOptions, RunResult};

/// Runs every stage for `options`.
///
/// # Errors
///
/// Fails only when the run cannot start (missing input directory,
/// unwritable output directory). Per-metric failures are collected in
/// [`RunResult::errors`].
pub fn run(options: &RunOptions) -> Result<RunResult> {
    let inputs = list_metric_files(&options.input_dir).context("scan input directory")?;
    info!(spreadsheets = inputs.len(), "found input spreadsheets");
    for file in &inputs {
        debug!(iku = %file.code, kind = %file.kind, path = %file.path.display(), "input");
    }

    let prepare_span = info_span!("prepare", output_dir = %options.output_dir.display());
    let output = prepare_span.in_scope(|| prepare(options))?;

    let source = XlsxSource::new(&options.input_dir).with_header_row(options.header_row);
    let mut result = RunResult {
        output_dir: options.output_dir.clone(),
        inputs: inputs.len(),
        metrics: Vec::new(),
        shared_files: Vec::new(),
        errors: Vec::new(),
        has_errors: false,
    };

    for &code in &options.codes {
        let span = info_span!("metric", iku = %code);
        let start = Instant::now();
        span.in_scope(|| render_metric(code, &source, &output, options, &mut result));
        debug!(
            iku = %code,
            duration_ms = start.elapsed().as_millis(),
            "metric finished"
        );
    }
    info!(
        metrics = result.metrics.len(),
        tables = source.cached(),
        "processed metrics"
    );

    if !options.dashboards.is_empty() {
        let span = info_span!("dashboards");
        let start = Instant::now();
        span.in_scope(|| render_dashboards(&output, options, &mut result));
        info!(
            duration_ms = start.elapsed().as_millis(),
            files = result.shared_files.len(),
            "dashboards complete"
        );
    }

    Ok(result)
}

fn prepare(options: &RunOptions) -> Result<OutputDir> {
    let output = OutputDir::create(&options.output_dir, &options.config).with_context(|| {
        format!(
            "prepare output directory {}",
            options.output_dir.display()
        )
    })?;
    if options.cleanup {
        output.cleanup().context("clean output directory")?;
    }
    Ok(output)
}

fn render_metric(
    code: IkuCode,
    source: &dyn MetricSource,
    output: &OutputDir,
    options: &RunOptions,
    result: &mut RunResult,
) {
    let metric = match process_metric(code, source) {
        Ok(metric) => metric,
        Err(e) => {
            if e.is_missing_input() {
                warn!(iku = %code, error = %e, "skipping metric");
            } else {
                error!(iku = %code, error = %e, "metric failed");
            }
            result.errors.push(format!("IKU {code}: {e}"));
            result.has_errors = true;
            return;
        }
    };
    info!(
        iku = %code,
        numerator = metric.stats.numerator,
        denominator = metric.stats.denominator,
        percentage = metric.stats.percentage,
        programs = metric.rows.len(),
        "aggregated"
    );

    let mut files = Vec::new();
    for chart in main_charts(&metric, &options.config) {
        match chart.and_then(|chart| output.save(&chart)) {
            Ok(paths) => files.extend(paths),
            Err(e) => {
                error!(iku = %code, error = %e, "chart failed");
                result.errors.push(format!("IKU {code}: {e}"));
                result.has_errors = true;
            }
        }
    }

    if options.breakdowns && code.has_breakdown() {
        let span = info_span!("breakdown", iku = %code);
        span.in_scope(|| match render_breakdowns(code, source, output, &options.config) {
            Ok(paths) => files.extend(paths),
            Err(e) => {
                warn!(iku = %code, error = %e, "breakdown failed");
                result.errors.push(format!("IKU {code} breakdown: {e:#}"));
            }
        });
    }

    result.metrics.push(MetricSummary {
        code,
        stats: metric.stats,
        files,
    });
}

/// Program bar charts, plus the donuts of a combined indicator.
fn main_charts(metric: &MetricResult, config: &ChartConfig) -> Vec<iku_render::Result<Chart>> {
    let mut charts = vec![
        horizontal(metric.code, &metric.rows, config),
        vertical(metric.code, &metric.rows, config),
    ];
    if metric.code.is_combined() {
        if metric.components.len() > 1 {
            charts.push(breakdown_donut(metric.code, &metric.components, config));
        }
        charts.push(main_donut(metric.code, &metric.stats, config));
    }
    charts
}

fn render_breakdowns(
    code: IkuCode,
    source: &dyn MetricSource,
    output: &OutputDir,
    config: &ChartConfig,
) -> Result<Vec<PathBuf>> {
    let figures = build_breakdowns(code, source).context("build breakdown figures")?;
    let mut files = Vec::new();
    for figure in &figures {
        let chart = breakdown_figure(figure, config)
            .with_context(|| format!("draw {}", figure.name))?;
        files.extend(
            output
                .save(&chart)
                .with_context(|| format!("save {}", figure.name))?,
        );
    }
    debug!(iku = %code, figures = figures.len(), "breakdown figures written");
    Ok(files)
}

fn render_dashboards(output: &OutputDir, options: &RunOptions, result: &mut RunResult) {
    let config = &options.config;
    let (combined, sub_metrics): (Vec<_>, Vec<_>) = result
        .metrics
        .iter()
        .map(|metric| (metric.code, metric.stats))
        .partition(|(code, _)| code.is_combined());

    let mut charts = Vec::new();
    if !sub_metrics.is_empty() {
        charts.push(summary_dashboard(&sub_metrics, config));
    }
    if combined.is_empty() {
        info!("no combined indicators processed, skipping overall achievement");
    } else {
        charts.extend(
            options
                .dashboards
                .iter()
                .map(|variant| overall_achievement(*variant, &combined, config)),
        );
    }

    for chart in charts {
        match chart.and_then(|chart| output.save(&chart)) {
            Ok(paths) => result.shared_files.extend(paths),
            Err(e) => {
                error!(error = %e, "dashboard failed");
                result.errors.push(format!("dashboard: {e}"));
                result.has_errors = true;
            }
        }
    }
}
