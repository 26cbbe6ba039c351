use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use iku_cli::types::{MetricSummary, RunResult};
use iku_model::{Achievement, DONUT_ON_TRACK, IkuCode, OverallStats};

pub fn print_summary(result: &RunResult) {
    println!("Generated: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!("Output: {}", result.output_dir.display());
    println!("Input spreadsheets: {}", result.inputs);
    if !result.metrics.is_empty() {
        println!("{}", summary_table(result));
    }
    if !result.shared_files.is_empty() {
        println!("Dashboards: {} files", result.shared_files.len());
    }
    if !result.errors.is_empty() {
        eprintln!("Errors:");
        for error in &result.errors {
            eprintln!("- {error}");
        }
    }
}

fn summary_table(result: &RunResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("IKU"),
        header_cell("Indikator"),
        header_cell("Pembilang"),
        header_cell("Penyebut"),
        header_cell("Capaian"),
        header_cell("Target"),
        header_cell("Status"),
        header_cell("Files"),
    ]);
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    for index in [2, 3, 4, 7] {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 6, CellAlignment::Center);

    for metric in &result.metrics {
        table.add_row(metric_row(metric));
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} metrics", result.metrics.len()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(result.file_count()).add_attribute(Attribute::Bold),
    ]);
    table
}

fn metric_row(metric: &MetricSummary) -> Vec<Cell> {
    let code = metric.code;
    let stats = &metric.stats;
    let code_cell = if code.is_combined() {
        Cell::new(code)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new(format!("  {code}"))
    };
    vec![
        code_cell,
        Cell::new(short_title(code)),
        Cell::new(stats.numerator),
        Cell::new(stats.denominator),
        Cell::new(format!("{}%", stats.percentage)),
        Cell::new(code.target_label()),
        status_cell(status(code, stats)),
        Cell::new(metric.files.len()),
    ]
}

/// Catalogue title without the `IKU x.y:` prefix.
fn short_title(code: IkuCode) -> &'static str {
    let title = code.info().title;
    title
        .split_once(": ")
        .map_or(title, |(_, rest)| rest)
}

fn status(code: IkuCode, stats: &OverallStats) -> Achievement {
    let target = if stats.number_based { 100.0 } else { code.target() };
    stats.achievement(target, DONUT_ON_TRACK)
}

fn status_cell(status: Achievement) -> Cell {
    let color = match status {
        Achievement::Achieved => Color::Green,
        Achievement::OnTrack => Color::Yellow,
        Achievement::Gap => Color::Red,
    };
    Cell::new(status.label())
        .fg(color)
        .add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn summary(code: IkuCode, stats: OverallStats, files: usize) -> MetricSummary {
        MetricSummary {
            code,
            stats,
            files: (0..files).map(|i| PathBuf::from(format!("{i}.png"))).collect(),
        }
    }

    #[test]
    fn test_status_uses_effective_target() {
        assert_eq!(
            status(IkuCode::Iku41, &OverallStats::from_counts(1, 4)),
            Achievement::Achieved
        );
        assert_eq!(
            status(IkuCode::Iku11, &OverallStats::from_counts(9, 20)),
            Achievement::OnTrack
        );
        assert_eq!(
            status(IkuCode::Iku6, &OverallStats::against_target(1.0, 2.0)),
            Achievement::Gap
        );
    }

    #[test]
    fn test_short_title() {
        assert_eq!(short_title(IkuCode::Iku62), "Kerjasama per Program Studi");
    }

    #[test]
    fn test_summary_table_rows() {
        let result = RunResult {
            output_dir: PathBuf::from("output"),
            inputs: 4,
            metrics: vec![
                summary(IkuCode::Iku4, OverallStats::from_counts(3, 10), 4),
                summary(IkuCode::Iku41, OverallStats::from_counts(1, 4), 3),
            ],
            shared_files: vec![PathBuf::from("IKU_summary_dashboard.png")],
            errors: Vec::new(),
            has_errors: false,
        };
        let mut table = summary_table(&result);
        table.force_no_tty();
        let text = table.to_string();
        assert!(text.contains("30%"));
        assert!(text.contains("25%"));
        assert!(text.contains("20.14%"));
        assert!(text.contains("ACHIEVED"));
        assert!(text.contains("TOTAL"));
        assert!(text.contains("2 metrics"));
        assert!(text.contains(" 8 "));
    }
}
