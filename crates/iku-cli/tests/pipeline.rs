//! End-to-end runs of the chart pipeline on generated spreadsheets.

use std::fs;
use std::path::{Path, PathBuf};

use iku_cli::pipeline::run;
use iku_cli::types::RunOptions;
use iku_model::{ChartConfig, DashboardVariant, IkuCode};
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

/// Writes a sheet with a title row, then the header row, then `rows`.
fn write_sheet(path: &Path, headers: &[&str], rows: &[Vec<&str>]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Monitoring IKU 2025").unwrap();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(1, col as u16, *header).unwrap();
    }
    for (idx, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            sheet.write_string(idx as u32 + 2, col as u16, *value).unwrap();
        }
    }
    workbook.save(path).unwrap();
}

fn write_iku_41(dir: &Path) {
    write_sheet(
        &dir.join("monitoring-iku-41-pembilang.xlsx"),
        &[
            "NIP",
            "Nama",
            "Program Studi",
            "Lembaga Sertifikasi",
            "Bidang Sertifikasi",
        ],
        &[
            vec!["1", "Ani", "Kimia", "BNSP", "Laboratorium"],
            vec!["2", "Budi", "Program Studi Kimia", "BNSP", "K3"],
            vec!["3", "Citra", "Fisika", "LSP Energi", "Energi"],
        ],
    );
    write_sheet(
        &dir.join("monitoring-iku-41-penyebut.xlsx"),
        &["NIP", "Nama", "Program Studi"],
        &[
            vec!["1", "Ani", "Kimia"],
            vec!["2", "Budi", "Kimia"],
            vec!["3", "Citra", "Fisika"],
            vec!["4", "Dedi", "Biologi"],
        ],
    );
}

const LECTURERS: [&str; 3] = ["NIP", "Nama", "Program Studi"];

fn lecturer_list() -> Vec<Vec<&'static str>> {
    vec![
        vec!["1", "Ani", "Kimia"],
        vec!["2", "Budi", "Kimia"],
        vec!["3", "Citra", "Fisika"],
        vec!["4", "Dedi", "Biologi"],
    ]
}

/// IKU 42 practitioners; only the pembilang when `with_penyebut` is false.
fn write_iku_42(dir: &Path, with_penyebut: bool) {
    write_sheet(
        &dir.join("monitoring-iku-42-pembilang.xlsx"),
        &LECTURERS,
        &[vec!["4", "Dedi", "Biologi"], vec!["1", "Ani", "Kimia"]],
    );
    if with_penyebut {
        write_sheet(
            &dir.join("monitoring-iku-42-penyebut.xlsx"),
            &LECTURERS,
            &lecturer_list(),
        );
    }
}

fn write_iku_71(dir: &Path) {
    write_sheet(
        &dir.join("monitoring-iku-71-pembilang.xlsx"),
        &["Program Studi", "Mata Kuliah"],
        &[vec!["Fisika", "Fisika Dasar"]],
    );
    write_sheet(
        &dir.join("monitoring-iku-71-penyebut.xlsx"),
        &["Program Studi", "Mata Kuliah"],
        &[
            vec!["Fisika", "Fisika Dasar"],
            vec!["Fisika", "Mekanika"],
            vec!["Kimia", "Kimia Dasar"],
        ],
    );
}

fn options(input: &Path, output: &Path, codes: Vec<IkuCode>) -> RunOptions {
    RunOptions {
        input_dir: input.to_path_buf(),
        output_dir: output.to_path_buf(),
        codes,
        header_row: 1,
        breakdowns: true,
        dashboards: DashboardVariant::ALL.to_vec(),
        cleanup: true,
        config: ChartConfig {
            export_png: false,
            export_svg: true,
            ..ChartConfig::default()
        },
    }
}

fn svg_names(output: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(output.join("svg"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_single_metric_run() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_iku_41(input.path());

    let result = run(&options(input.path(), output.path(), vec![IkuCode::Iku41])).unwrap();

    assert!(!result.has_errors, "errors: {:?}", result.errors);
    assert_eq!(result.inputs, 2);
    assert_eq!(result.metrics.len(), 1);
    let metric = &result.metrics[0];
    assert_eq!(metric.stats.numerator, 3.0);
    assert_eq!(metric.stats.denominator, 4.0);
    assert_eq!(metric.stats.percentage, 75.0);
    assert_eq!(
        svg_names(output.path()),
        vec![
            "IKU_41_breakdown_statistik.svg",
            "IKU_41_horizontal.svg",
            "IKU_41_vertical.svg",
            "IKU_summary_dashboard.svg",
        ]
    );
    assert!(!output.path().join("png").exists());

    let horizontal =
        fs::read_to_string(output.path().join("svg/IKU_41_horizontal.svg")).unwrap();
    assert!(horizontal.starts_with("<?xml"));
    assert!(horizontal.contains(">Kimia<"));
    assert!(horizontal.contains(">Biologi<"));
    assert!(horizontal.contains(">Target (20.14%)<"));
}

#[test]
fn test_missing_metric_does_not_stop_the_run() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_iku_41(input.path());

    let mut opts = options(
        input.path(),
        output.path(),
        vec![IkuCode::Iku11, IkuCode::Iku41],
    );
    opts.breakdowns = false;
    opts.dashboards.clear();
    let result = run(&opts).unwrap();

    assert!(result.has_errors);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("monitoring-iku-11-pembilang.xlsx"));
    assert_eq!(result.metrics.len(), 1);
    assert_eq!(result.metrics[0].code, IkuCode::Iku41);
    assert_eq!(result.metrics[0].files.len(), 2);
}

#[test]
fn test_cleanup_replaces_previous_charts() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_iku_41(input.path());
    let stale = output.path().join("svg").join("IKU_99_old.svg");
    let notes = output.path().join("svg").join("README.txt");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, "<svg/>").unwrap();
    fs::write(&notes, "keep").unwrap();

    let mut opts = options(input.path(), output.path(), vec![IkuCode::Iku41]);
    opts.cleanup = false;
    run(&opts).unwrap();
    assert!(stale.exists());

    opts.cleanup = true;
    run(&opts).unwrap();
    assert!(!stale.exists());
    assert!(notes.exists());
}

#[test]
fn test_missing_input_directory_fails() {
    let output = TempDir::new().unwrap();
    let missing = PathBuf::from("/nonexistent/iku-input");
    let err = run(&options(&missing, output.path(), vec![IkuCode::Iku41])).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.starts_with("scan input directory"));
    assert!(message.contains("directory not found: /nonexistent/iku-input"));
}

#[test]
fn test_combined_metrics_add_donuts_and_selected_dashboards() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_iku_41(input.path());
    write_iku_42(input.path(), true);
    write_iku_71(input.path());

    let mut opts = options(
        input.path(),
        output.path(),
        vec![
            IkuCode::Iku4,
            IkuCode::Iku41,
            IkuCode::Iku42,
            IkuCode::Iku7,
            IkuCode::Iku71,
        ],
    );
    opts.breakdowns = false;
    opts.dashboards = vec![DashboardVariant::Cards, DashboardVariant::Waffle];
    let result = run(&opts).unwrap();

    assert!(!result.has_errors, "errors: {:?}", result.errors);
    assert_eq!(result.metrics.len(), 5);
    let iku4 = &result.metrics[0];
    assert_eq!(iku4.code, IkuCode::Iku4);
    assert_eq!(iku4.stats.numerator, 4.0);
    assert_eq!(iku4.stats.denominator, 4.0);
    assert_eq!(result.shared_files.len(), 3);
    assert_eq!(
        svg_names(output.path()),
        vec![
            "IKU_41_horizontal.svg",
            "IKU_41_vertical.svg",
            "IKU_42_horizontal.svg",
            "IKU_42_vertical.svg",
            "IKU_4_breakdown_donut.svg",
            "IKU_4_horizontal.svg",
            "IKU_4_main_donut.svg",
            "IKU_4_vertical.svg",
            "IKU_71_horizontal.svg",
            "IKU_71_vertical.svg",
            "IKU_7_horizontal.svg",
            "IKU_7_main_donut.svg",
            "IKU_7_vertical.svg",
            "IKU_overall_achievement_cards.svg",
            "IKU_overall_achievement_waffle.svg",
            "IKU_summary_dashboard.svg",
        ]
    );
}

#[test]
fn test_missing_sub_metric_denominator_keeps_main_charts() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_iku_41(input.path());
    write_iku_42(input.path(), false);

    let mut opts = options(input.path(), output.path(), vec![IkuCode::Iku4]);
    opts.breakdowns = false;
    opts.dashboards.clear();
    let result = run(&opts).unwrap();

    assert!(!result.has_errors, "errors: {:?}", result.errors);
    assert_eq!(result.metrics.len(), 1);
    assert_eq!(
        svg_names(output.path()),
        vec![
            "IKU_4_horizontal.svg",
            "IKU_4_main_donut.svg",
            "IKU_4_vertical.svg",
        ]
    );
}
