use std::path::{Path, PathBuf};

use hunger_trends::AnalysisError;
use hunger_trends::analysis::{Inputs, derive, run};
use hunger_trends::config::AnalysisConfig;
use hunger_trends::types::{DataType, Table, Value};

fn fixture_config(output_dir: &Path) -> AnalysisConfig {
    AnalysisConfig {
        hunger_index_path: PathBuf::from("tests/fixtures/global-hunger-index.csv"),
        child_weight_path: PathBuf::from("tests/fixtures/share-of-children-underweight.csv"),
        continent_path: PathBuf::from("tests/fixtures/countryContinent.csv"),
        output_dir: output_dir.to_path_buf(),
        ..Default::default()
    }
}

fn texts(table: &Table, column: &str) -> Vec<String> {
    table.column(column).unwrap().iter().map(|v| v.to_string()).collect()
}

fn approx(v: &Value, expected: f64) -> bool {
    matches!(v, Value::Float64(x) if (x - expected).abs() < 1e-9)
}

#[test]
fn schema_reports_cover_all_three_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = Inputs::load(&fixture_config(dir.path())).unwrap();
    let reports = inputs.reports();

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].table.as_deref(), Some("hunger index"));
    assert_eq!(reports[0].null_count("Global Hunger Index (2021)"), Some(1));
    assert_eq!(reports[1].column_type("Year"), Some(DataType::Int64));
    assert_eq!(reports[2].rows, 7);

    let printed = reports[2].to_string();
    assert!(printed.starts_with("******************\ncontinents (7 rows)\n"));
    assert!(printed.contains("sub_region"));
}

#[test]
fn continent_trends_average_matched_countries() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path());
    let derived = derive(&Inputs::load(&config).unwrap(), &config).unwrap();

    // Kosovo has no continent and is left out of the trends.
    assert_eq!(derived.hunger_index.row_count(), 15);
    assert_eq!(derived.trends.row_count(), 10);
    let names: Vec<&str> = derived.trends.schema.field_names().collect();
    assert_eq!(names, vec!["continent", "Year", "GHI"]);

    let africa_2000 = &derived.trends.rows[0];
    assert_eq!(africa_2000[0], Value::text("Africa"));
    assert_eq!(africa_2000[1], Value::Int64(2000));
    assert!(approx(&africa_2000[2], (50.7 + 36.6 + 33.6) / 3.0));

    // Albania's 2021 value is missing, so Europe 2021 has no mean.
    let europe_2021 = derived
        .trends
        .rows
        .iter()
        .find(|r| r[0] == Value::text("Europe") && r[1] == Value::Int64(2021))
        .unwrap();
    assert_eq!(europe_2021[2], Value::Null);
}

#[test]
fn child_trend_is_ordered_by_mean() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path());
    let derived = derive(&Inputs::load(&config).unwrap(), &config).unwrap();

    assert_eq!(
        texts(&derived.child_trend, "period"),
        vec!["2011-2015", "2016-2021", "2001-2005", "1996-2000", "2006-2010", "Before 1996"]
    );
    assert!(approx(&derived.child_trend.rows[2][1], 16.5));
    assert_eq!(derived.child_weight.schema.index_of("period"), Some(4));
}

#[test]
fn ranking_and_comparison_tables() {
    let dir = tempfile::tempdir().unwrap();
    let config = AnalysisConfig {
        top_n: 3,
        ..fixture_config(dir.path())
    };
    let derived = derive(&Inputs::load(&config).unwrap(), &config).unwrap();

    assert_eq!(texts(&derived.top, "country"), vec!["Kenya", "India", "Chad"]);
    assert_eq!(derived.change.row_count(), 15);
}

#[test]
fn run_writes_four_charts() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("charts");
    let report = run(&fixture_config(&out)).unwrap();

    let expected: Vec<PathBuf> = [
        "trends_by_continent.svg",
        "underweight_by_period.svg",
        "ghi_change_2000_2021.svg",
        "top_ghi_2021.svg",
    ]
    .iter()
    .map(|f| out.join(f))
    .collect();
    assert_eq!(report.charts, expected);

    for path in &report.charts {
        let svg = std::fs::read_to_string(path).unwrap();
        assert!(svg.starts_with("<svg"), "{}", path.display());
        assert!(svg.trim_end().ends_with("</svg>"));
    }
    let top = std::fs::read_to_string(&expected[3]).unwrap();
    assert!(top.contains("Top 10 Countries with Highest GHI in 2021"));
    assert!(top.contains("Cote d&apos;Ivoire") || top.contains("Cote d&#39;Ivoire"));
}

#[test]
fn missing_input_fails_before_any_chart() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("charts");
    let config = AnalysisConfig {
        child_weight_path: PathBuf::from("tests/fixtures/nope.csv"),
        ..fixture_config(&out)
    };

    let err = run(&config).unwrap_err();
    assert!(matches!(err, AnalysisError::Io(_)));
    assert!(!out.exists());
}

#[test]
fn run_appends_each_load_to_the_configured_log() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("loads.log");
    let config = AnalysisConfig {
        load_log: Some(log.clone()),
        ..fixture_config(&dir.path().join("charts"))
    };
    run(&config).unwrap();

    let contents = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3, "{contents}");
    assert!(lines.iter().all(|l| l.contains(" loaded ")));
    assert!(lines[2].contains("countryContinent.csv encoding=ISO-8859-1 rows=7 columns=6"));
}
