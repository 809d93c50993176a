use std::sync::{Arc, Mutex};

use hunger_trends::AnalysisError;
use hunger_trends::ingestion::{
    CompositeObserver, FileObserver, LoadContext, LoadObserver, LoadOptions, LoadSeverity, LoadStats, load,
};

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<LoadStats>>,
    failures: Mutex<Vec<LoadSeverity>>,
    alerts: Mutex<Vec<LoadSeverity>>,
}

impl LoadObserver for RecordingObserver {
    fn on_success(&self, _ctx: &LoadContext, stats: LoadStats) {
        self.successes.lock().unwrap().push(stats);
    }

    fn on_failure(&self, _ctx: &LoadContext, severity: LoadSeverity, _error: &AnalysisError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &LoadContext, severity: LoadSeverity, _error: &AnalysisError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn observed(obs: Arc<dyn LoadObserver>) -> LoadOptions {
    LoadOptions {
        observer: Some(obs),
        alert_at_or_above: LoadSeverity::Critical,
        ..Default::default()
    }
}

#[test]
fn observer_receives_stats_on_success() {
    let obs = Arc::new(RecordingObserver::default());
    load("tests/fixtures/global-hunger-index.csv", &observed(obs.clone())).unwrap();

    assert_eq!(
        obs.successes.lock().unwrap().clone(),
        vec![LoadStats {
            rows: 15,
            columns: 4
        }]
    );
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());

    // Missing file -> Io error -> Critical
    let _ = load("tests/fixtures/does_not_exist.csv", &observed(obs.clone())).unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![LoadSeverity::Critical]);
    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![LoadSeverity::Critical]);
}

#[test]
fn observer_receives_failure_without_alert_for_malformed_input() {
    let obs = Arc::new(RecordingObserver::default());

    // Ragged row -> Parse error -> Error severity (not Critical) -> no alert
    let _ = load("tests/fixtures/ragged.csv", &observed(obs.clone())).unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![LoadSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn composite_fans_out_and_file_observer_appends() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("loads.log");
    let recording = Arc::new(RecordingObserver::default());
    let composite = CompositeObserver::new(vec![
        recording.clone() as Arc<dyn LoadObserver>,
        Arc::new(FileObserver::new(&log)),
    ]);
    let opts = observed(Arc::new(composite));

    load("tests/fixtures/global-hunger-index.csv", &opts).unwrap();
    let _ = load("tests/fixtures/does_not_exist.csv", &opts).unwrap_err();

    assert_eq!(recording.successes.lock().unwrap().len(), 1);
    assert_eq!(recording.alerts.lock().unwrap().len(), 1);

    let contents = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3, "{contents}");
    assert!(lines[0].contains(" loaded tests/fixtures/global-hunger-index.csv encoding=UTF-8 rows=15 columns=4"));
    assert!(lines[1].contains(" failed tests/fixtures/does_not_exist.csv "));
    assert!(lines[1].contains(" severity=Critical error=io error: "));
    assert!(lines[2].contains(" ALERT tests/fixtures/does_not_exist.csv "));
}

#[test]
fn unwritable_log_does_not_fail_the_load() {
    let dir = tempfile::tempdir().unwrap();
    // The log path is a directory, so opening it for append fails.
    let opts = observed(Arc::new(FileObserver::new(dir.path())));

    let table = load("tests/fixtures/global-hunger-index.csv", &opts).unwrap();
    assert_eq!(table.row_count(), 15);
}
