use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::AnalysisError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (the load failed on malformed input).
    Error,
    /// Critical error (I/O failures: missing or unreadable files).
    Critical,
}

impl LoadSeverity {
    /// Severity assigned to a failed load.
    pub fn for_error(e: &AnalysisError) -> Self {
        match e {
            AnalysisError::Io(_) => Self::Critical,
            AnalysisError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => Self::Critical,
                _ => Self::Error,
            },
            _ => Self::Error,
        }
    }
}

/// Context about a load attempt.
#[derive(Debug, Clone)]
pub struct LoadContext {
    /// The input path.
    pub path: PathBuf,
    /// Canonical name of the declared text encoding.
    pub encoding: &'static str,
}

/// Minimal stats reported on a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Number of data rows.
    pub rows: usize,
    /// Number of columns.
    pub columns: usize,
}

/// Observer interface for load outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait LoadObserver: Send + Sync {
    /// Called when a load succeeds.
    fn on_success(&self, _ctx: &LoadContext, _stats: LoadStats) {}

    /// Called when a load fails.
    fn on_failure(&self, _ctx: &LoadContext, _severity: LoadSeverity, _error: &AnalysisError) {}

    /// Called when a load failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &AnalysisError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Forwards every callback to each inner observer, in order.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn LoadObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn LoadObserver>>) -> Self {
        Self { observers }
    }

    fn each(&self, f: impl Fn(&dyn LoadObserver)) {
        self.observers.iter().for_each(|o| f(o.as_ref()));
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompositeObserver({} observers)", self.observers.len())
    }
}

impl LoadObserver for CompositeObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        self.each(|o| o.on_success(ctx, stats));
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &AnalysisError) {
        self.each(|o| o.on_failure(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &AnalysisError) {
        self.each(|o| o.on_alert(ctx, severity, error));
    }
}

/// Emits load events as `tracing` events.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl LoadObserver for TracingObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        tracing::info!(
            path = %ctx.path.display(),
            encoding = ctx.encoding,
            rows = stats.rows,
            columns = stats.columns,
            "loaded table"
        );
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &AnalysisError) {
        tracing::error!(
            path = %ctx.path.display(),
            encoding = ctx.encoding,
            ?severity,
            %error,
            "load failed"
        );
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &AnalysisError) {
        tracing::error!(
            alert = true,
            path = %ctx.path.display(),
            ?severity,
            %error,
            "load failed"
        );
    }
}

/// Keeps a plain-text load log, one line per event:
///
/// ```text
/// 1760000000 loaded tests/fixtures/countryContinent.csv encoding=ISO-8859-1 rows=7 columns=4
/// 1760000000 failed missing.csv encoding=UTF-8 severity=Critical error=io error: ...
/// ```
///
/// The file is opened in append mode on the first event. A log that cannot be
/// opened or written is reported through `tracing` and never fails the load.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl FileObserver {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            file: Mutex::new(None),
        }
    }

    fn record(&self, event: &str, ctx: &LoadContext, detail: fmt::Arguments<'_>) {
        let line = format!(
            "{} {event} {} encoding={} {detail}",
            unix_ts(),
            ctx.path.display(),
            ctx.encoding
        );
        let Ok(mut slot) = self.file.lock() else {
            return;
        };
        if slot.is_none() {
            match OpenOptions::new().create(true).append(true).open(&self.path) {
                Ok(f) => *slot = Some(f),
                Err(error) => {
                    tracing::warn!(log = %self.path.display(), %error, "cannot open load log");
                    return;
                }
            }
        }
        if let Some(f) = slot.as_mut() {
            if let Err(error) = writeln!(f, "{line}") {
                tracing::warn!(log = %self.path.display(), %error, "cannot write load log");
            }
        }
    }
}

impl LoadObserver for FileObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        self.record(
            "loaded",
            ctx,
            format_args!("rows={} columns={}", stats.rows, stats.columns),
        );
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &AnalysisError) {
        self.record("failed", ctx, format_args!("severity={severity:?} error={error}"));
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &AnalysisError) {
        self.record("ALERT", ctx, format_args!("severity={severity:?} error={error}"));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}
