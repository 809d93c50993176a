use thiserror::Error;

/// Convenience result type used across loading, transforms and rendering.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Error type returned by every fallible operation in this crate.
///
/// No stage recovers locally: the first error aborts the run and is reported to the caller.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Underlying I/O error (e.g. file not found, permission denied, unwritable chart directory).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error that is not a row-shape problem.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed delimited input: inconsistent column counts or bytes invalid in the declared
    /// text encoding.
    #[error("parse error at row {row}: {message}")]
    Parse { row: usize, message: String },

    /// The requested text encoding label is not known.
    #[error("unknown text encoding '{label}'")]
    Encoding { label: String },

    /// A transform or chart referenced a column that is absent from the table's schema.
    #[error("schema error: column '{column}' not found during {operation}. columns={available:?}")]
    ColumnNotFound {
        operation: &'static str,
        column: String,
        available: Vec<String>,
    },

    /// The table shape is unusable for the requested operation.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be coerced to the type an operation requires.
    #[error("type error at row {row} column '{column}': {message} (value={raw})")]
    Type {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// Invalid or unreadable configuration.
    #[error("config error: {message}")]
    Config { message: String },
}
