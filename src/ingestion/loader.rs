//! Path-based loading entrypoint.
//!
//! Most callers should use [`load`], which reads a delimited text file in a declared
//! [`TextEncoding`] into an in-memory [`crate::types::Table`].
//!
//! - Column types are inferred from content; no schema has to be supplied.
//! - If a [`LoadObserver`] is provided, success/failure/alerts are reported to it.

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::error::AnalysisResult;
use crate::types::Table;

use super::csv::{DEFAULT_NULL_TOKENS, load_csv_from_reader};
use super::encoding::TextEncoding;
use super::observability::{LoadContext, LoadObserver, LoadSeverity, LoadStats};

/// Options controlling how a delimited file is read.
///
/// Use [`Default`] for UTF-8, comma-delimited input with pandas-style null tokens.
#[derive(Clone)]
pub struct LoadOptions {
    /// Declared text encoding of the file.
    pub encoding: TextEncoding,
    /// Field delimiter.
    pub delimiter: u8,
    /// Cell spellings that load as null.
    pub null_tokens: Vec<String>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn LoadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: LoadSeverity,
}

impl LoadOptions {
    /// Default options with a different text encoding.
    pub fn with_encoding(encoding: TextEncoding) -> Self {
        Self {
            encoding,
            ..Default::default()
        }
    }
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("encoding", &self.encoding)
            .field("delimiter", &(self.delimiter as char))
            .field("null_tokens", &self.null_tokens.len())
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            encoding: TextEncoding::default(),
            delimiter: b',',
            null_tokens: DEFAULT_NULL_TOKENS.iter().map(|s| s.to_string()).collect(),
            observer: None,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

/// Load a delimited text file into a [`Table`].
///
/// Fails with:
///
/// - [`crate::AnalysisError::Io`] when the file is missing or unreadable
/// - [`crate::AnalysisError::Parse`] when bytes are invalid in the declared encoding or rows
///   have inconsistent column counts
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row/column stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use hunger_trends::ingestion::{load, LoadOptions, TextEncoding};
///
/// # fn main() -> Result<(), hunger_trends::AnalysisError> {
/// let hunger = load("global-hunger-index.csv", &LoadOptions::default())?;
/// let continents = load(
///     "countryContinent.csv",
///     &LoadOptions::with_encoding(TextEncoding::from_label("latin-1")?),
/// )?;
/// println!("rows={} / {}", hunger.row_count(), continents.row_count());
/// # Ok(())
/// # }
/// ```
pub fn load(path: impl AsRef<Path>, options: &LoadOptions) -> AnalysisResult<Table> {
    let path = path.as_ref();
    let ctx = LoadContext {
        path: path.to_path_buf(),
        encoding: options.encoding.name(),
    };

    let result = fs::read(path)
        .map_err(Into::into)
        .and_then(|bytes| load_from_bytes(&bytes, options));

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(t) => obs.on_success(
                &ctx,
                LoadStats {
                    rows: t.row_count(),
                    columns: t.column_count(),
                },
            ),
            Err(e) => {
                let sev = LoadSeverity::for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

/// Load delimited text that has already been decoded.
pub fn load_from_str(text: &str, options: &LoadOptions) -> AnalysisResult<Table> {
    let mut rdr = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .from_reader(text.as_bytes());
    load_csv_from_reader(&mut rdr, &options.null_tokens)
}

/// Load delimited text from any reader, decoding it with `options.encoding`.
pub fn load_from_reader<R: Read>(mut reader: R, options: &LoadOptions) -> AnalysisResult<Table> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    load_from_bytes(&bytes, options)
}

fn load_from_bytes(bytes: &[u8], options: &LoadOptions) -> AnalysisResult<Table> {
    let text = options.encoding.decode(bytes)?;
    load_from_str(&text, options)
}

#[cfg(test)]
mod tests {
    use super::{LoadOptions, load_from_reader, load_from_str};
    use crate::ingestion::TextEncoding;
    use crate::types::Value;

    #[test]
    fn semicolon_delimiter() {
        let opts = LoadOptions {
            delimiter: b';',
            ..Default::default()
        };
        let t = load_from_str("a;b\n1;x\n", &opts).unwrap();
        assert_eq!(t.rows[0], vec![Value::Int64(1), Value::text("x")]);
    }

    #[test]
    fn reader_input_is_decoded_with_declared_encoding() {
        let bytes: &[u8] = b"country,continent\nR\xe9union,Africa\n";
        let t = load_from_reader(bytes, &LoadOptions::with_encoding(TextEncoding::latin1())).unwrap();
        assert_eq!(t.rows[0][0], Value::text("Réunion"));
    }

    #[test]
    fn reader_input_rejects_latin1_as_utf8() {
        let bytes: &[u8] = b"country,continent\nR\xe9union,Africa\n";
        let err = load_from_reader(bytes, &LoadOptions::default()).unwrap_err();
        assert!(err.to_string().contains("parse error at row 2"));
    }
}
