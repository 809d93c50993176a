//! Run configuration for the analysis.
//!
//! Every field has a default, so a JSON override only needs the keys it changes:
//!
//! ```json
//! { "output_dir": "out", "top_n": 5 }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AnalysisError, AnalysisResult};

/// Inputs, outputs and parameters of one analysis run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Hunger index time series (`Entity, Code, Year, Global Hunger Index (2021)`).
    pub hunger_index_path: PathBuf,
    /// Child underweight time series.
    pub child_weight_path: PathBuf,
    /// Country to continent mapping (`code_3`, `continent`, ...).
    pub continent_path: PathBuf,
    /// Encoding label of the continent file.
    pub continent_encoding: String,
    /// Directory the charts are written into.
    pub output_dir: PathBuf,
    /// The two years compared in the box plot.
    pub comparison_years: [i64; 2],
    /// Year used for the country ranking.
    pub ranking_year: i64,
    /// Number of countries in the ranking.
    pub top_n: usize,
    /// Continents drawn in the box plot, top to bottom.
    pub continent_order: Vec<String>,
    /// When set, every load outcome is also appended to this file.
    pub load_log: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            hunger_index_path: PathBuf::from("global-hunger-index.csv"),
            child_weight_path: PathBuf::from("share-of-children-underweight.csv"),
            continent_path: PathBuf::from("countryContinent.csv"),
            continent_encoding: "latin-1".to_string(),
            output_dir: PathBuf::from("charts"),
            comparison_years: [2000, 2021],
            ranking_year: 2021,
            top_n: 10,
            continent_order: ["Africa", "Oceania", "Asia", "Americas", "Europe"]
                .into_iter()
                .map(String::from)
                .collect(),
            load_log: None,
        }
    }
}

impl AnalysisConfig {
    /// Parse a (partial) JSON config; missing keys keep their defaults.
    pub fn from_json_str(input: &str) -> AnalysisResult<Self> {
        serde_json::from_str(input).map_err(|e| AnalysisError::Config {
            message: e.to_string(),
        })
    }

    /// Read and parse a JSON config file.
    pub fn from_json_path(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        let path = path.as_ref();
        let input = fs::read_to_string(path).map_err(|e| AnalysisError::Config {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_json_str(&input).map_err(|e| match e {
            AnalysisError::Config { message } => AnalysisError::Config {
                message: format!("{}: {message}", path.display()),
            },
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::AnalysisConfig;
    use crate::AnalysisError;
    use std::path::PathBuf;

    #[test]
    fn partial_override_keeps_defaults() {
        let cfg = AnalysisConfig::from_json_str(r#"{"output_dir": "out", "top_n": 5}"#).unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from("out"));
        assert_eq!(cfg.top_n, 5);
        assert_eq!(cfg.ranking_year, 2021);
        assert_eq!(cfg.continent_encoding, "latin-1");
        assert_eq!(cfg.continent_order[0], "Africa");
        assert_eq!(cfg.load_log, None);

        let cfg = AnalysisConfig::from_json_str(r#"{"load_log": "loads.log"}"#).unwrap();
        assert_eq!(cfg.load_log, Some(PathBuf::from("loads.log")));
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(AnalysisConfig::from_json_str("{}").unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn unknown_keys_and_bad_files_are_config_errors() {
        let err = AnalysisConfig::from_json_str(r#"{"top_m": 5}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Config { .. }));

        let dir = tempfile::tempdir().unwrap();
        let err = AnalysisConfig::from_json_path(dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().starts_with("config error: cannot read"));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        let err = AnalysisConfig::from_json_path(&bad).unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }
}
