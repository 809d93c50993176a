//! `hunger-trends` loads the Global Hunger Index, child-underweight and country-to-continent
//! tables, reshapes them into per-continent and per-period aggregates, and draws four SVG charts.
//!
//! The crate is organised as a straight pipeline over an in-memory [`types::Table`]:
//!
//! - [`ingestion`]: delimited text (any declared encoding) to a typed table; column types are
//!   inferred from the data
//! - [`explore`]: per-column null counts and types
//! - [`processing`]: rename, select, left join, group-by-mean, period buckets, filter, sort
//! - [`chart`]: line, bar, ranked bar and box plot SVGs
//! - [`analysis`]: the hunger-trends run composed from the above, driven by [`config`]
//!
//! Transforms take `&Table` and return a new table, so intermediate results can be kept,
//! compared or rendered independently.
//!
//! ## Quick example: load and inspect
//!
//! ```rust
//! use hunger_trends::explore::explore;
//! use hunger_trends::ingestion::{load_from_str, LoadOptions};
//! use hunger_trends::types::DataType;
//!
//! let table = load_from_str(
//!     "Entity,Code,Year,Global Hunger Index (2021)\nKenya,KEN,2021,23.0\nChad,TCD,2021,\n",
//!     &LoadOptions::default(),
//! )
//! .unwrap();
//!
//! let report = explore(&table);
//! assert_eq!(report.null_count("Global Hunger Index (2021)"), Some(1));
//! assert_eq!(report.column_type("Year"), Some(DataType::Int64));
//! ```
//!
//! ## Quick example: classify years into periods
//!
//! ```rust
//! use hunger_trends::processing::period_label;
//!
//! let labels: Vec<String> = [1990, 1998, 2003, 2021].into_iter().map(period_label).collect();
//! assert_eq!(labels, ["Before 1996", "1996-2000", "2001-2005", "2016-2021"]);
//! ```
//!
//! Errors from every stage share [`AnalysisError`]; a column that does not exist is always
//! [`AnalysisError::ColumnNotFound`], naming the operation and the columns that were available.

pub mod analysis;
pub mod chart;
pub mod config;
pub mod error;
pub mod explore;
pub mod ingestion;
pub mod processing;
pub mod types;

pub use error::{AnalysisError, AnalysisResult};
