//! In-memory table transformations.
//!
//! Every operation takes tables by reference and returns a new [`crate::types::Table`]; nothing
//! is mutated in place. Referencing a column that is not in the schema fails with
//! [`crate::AnalysisError::ColumnNotFound`].
//!
//! - [`rename_column()`]: rename one column (last write wins on collisions)
//! - [`select_columns()`] / [`head()`]: projection and truncation
//! - [`left_join()`]: first-match left join on a key column
//! - [`group_by_mean()`]: composite-key group-by with mean aggregation
//! - [`classify_buckets()`]: derive a period label column from a year column
//! - [`filter()`], [`sort_by()`], [`filter_and_sort()`]: predicate filtering and stable sorting
//!
//! ## Example: join → group
//!
//! ```rust
//! use hunger_trends::processing::{group_by_mean, left_join, MeanColumns};
//! use hunger_trends::types::{DataType, Field, Schema, Table, Value};
//!
//! let hunger = Table::new(
//!     Schema::new(vec![
//!         Field::new("country", DataType::Utf8),
//!         Field::new("Code", DataType::Utf8),
//!         Field::new("Year", DataType::Int64),
//!         Field::new("GHI", DataType::Float64),
//!     ]),
//!     vec![
//!         vec![Value::text("Kenya"), Value::text("KEN"), Value::Int64(2021), Value::Float64(28.0)],
//!         vec![Value::text("France"), Value::text("FRA"), Value::Int64(2021), Value::Float64(5.0)],
//!     ],
//! );
//! let continents = Table::new(
//!     Schema::new(vec![
//!         Field::new("code_3", DataType::Utf8),
//!         Field::new("continent", DataType::Utf8),
//!     ]),
//!     vec![
//!         vec![Value::text("KEN"), Value::text("Africa")],
//!         vec![Value::text("FRA"), Value::text("Europe")],
//!     ],
//! );
//!
//! let joined = left_join(&hunger, &continents, "Code", "code_3").unwrap();
//! let trends = group_by_mean(&joined, &["continent", "Year"], MeanColumns::Column("GHI")).unwrap();
//! assert_eq!(trends.rows[0], vec![Value::text("Africa"), Value::Int64(2021), Value::Float64(28.0)]);
//! assert_eq!(trends.rows[1], vec![Value::text("Europe"), Value::Int64(2021), Value::Float64(5.0)]);
//! ```

pub mod classify;
pub mod filter;
pub mod group;
pub mod join;
pub mod rename;
pub mod select;
pub mod sort;

pub use classify::{PeriodBucket, classify_buckets, period_label};
pub use filter::{Predicate, filter};
pub use group::{MeanColumns, group_by_mean};
pub use join::left_join;
pub use rename::rename_column;
pub use select::{head, select_columns};
pub use sort::{SortOrder, filter_and_sort, sort_by};
