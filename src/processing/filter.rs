//! Row filtering for [`crate::types::Table`].

use crate::error::AnalysisResult;
use crate::types::{Schema, Table, Value};

/// Declarative row predicate over named columns.
///
/// Column names are resolved against the table before any row is visited, so a predicate that
/// names an absent column fails with [`crate::AnalysisError::ColumnNotFound`] even on an empty
/// table. Numeric comparisons treat `Int64` and `Float64` alike; nulls never match a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Keep every row.
    All,
    /// Keep rows whose column equals the value.
    Equals(String, Value),
    /// Keep rows whose column equals any of the values.
    In(String, Vec<Value>),
    /// Keep rows whose column is not null.
    NotNull(String),
    /// Keep rows matching every inner predicate.
    And(Vec<Predicate>),
}

impl Predicate {
    /// `column == value`
    pub fn equals(column: impl Into<String>, value: Value) -> Self {
        Self::Equals(column.into(), value)
    }

    /// `column in values`
    pub fn is_in(column: impl Into<String>, values: Vec<Value>) -> Self {
        Self::In(column.into(), values)
    }

    /// `column is not null`
    pub fn not_null(column: impl Into<String>) -> Self {
        Self::NotNull(column.into())
    }

    /// Resolve column names to indexes for `schema`.
    fn bind(&self, schema: &Schema) -> AnalysisResult<Bound<'_>> {
        Ok(match self {
            Self::All => Bound::All,
            Self::Equals(c, v) => Bound::Equals(schema.require(c, "filter")?, v),
            Self::In(c, vs) => Bound::In(schema.require(c, "filter")?, vs),
            Self::NotNull(c) => Bound::NotNull(schema.require(c, "filter")?),
            Self::And(ps) => Bound::And(
                ps.iter()
                    .map(|p| p.bind(schema))
                    .collect::<AnalysisResult<Vec<_>>>()?,
            ),
        })
    }
}

enum Bound<'a> {
    All,
    Equals(usize, &'a Value),
    In(usize, &'a [Value]),
    NotNull(usize),
    And(Vec<Bound<'a>>),
}

impl Bound<'_> {
    fn matches(&self, row: &[Value]) -> bool {
        match self {
            Self::All => true,
            Self::Equals(i, v) => row[*i].loosely_eq(v),
            Self::In(i, vs) => vs.iter().any(|v| row[*i].loosely_eq(v)),
            Self::NotNull(i) => !row[*i].is_null(),
            Self::And(bs) => bs.iter().all(|b| b.matches(row)),
        }
    }
}

/// Returns a new [`Table`] containing only rows matching `predicate`, in their original order.
pub fn filter(table: &Table, predicate: &Predicate) -> AnalysisResult<Table> {
    let bound = predicate.bind(&table.schema)?;
    Ok(table.filter_rows(|row| bound.matches(row)))
}
