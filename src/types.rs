//! Core data model types.
//!
//! Every stage of the analysis works on an in-memory [`Table`]: a [`Schema`] (an ordered list of
//! typed [`Field`]s) plus row-major [`Value`] storage. Transforms never mutate their input; they
//! build and return a new table.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::error::{AnalysisError, AnalysisResult};

/// Logical data type of a column, inferred at load time or produced by a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// UTF-8 string.
    Utf8,
}

impl DataType {
    /// Whether values of this type take part in numeric aggregation.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Utf8 => "object",
        };
        f.write_str(name)
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of fields describing the shape of a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Returns the index of `name`, or a [`AnalysisError::ColumnNotFound`] naming `operation`.
    pub fn require(&self, name: &str, operation: &'static str) -> AnalysisResult<usize> {
        self.index_of(name).ok_or_else(|| AnalysisError::ColumnNotFound {
            operation,
            column: name.to_owned(),
            available: self.field_names().map(str::to_owned).collect(),
        })
    }
}

/// A single cell value in a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Shorthand for a [`Value::Utf8`] cell.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Utf8(s.into())
    }

    /// Whether this cell is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view of the value; `None` for nulls and strings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int64(v) => Some(*v as f64),
            Self::Float64(v) => Some(*v),
            Self::Null | Self::Utf8(_) => None,
        }
    }

    /// Integer view of the value, coercing integral floats and numeric strings.
    pub fn coerce_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(v) => Some(*v),
            // `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
            Self::Float64(v) if v.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(v) => {
                Some(*v as i64)
            }
            Self::Utf8(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// String form used as a join key. Nulls have no key.
    pub fn key_string(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Utf8(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Equality that treats `Int64(2000)` and `Float64(2000.0)` as the same value.
    ///
    /// Nulls never compare equal, not even to another null.
    pub fn loosely_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Utf8(a), Self::Utf8(b)) => a == b,
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }

    /// Total order used for sorting and grouping: numbers, then strings, then nulls.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int64(a), Self::Int64(b)) => a.cmp(b),
            (Self::Utf8(a), Self::Utf8(b)) => a.cmp(b),
            (Self::Null, Self::Null) => Ordering::Equal,
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => a.rank().cmp(&b.rank()),
            },
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Int64(_) | Self::Float64(_) => 0,
            Self::Utf8(_) => 1,
            Self::Null => 2,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NaN"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Utf8(s) => f.write_str(s),
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        debug_assert!(
            rows.iter().all(|r| r.len() == schema.len()),
            "row length does not match schema length"
        );
        Self { schema, rows }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the table.
    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    /// Borrow every value of column `name`, in row order.
    pub fn column(&self, name: &str) -> AnalysisResult<Vec<&Value>> {
        let idx = self.schema.require(name, "column lookup")?;
        Ok(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Create a new table containing only rows that match `predicate`.
    ///
    /// The returned table preserves the original schema.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Reduce (fold) all rows into an accumulator value.
    ///
    /// This is similar to `Iterator::fold`, but provides each row as `&[Value]`.
    pub fn reduce_rows<A, F>(&self, init: A, mut reducer: F) -> A
    where
        F: FnMut(A, &[Value]) -> A,
    {
        self.rows
            .iter()
            .fold(init, |acc, row| reducer(acc, row.as_slice()))
    }

    /// Return a copy with column `name` set to `values`.
    ///
    /// An existing column of that name is replaced in place (keeping its position); otherwise the
    /// column is appended.
    ///
    /// # Panics
    ///
    /// Panics if `values.len()` differs from the row count.
    pub fn with_column(&self, name: &str, data_type: DataType, values: Vec<Value>) -> Self {
        assert!(
            values.len() == self.row_count(),
            "column length {} does not match row count {}",
            values.len(),
            self.row_count()
        );

        let mut out = self.clone();
        match out.schema.index_of(name) {
            Some(idx) => {
                out.schema.fields[idx].data_type = data_type;
                for (row, v) in out.rows.iter_mut().zip(values) {
                    row[idx] = v;
                }
            }
            None => {
                out.schema.fields.push(Field::new(name, data_type));
                for (row, v) in out.rows.iter_mut().zip(values) {
                    row.push(v);
                }
            }
        }
        out
    }

    /// Rename column `old` to `new`, mutating this table.
    ///
    /// This is the opt-in in-place counterpart of [`crate::processing::rename_column`], with the
    /// same collision rule: a different column already called `new` is dropped.
    pub fn rename_column_in_place(&mut self, old: &str, new: &str) -> AnalysisResult<()> {
        self.schema.require(old, "rename")?;
        if old == new {
            return Ok(());
        }
        if let Some(clash) = self.schema.index_of(new) {
            self.schema.fields.remove(clash);
            for row in &mut self.rows {
                row.remove(clash);
            }
        }
        // Positions may have shifted after dropping the clash.
        let idx = self.schema.require(old, "rename")?;
        self.schema.fields[idx].name = new.to_owned();
        Ok(())
    }
}
