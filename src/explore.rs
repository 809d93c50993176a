//! Schema diagnostics: per-column null counts and inferred types.

use std::fmt;

use serde::Serialize;

use crate::types::{DataType, Table};

/// Diagnostic summary of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnReport {
    /// Column name.
    pub name: String,
    /// Number of null cells.
    pub null_count: usize,
    /// Inferred column type.
    pub data_type: DataType,
}

/// Diagnostic summary of a whole table, one entry per column in schema order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaReport {
    /// Optional name of the table the report was taken from (used when printing).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Number of rows inspected.
    pub rows: usize,
    /// Per-column entries.
    pub columns: Vec<ColumnReport>,
}

impl SchemaReport {
    /// Attach the name of the source table.
    pub fn labeled(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// `(column, null count)` pairs in schema order.
    pub fn null_counts(&self) -> Vec<(&str, usize)> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.null_count))
            .collect()
    }

    /// `(column, type)` pairs in schema order.
    pub fn column_types(&self) -> Vec<(&str, DataType)> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.data_type))
            .collect()
    }

    /// Null count of a single column.
    pub fn null_count(&self, column: &str) -> Option<usize> {
        self.find(column).map(|c| c.null_count)
    }

    /// Type of a single column.
    pub fn column_type(&self, column: &str) -> Option<DataType> {
        self.find(column).map(|c| c.data_type)
    }

    fn find(&self, column: &str) -> Option<&ColumnReport> {
        self.columns.iter().find(|c| c.name == column)
    }
}

impl fmt::Display for SchemaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "******************")?;
        if let Some(table) = &self.table {
            writeln!(f, "{table} ({} rows)", self.rows)?;
        }
        let width = self
            .columns
            .iter()
            .map(|c| c.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("column".len());
        writeln!(f, "{:<width$}  {:>6}  dtype", "column", "nulls")?;
        for c in &self.columns {
            writeln!(f, "{:<width$}  {:>6}  {}", c.name, c.null_count, c.data_type)?;
        }
        Ok(())
    }
}

/// Inspect `table` and report null counts and types per column.
///
/// Nulls are counted in a single pass over the rows; the table is only borrowed.
pub fn explore(table: &Table) -> SchemaReport {
    let null_counts = table.reduce_rows(vec![0usize; table.column_count()], |mut acc, row| {
        for (count, value) in acc.iter_mut().zip(row) {
            if value.is_null() {
                *count += 1;
            }
        }
        acc
    });

    let columns = table
        .schema
        .fields
        .iter()
        .zip(null_counts)
        .map(|(field, null_count)| ColumnReport {
            name: field.name.clone(),
            null_count,
            data_type: field.data_type,
        })
        .collect();

    SchemaReport {
        table: None,
        rows: table.row_count(),
        columns,
    }
}
