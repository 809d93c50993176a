//! Column projection and row truncation.

use crate::error::AnalysisResult;
use crate::types::{Schema, Table};

/// Returns a table with only `columns`, in the given order.
///
/// Fails with [`crate::AnalysisError::ColumnNotFound`] on the first absent name.
pub fn select_columns(table: &Table, columns: &[&str]) -> AnalysisResult<Table> {
    let idxs = columns
        .iter()
        .map(|name| table.schema.require(name, "select"))
        .collect::<AnalysisResult<Vec<usize>>>()?;

    let schema = Schema::new(idxs.iter().map(|&i| table.schema.fields[i].clone()).collect());
    let rows = table
        .rows
        .iter()
        .map(|row| idxs.iter().map(|&i| row[i].clone()).collect())
        .collect();
    Ok(Table::new(schema, rows))
}

/// Returns the first `n` rows (all rows if the table is shorter).
pub fn head(table: &Table, n: usize) -> Table {
    Table::new(
        table.schema.clone(),
        table.rows.iter().take(n).cloned().collect(),
    )
}
