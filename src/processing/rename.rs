//! Column renaming.

use crate::error::AnalysisResult;
use crate::types::Table;

/// Returns a copy of `table` with column `old` renamed to `new`.
///
/// Row order and every other column are unchanged. If another column is already called `new`
/// it is dropped and the renamed column takes its name (last write wins, no merge).
///
/// Fails with [`crate::AnalysisError::ColumnNotFound`] if `old` is absent.
/// See [`Table::rename_column_in_place`] for the mutating variant.
pub fn rename_column(table: &Table, old: &str, new: &str) -> AnalysisResult<Table> {
    table.schema.require(old, "rename")?;
    let mut out = table.clone();
    out.rename_column_in_place(old, new)?;
    Ok(out)
}
