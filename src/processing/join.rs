//! Left join of two tables on a single key column.

use std::collections::HashMap;

use crate::error::AnalysisResult;
use crate::types::{Field, Schema, Table, Value};

/// Suffix appended to a left column whose name also appears among the joined right columns.
pub const LEFT_SUFFIX: &str = "_left";
/// Suffix appended to a joined right column whose name also appears on the left.
pub const RIGHT_SUFFIX: &str = "_right";

/// Left-join `right` onto `left` where `left[left_key] == right[right_key]`.
///
/// - Every right column except `right_key` is appended to the left columns.
/// - Keys are compared as exact, case-sensitive strings; null keys never match.
/// - If several right rows share a key, the first one in `right`'s row order is used.
/// - Left rows without a match get nulls in the appended columns.
/// - The output always has exactly `left.row_count()` rows, in left order.
/// - Overlapping column names are disambiguated with [`LEFT_SUFFIX`] / [`RIGHT_SUFFIX`].
pub fn left_join(left: &Table, right: &Table, left_key: &str, right_key: &str) -> AnalysisResult<Table> {
    let lk = left.schema.require(left_key, "left join")?;
    let rk = right.schema.require(right_key, "left join")?;

    let right_cols: Vec<usize> = (0..right.column_count()).filter(|&i| i != rk).collect();

    let mut first_match: HashMap<String, usize> = HashMap::new();
    for (row_idx, row) in right.rows.iter().enumerate() {
        if let Some(key) = row[rk].key_string() {
            first_match.entry(key).or_insert(row_idx);
        }
    }

    let right_names: Vec<&str> = right_cols
        .iter()
        .map(|&i| right.schema.fields[i].name.as_str())
        .collect();
    let mut fields: Vec<Field> = left
        .schema
        .fields
        .iter()
        .map(|f| {
            if right_names.contains(&f.name.as_str()) {
                Field::new(format!("{}{LEFT_SUFFIX}", f.name), f.data_type)
            } else {
                f.clone()
            }
        })
        .collect();
    for &i in &right_cols {
        let f = &right.schema.fields[i];
        if left.schema.index_of(&f.name).is_some() {
            fields.push(Field::new(format!("{}{RIGHT_SUFFIX}", f.name), f.data_type));
        } else {
            fields.push(f.clone());
        }
    }

    let mut matched = 0usize;
    let rows = left
        .rows
        .iter()
        .map(|row| {
            let hit = row[lk]
                .key_string()
                .and_then(|key| first_match.get(&key).copied());
            let mut out = Vec::with_capacity(fields.len());
            out.extend(row.iter().cloned());
            match hit {
                Some(r) => {
                    matched += 1;
                    out.extend(right_cols.iter().map(|&i| right.rows[r][i].clone()));
                }
                None => out.extend(right_cols.iter().map(|_| Value::Null)),
            }
            out
        })
        .collect();

    tracing::debug!(
        left_key,
        right_key,
        rows = left.row_count(),
        matched,
        "left join"
    );
    Ok(Table::new(Schema::new(fields), rows))
}
