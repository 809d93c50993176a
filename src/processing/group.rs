//! Group-by with mean aggregation.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::{DataType, Field, Schema, Table, Value};

/// Which columns [`group_by_mean`] averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeanColumns<'a> {
    /// Average a single named numeric column. Preferred for new callers.
    Column(&'a str),
    /// Average every numeric column that is not a group key.
    ///
    /// This includes numeric columns that are not metrics at all (an ID or a year that is not
    /// part of the key gets averaged too), matching a plain dataframe `groupby().mean()`.
    AllNumeric,
}

/// Composite group key, ordered with [`Value::total_cmp`] column by column.
#[derive(Debug, Clone)]
struct GroupKey(Vec<Value>);

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| a.total_cmp(b))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| self.0.len().cmp(&other.0.len()))
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for GroupKey {}

/// Running mean over numeric cells; nulls and strings are skipped.
///
/// Integers are summed as `f64`, so large `Int64` inputs lose precision instead of overflowing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: &Value) {
        if let Some(v) = value.as_f64() {
            self.sum += v;
            self.count += 1;
        }
    }

    /// Mean as `Float64`, or `Null` when nothing numeric was seen.
    fn finish(self) -> Value {
        if self.count == 0 {
            Value::Null
        } else {
            Value::Float64(self.sum / self.count as f64)
        }
    }
}

/// Group rows by the composite `keys` and average the selected columns per group.
///
/// - One output row per distinct key combination; a null key value forms its own group.
/// - Rows come out ordered by key ascending (nulls last), so repeated runs are identical.
/// - Output columns are the keys (original types) followed by the averaged columns as
///   `Float64`, keeping their names. Non-numeric, non-key columns are dropped.
/// - Nulls are ignored; a group with no numeric values for a column gets a null mean.
pub fn group_by_mean(table: &Table, keys: &[&str], columns: MeanColumns<'_>) -> AnalysisResult<Table> {
    if keys.is_empty() {
        return Err(AnalysisError::SchemaMismatch {
            message: "group_by_mean needs at least one group key".to_string(),
        });
    }
    let key_idxs = keys
        .iter()
        .map(|k| table.schema.require(k, "group by"))
        .collect::<AnalysisResult<Vec<usize>>>()?;

    let value_idxs: Vec<usize> = match columns {
        MeanColumns::Column(name) => {
            let idx = table.schema.require(name, "group by")?;
            if key_idxs.contains(&idx) {
                return Err(AnalysisError::SchemaMismatch {
                    message: format!("column '{name}' is both a group key and the averaged column"),
                });
            }
            if !table.schema.fields[idx].data_type.is_numeric() {
                return Err(AnalysisError::SchemaMismatch {
                    message: format!(
                        "cannot average non-numeric column '{name}' ({})",
                        table.schema.fields[idx].data_type
                    ),
                });
            }
            vec![idx]
        }
        MeanColumns::AllNumeric => table
            .schema
            .fields
            .iter()
            .enumerate()
            .filter(|(i, f)| f.data_type.is_numeric() && !key_idxs.contains(i))
            .map(|(i, _)| i)
            .collect(),
    };

    let mut groups: BTreeMap<GroupKey, Vec<MeanAccumulator>> = BTreeMap::new();
    for row in &table.rows {
        let key = GroupKey(key_idxs.iter().map(|&i| row[i].clone()).collect());
        let accs = groups
            .entry(key)
            .or_insert_with(|| vec![MeanAccumulator::default(); value_idxs.len()]);
        for (acc, &i) in accs.iter_mut().zip(&value_idxs) {
            acc.push(&row[i]);
        }
    }

    let mut fields: Vec<Field> = key_idxs.iter().map(|&i| table.schema.fields[i].clone()).collect();
    fields.extend(
        value_idxs
            .iter()
            .map(|&i| Field::new(table.schema.fields[i].name.clone(), DataType::Float64)),
    );

    let rows: Vec<Vec<Value>> = groups
        .into_iter()
        .map(|(GroupKey(mut key), accs)| {
            key.extend(accs.into_iter().map(MeanAccumulator::finish));
            key
        })
        .collect();

    tracing::debug!(keys = ?keys, groups = rows.len(), "group by mean");
    Ok(Table::new(Schema::new(fields), rows))
}
