//! Stable sorting, alone or combined with a filter.

use crate::error::AnalysisResult;
use crate::types::Table;

use super::filter::{Predicate, filter};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Stable sort of `table` by column `key`.
///
/// Rows with equal keys keep their input order. Nulls go last in both directions.
pub fn sort_by(table: &Table, key: &str, order: SortOrder) -> AnalysisResult<Table> {
    let idx = table.schema.require(key, "sort")?;
    let mut rows = table.rows.clone();
    // `sort_by` is a stable merge sort.
    rows.sort_by(|a, b| {
        let (a, b) = (&a[idx], &b[idx]);
        match (a.is_null(), b.is_null()) {
            (true, true) => std::cmp::Ordering::Equal,
            (true, false) => std::cmp::Ordering::Greater,
            (false, true) => std::cmp::Ordering::Less,
            (false, false) => match order {
                SortOrder::Ascending => a.total_cmp(b),
                SortOrder::Descending => b.total_cmp(a),
            },
        }
    });
    Ok(Table::new(table.schema.clone(), rows))
}

/// Keep rows matching `predicate`, then stable-sort them by `sort_key`.
///
/// Both steps validate their columns up front. Sorting an already sorted result again with the
/// same key and order returns it unchanged.
pub fn filter_and_sort(
    table: &Table,
    predicate: &Predicate,
    sort_key: &str,
    order: SortOrder,
) -> AnalysisResult<Table> {
    table.schema.require(sort_key, "sort")?;
    let kept = filter(table, predicate)?;
    sort_by(&kept, sort_key, order)
}

#[cfg(test)]
mod tests {
    use super::{SortOrder, filter_and_sort, sort_by};
    use crate::processing::Predicate;
    use crate::types::{DataType, Field, Schema, Table, Value};

    fn ranking() -> Table {
        let schema = Schema::new(vec![
            Field::new("country", DataType::Utf8),
            Field::new("Year", DataType::Int64),
            Field::new("GHI", DataType::Float64),
        ]);
        let row = |c: &str, y: i64, g: Option<f64>| {
            vec![Value::text(c), Value::Int64(y), g.map(Value::Float64).unwrap_or(Value::Null)]
        };
        Table::new(
            schema,
            vec![
                row("Chad", 2021, Some(44.7)),
                row("Yemen", 2021, Some(45.1)),
                row("Haiti", 2021, None),
                row("Madagascar", 2021, Some(36.3)),
                row("Liberia", 2021, Some(36.3)),
                row("Chad", 2000, Some(50.7)),
            ],
        )
    }

    fn names(t: &Table) -> Vec<String> {
        t.column("country").unwrap().iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn descending_with_ties_in_input_order_and_nulls_last() {
        let out = filter_and_sort(
            &ranking(),
            &Predicate::equals("Year", Value::Int64(2021)),
            "GHI",
            SortOrder::Descending,
        )
        .unwrap();
        assert_eq!(names(&out), vec!["Yemen", "Chad", "Madagascar", "Liberia", "Haiti"]);
    }

    #[test]
    fn ascending_keeps_ties_and_nulls_last() {
        let out = sort_by(&ranking(), "GHI", SortOrder::Ascending).unwrap();
        assert_eq!(
            names(&out),
            vec!["Madagascar", "Liberia", "Chad", "Yemen", "Chad", "Haiti"]
        );
    }

    #[test]
    fn idempotent() {
        for order in [SortOrder::Ascending, SortOrder::Descending] {
            let once = filter_and_sort(&ranking(), &Predicate::All, "GHI", order).unwrap();
            let twice = filter_and_sort(&once, &Predicate::All, "GHI", order).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn missing_sort_key_fails() {
        let err = filter_and_sort(&ranking(), &Predicate::All, "score", SortOrder::Ascending).unwrap_err();
        assert!(err.to_string().contains("column 'score' not found during sort"));
    }
}
