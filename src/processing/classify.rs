//! Year → period bucket classification.

use std::fmt;

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::{DataType, Table, Value};

/// Fixed five-year periods used to aggregate the child-underweight series.
///
/// The last bucket is open-ended: every year from 2016 on, including years after 2021, lands in
/// [`PeriodBucket::From2016To2021`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodBucket {
    /// Any year up to and including 1995.
    Before1996,
    /// 1996..=2000
    From1996To2000,
    /// 2001..=2005
    From2001To2005,
    /// 2006..=2010
    From2006To2010,
    /// 2011..=2015
    From2011To2015,
    /// 2016 and later.
    From2016To2021,
}

impl PeriodBucket {
    /// Bucket for a calendar year.
    pub fn from_year(year: i64) -> Self {
        match year {
            ..=1995 => Self::Before1996,
            1996..=2000 => Self::From1996To2000,
            2001..=2005 => Self::From2001To2005,
            2006..=2010 => Self::From2006To2010,
            2011..=2015 => Self::From2011To2015,
            _ => Self::From2016To2021,
        }
    }

    /// Display label, e.g. `"1996-2000"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Before1996 => "Before 1996",
            Self::From1996To2000 => "1996-2000",
            Self::From2001To2005 => "2001-2005",
            Self::From2006To2010 => "2006-2010",
            Self::From2011To2015 => "2011-2015",
            Self::From2016To2021 => "2016-2021",
        }
    }
}

impl fmt::Display for PeriodBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label a year with its [`PeriodBucket`]; usable directly as the `bucket_fn` of
/// [`classify_buckets`].
pub fn period_label(year: i64) -> String {
    PeriodBucket::from_year(year).label().to_owned()
}

/// Returns a copy of `table` with a `Utf8` column `new_column` holding `bucket_fn(year)` for
/// each row's `year_column` value.
///
/// If `new_column` already exists it is replaced in place, so re-classifying an already
/// classified table leaves its shape and labels unchanged.
///
/// Fails with [`AnalysisError::Type`] on the first year that is not integer-coercible (null,
/// fractional, or non-numeric text) and with [`AnalysisError::ColumnNotFound`] if
/// `year_column` is absent.
pub fn classify_buckets<F>(table: &Table, year_column: &str, new_column: &str, mut bucket_fn: F) -> AnalysisResult<Table>
where
    F: FnMut(i64) -> String,
{
    let idx = table.schema.require(year_column, "classify")?;

    let labels = table
        .rows
        .iter()
        .enumerate()
        .map(|(row_idx0, row)| {
            let value = &row[idx];
            value
                .coerce_i64()
                .map(|year| Value::Utf8(bucket_fn(year)))
                .ok_or_else(|| AnalysisError::Type {
                    row: row_idx0 + 1,
                    column: year_column.to_owned(),
                    raw: value.to_string(),
                    message: "year is not integer-coercible".to_string(),
                })
        })
        .collect::<AnalysisResult<Vec<Value>>>()?;

    Ok(table.with_column(new_column, DataType::Utf8, labels))
}

#[cfg(test)]
mod tests {
    use super::{PeriodBucket, classify_buckets, period_label};
    use crate::types::{DataType, Field, Schema, Table, Value};

    fn years(ys: &[Value]) -> Table {
        let schema = Schema::new(vec![
            Field::new("Entity", DataType::Utf8),
            Field::new("Year", DataType::Int64),
        ]);
        Table::new(
            schema,
            ys.iter().map(|y| vec![Value::text("Kenya"), y.clone()]).collect(),
        )
    }

    #[test]
    fn boundary_years() {
        let cases = [
            (1995, "Before 1996"),
            (1996, "1996-2000"),
            (2000, "1996-2000"),
            (2001, "2001-2005"),
            (2005, "2001-2005"),
            (2006, "2006-2010"),
            (2010, "2006-2010"),
            (2011, "2011-2015"),
            (2015, "2011-2015"),
            (2016, "2016-2021"),
            (2021, "2016-2021"),
            (2035, "2016-2021"),
            (1900, "Before 1996"),
        ];
        for (year, label) in cases {
            assert_eq!(period_label(year), label, "year {year}");
        }
    }

    #[test]
    fn display_matches_label() {
        assert_eq!(PeriodBucket::from_year(1999).to_string(), "1996-2000");
        assert_eq!(PeriodBucket::Before1996.to_string(), PeriodBucket::Before1996.label());
    }

    #[test]
    fn classifies_child_weight_years() {
        let t = years(&[
            Value::Int64(1990),
            Value::Int64(1998),
            Value::Int64(2003),
            Value::Int64(2021),
        ]);
        let out = classify_buckets(&t, "Year", "period", period_label).unwrap();
        let labels: Vec<&Value> = out.column("period").unwrap();
        assert_eq!(
            labels,
            vec![
                &Value::text("Before 1996"),
                &Value::text("1996-2000"),
                &Value::text("2001-2005"),
                &Value::text("2016-2021"),
            ]
        );
        assert_eq!(out.schema.fields[2].data_type, DataType::Utf8);
    }

    #[test]
    fn reclassifying_is_idempotent() {
        let t = years(&[Value::Int64(1983), Value::Int64(2012)]);
        let once = classify_buckets(&t, "Year", "period", period_label).unwrap();
        let twice = classify_buckets(&once, "Year", "period", period_label).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn integral_floats_and_numeric_strings_are_coerced() {
        let t = years(&[Value::Float64(1999.0), Value::text("2016")]);
        let out = classify_buckets(&t, "Year", "period", period_label).unwrap();
        assert_eq!(out.rows[0][2], Value::text("1996-2000"));
        assert_eq!(out.rows[1][2], Value::text("2016-2021"));
    }

    #[test]
    fn non_integer_years_are_type_errors() {
        for bad in [Value::Null, Value::Float64(1999.5), Value::text("n.d.")] {
            let t = years(&[Value::Int64(2000), bad]);
            let err = classify_buckets(&t, "Year", "period", period_label).unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains("type error at row 2 column 'Year'"), "{msg}");
        }
    }

    #[test]
    fn missing_year_column_fails() {
        let t = years(&[Value::Int64(2000)]);
        let err = classify_buckets(&t, "year", "period", period_label).unwrap_err();
        assert!(err.to_string().contains("column 'year' not found during classify"));
    }
}
