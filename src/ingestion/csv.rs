//! CSV loading with column type inference.

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::{DataType, Field, Schema, Table, Value};

/// Cell spellings treated as missing values by default.
///
/// This is the token list pandas' `read_csv` uses, so a `NA` country code (Namibia) loads as null.
pub const DEFAULT_NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Load CSV data from an existing CSV reader into a [`Table`].
///
/// Rules:
///
/// - The first record is the header; column order is preserved.
/// - Duplicate header names get `.1`, `.2`, ... suffixes.
/// - Every record must have as many fields as the header, otherwise [`AnalysisError::Parse`].
/// - Cells equal to one of `null_tokens` become [`Value::Null`].
/// - Each column's type is inferred from its non-null cells: all integers → `Int64`, all
///   numbers → `Float64`, anything else → `Utf8`. Columns with no values are `Float64`.
pub fn load_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    null_tokens: &[String],
) -> AnalysisResult<Table> {
    let headers = rdr.headers().map_err(map_csv_error)?.clone();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(AnalysisError::Parse {
            row: 1,
            message: "no columns to parse from input".to_string(),
        });
    }
    let names = dedupe_headers(headers.iter());

    let mut raw: Vec<csv::StringRecord> = Vec::new();
    for result in rdr.records() {
        raw.push(result.map_err(map_csv_error)?);
    }

    let is_null = |cell: &str| null_tokens.iter().any(|t| t == cell);

    let types: Vec<DataType> = (0..names.len())
        .map(|col| {
            infer_type(
                raw.iter()
                    .map(|rec| rec.get(col).unwrap_or(""))
                    .filter(|cell| !is_null(cell)),
            )
        })
        .collect();

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(raw.len());
    for (row_idx0, record) in raw.iter().enumerate() {
        // 1-based line number for users; +1 again because header is line 1.
        let user_row = row_idx0 + 2;
        let mut row = Vec::with_capacity(names.len());
        for (col, data_type) in types.iter().enumerate() {
            let cell = record.get(col).unwrap_or("");
            if is_null(cell) {
                row.push(Value::Null);
            } else {
                row.push(parse_typed_value(user_row, &names[col], *data_type, cell)?);
            }
        }
        rows.push(row);
    }

    let schema = Schema::new(
        names
            .into_iter()
            .zip(types)
            .map(|(name, data_type)| Field::new(name, data_type))
            .collect(),
    );
    Ok(Table::new(schema, rows))
}

fn infer_type<'a>(cells: impl Iterator<Item = &'a str>) -> DataType {
    let mut seen = false;
    let mut all_int = true;
    for cell in cells {
        seen = true;
        let trimmed = cell.trim();
        if all_int && trimmed.parse::<i64>().is_ok() {
            continue;
        }
        all_int = false;
        if trimmed.parse::<f64>().is_err() {
            return DataType::Utf8;
        }
    }
    if seen && all_int {
        DataType::Int64
    } else {
        DataType::Float64
    }
}

fn parse_typed_value(row: usize, column: &str, data_type: DataType, raw: &str) -> AnalysisResult<Value> {
    let trimmed = raw.trim();
    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(raw.to_owned())),
        DataType::Int64 => trimmed.parse::<i64>().map(Value::Int64).map_err(|e| AnalysisError::Type {
            row,
            column: column.to_owned(),
            raw: raw.to_owned(),
            message: e.to_string(),
        }),
        DataType::Float64 => trimmed.parse::<f64>().map(Value::Float64).map_err(|e| AnalysisError::Type {
            row,
            column: column.to_owned(),
            raw: raw.to_owned(),
            message: e.to_string(),
        }),
    }
}

fn dedupe_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for h in headers {
        let mut candidate = h.to_owned();
        let mut n = 1;
        while names.contains(&candidate) {
            candidate = format!("{h}.{n}");
            n += 1;
        }
        names.push(candidate);
    }
    names
}

/// Map row-shape problems to [`AnalysisError::Parse`]; everything else stays a CSV error.
fn map_csv_error(err: csv::Error) -> AnalysisError {
    let shape = match err.kind() {
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => Some((
            pos.as_ref().map(|p| p.line() as usize).unwrap_or(0),
            format!("expected {expected_len} fields, found {len}"),
        )),
        csv::ErrorKind::Utf8 { pos, err } => Some((
            pos.as_ref().map(|p| p.line() as usize).unwrap_or(0),
            format!("invalid utf-8: {err}"),
        )),
        _ => None,
    };
    match shape {
        Some((row, message)) => AnalysisError::Parse { row, message },
        None => AnalysisError::Csv(err),
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_NULL_TOKENS, load_csv_from_reader};
    use crate::types::{DataType, Value};

    fn tokens() -> Vec<String> {
        DEFAULT_NULL_TOKENS.iter().map(|s| s.to_string()).collect()
    }

    fn reader(input: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(input.as_bytes())
    }

    #[test]
    fn infers_int_float_and_string_columns() {
        let input = "Entity,Code,Year,Global Hunger Index (2021)\n\
                     Kenya,KEN,2021,28.0\n\
                     France,FRA,2021,\n";
        let t = load_csv_from_reader(&mut reader(input), &tokens()).unwrap();

        let types: Vec<DataType> = t.schema.fields.iter().map(|f| f.data_type).collect();
        assert_eq!(
            types,
            vec![DataType::Utf8, DataType::Utf8, DataType::Int64, DataType::Float64]
        );
        assert_eq!(t.rows[0][2], Value::Int64(2021));
        assert_eq!(t.rows[0][3], Value::Float64(28.0));
        assert_eq!(t.rows[1][3], Value::Null);
    }

    #[test]
    fn mixed_int_and_float_is_float() {
        let t = load_csv_from_reader(&mut reader("x\n1\n2.5\n"), &tokens()).unwrap();
        assert_eq!(t.schema.fields[0].data_type, DataType::Float64);
        assert_eq!(t.rows[0][0], Value::Float64(1.0));
    }

    #[test]
    fn all_null_column_is_float() {
        let t = load_csv_from_reader(&mut reader("a,b\n1,\n2,NA\n"), &tokens()).unwrap();
        assert_eq!(t.schema.fields[1].data_type, DataType::Float64);
        assert_eq!(t.rows[1][1], Value::Null);
    }

    #[test]
    fn na_token_is_null_in_string_column() {
        let input = "country,code_2\nNamibia,NA\nKenya,KE\n";
        let t = load_csv_from_reader(&mut reader(input), &tokens()).unwrap();
        assert_eq!(t.rows[0][1], Value::Null);
        assert_eq!(t.rows[1][1], Value::text("KE"));
    }

    #[test]
    fn duplicate_headers_are_suffixed() {
        let t = load_csv_from_reader(&mut reader("a,a,b,a\n1,2,3,4\n"), &tokens()).unwrap();
        assert_eq!(
            t.schema.field_names().collect::<Vec<_>>(),
            vec!["a", "a.1", "b", "a.2"]
        );
    }

    #[test]
    fn ragged_rows_are_parse_errors() {
        let err = load_csv_from_reader(&mut reader("a,b\n1,2\n3\n"), &tokens()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("parse error at row 3"), "{msg}");
        assert!(msg.contains("expected 2 fields, found 1"), "{msg}");
    }

    #[test]
    fn empty_input_is_parse_error() {
        let err = load_csv_from_reader(&mut reader(""), &tokens()).unwrap_err();
        assert!(err.to_string().contains("no columns to parse"));
    }

    #[test]
    fn header_only_yields_empty_table() {
        let t = load_csv_from_reader(&mut reader("Entity,Year\n"), &tokens()).unwrap();
        assert_eq!(t.row_count(), 0);
        assert_eq!(t.column_count(), 2);
    }
}
