//! Chart models: the column-to-axis/series mapping of a chart, extracted from a table.
//!
//! Building a model validates every referenced column and never mutates the table. Models are
//! plain data, so what a chart will show can be tested without producing an artifact.

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::{Table, Value};

use super::stats::BoxStats;

/// A line chart with one series per legend value.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    /// Chart title.
    pub title: String,
    /// X axis column name.
    pub x_label: String,
    /// Y axis column name.
    pub y_label: String,
    /// Distinct x values, ascending; used as tick positions.
    pub x_ticks: Vec<f64>,
    /// Series in first-seen legend order.
    pub series: Vec<LineSeries>,
}

/// One line of a [`LineChart`].
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    /// Legend label.
    pub name: String,
    /// `(x, y)` points in row order; rows with a null x or y are skipped.
    pub points: Vec<(f64, f64)>,
}

impl LineChart {
    /// One series per distinct `legend` value plotting `y` against numeric `x`.
    pub fn from_table(table: &Table, x: &str, y: &str, legend: &str, title: &str) -> AnalysisResult<Self> {
        let xi = table.schema.require(x, "line chart")?;
        let yi = table.schema.require(y, "line chart")?;
        let li = table.schema.require(legend, "line chart")?;
        require_numeric(table, xi, "line chart")?;
        require_numeric(table, yi, "line chart")?;

        let mut series: Vec<LineSeries> = Vec::new();
        let mut x_ticks: Vec<f64> = Vec::new();
        for row in &table.rows {
            let (Some(xv), Some(yv)) = (row[xi].as_f64(), row[yi].as_f64()) else {
                continue;
            };
            if !x_ticks.contains(&xv) {
                x_ticks.push(xv);
            }
            let name = row[li].to_string();
            match series.iter_mut().find(|s| s.name == name) {
                Some(s) => s.points.push((xv, yv)),
                None => series.push(LineSeries {
                    name,
                    points: vec![(xv, yv)],
                }),
            }
        }
        x_ticks.sort_by(f64::total_cmp);

        Ok(Self {
            title: title.to_owned(),
            x_label: x.to_owned(),
            y_label: y.to_owned(),
            x_ticks,
            series,
        })
    }
}

/// Bar direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Categories along x, values up the y axis.
    Vertical,
    /// Categories along y (first row at the bottom), values along x.
    Horizontal,
}

/// A single-series bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    /// Chart title.
    pub title: String,
    /// Category column name.
    pub category_label: String,
    /// Value column name.
    pub value_label: String,
    /// Bar direction.
    pub orientation: Orientation,
    /// `(category, value)` in row order; a null value draws no bar.
    pub bars: Vec<(String, Option<f64>)>,
}

impl BarChart {
    /// One bar per row: `category` labels, `value` lengths.
    pub fn from_table(
        table: &Table,
        category: &str,
        value: &str,
        title: &str,
        orientation: Orientation,
    ) -> AnalysisResult<Self> {
        let ci = table.schema.require(category, "bar chart")?;
        let vi = table.schema.require(value, "bar chart")?;
        require_numeric(table, vi, "bar chart")?;

        Ok(Self {
            title: title.to_owned(),
            category_label: category.to_owned(),
            value_label: value.to_owned(),
            orientation,
            bars: table
                .rows
                .iter()
                .map(|row| (row[ci].to_string(), row[vi].as_f64()))
                .collect(),
        })
    }
}

/// Horizontal box plots of a numeric column per category, split by a hue column.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxChart {
    /// Chart title.
    pub title: String,
    /// Numeric column name (x axis).
    pub value_label: String,
    /// Category column name (y axis).
    pub category_label: String,
    /// Hue column name (legend).
    pub hue_label: String,
    /// Distinct hue values, ascending.
    pub hues: Vec<String>,
    /// One group per requested category, in the requested order.
    pub groups: Vec<BoxGroup>,
}

/// All boxes of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxGroup {
    /// Category label.
    pub category: String,
    /// One entry per hue (same order as [`BoxChart::hues`]); `None` when there is no data.
    pub boxes: Vec<Option<BoxStats>>,
}

impl BoxChart {
    /// Summarize `value` per (`category` in `order`, `hue`) combination.
    pub fn from_table(
        table: &Table,
        value: &str,
        category: &str,
        order: &[&str],
        hue: &str,
        title: &str,
    ) -> AnalysisResult<Self> {
        let vi = table.schema.require(value, "box plot")?;
        let ci = table.schema.require(category, "box plot")?;
        let hi = table.schema.require(hue, "box plot")?;
        require_numeric(table, vi, "box plot")?;

        let mut hue_values: Vec<&Value> = Vec::new();
        for row in &table.rows {
            let h = &row[hi];
            if !h.is_null() && !hue_values.iter().any(|seen| seen.total_cmp(h).is_eq()) {
                hue_values.push(h);
            }
        }
        hue_values.sort_by(|a, b| a.total_cmp(b));

        let groups = order
            .iter()
            .map(|&cat| BoxGroup {
                category: cat.to_owned(),
                boxes: hue_values
                    .iter()
                    .map(|h| {
                        let values: Vec<f64> = table
                            .rows
                            .iter()
                            .filter(|row| row[ci].key_string().as_deref() == Some(cat))
                            .filter(|row| row[hi].total_cmp(h).is_eq())
                            .filter_map(|row| row[vi].as_f64())
                            .collect();
                        BoxStats::from_values(&values)
                    })
                    .collect(),
            })
            .collect();

        Ok(Self {
            title: title.to_owned(),
            value_label: value.to_owned(),
            category_label: category.to_owned(),
            hue_label: hue.to_owned(),
            hues: hue_values.iter().map(|h| h.to_string()).collect(),
            groups,
        })
    }
}

fn require_numeric(table: &Table, idx: usize, operation: &'static str) -> AnalysisResult<()> {
    let field = &table.schema.fields[idx];
    if field.data_type.is_numeric() {
        Ok(())
    } else {
        Err(AnalysisError::SchemaMismatch {
            message: format!(
                "{operation} needs a numeric column, '{}' is {}",
                field.name, field.data_type
            ),
        })
    }
}
