//! Chart rendering: prepared tables in, one SVG file out per call.
//!
//! Rendering happens in two steps. A model ([`LineChart`], [`BarChart`], [`BoxChart`]) is built
//! from the table, which validates the referenced columns; the model is then drawn to SVG by
//! [`svg`] and written into the renderer's output directory. Tables are only borrowed.

pub mod model;
pub mod stats;
pub mod svg;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AnalysisResult;
use crate::types::Table;

pub use model::{BarChart, BoxChart, BoxGroup, LineChart, LineSeries, Orientation};
pub use stats::BoxStats;

/// matplotlib's default colour cycle.
const TAB10: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

/// ColorBrewer "Set3".
const SET3: &[&str] = &[
    "#8dd3c7", "#ffffb3", "#bebada", "#fb8072", "#80b1d3", "#fdb462", "#b3de69", "#fccde5", "#d9d9d9", "#bc80bd",
    "#ccebc5", "#ffed6f",
];

/// Presentation settings for one kind of chart.
///
/// None of these affect which data is drawn; they only control size, colours and fonts.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    /// Figure width in pixels.
    pub width: u32,
    /// Figure height in pixels.
    pub height: u32,
    /// Figure background colour.
    pub background: String,
    /// Plot-area background colour.
    pub plot_background: String,
    /// Series / hue colours, cycled; bar charts use the first entry.
    pub palette: Vec<String>,
    /// Font family for all text.
    pub font_family: String,
    /// Title font size.
    pub title_font_size: f64,
    /// Axis label font size.
    pub label_font_size: f64,
    /// Tick and legend font size.
    pub tick_font_size: f64,
}

impl ChartStyle {
    /// Trend line defaults: 10x6 figure, default colour cycle.
    pub fn line() -> Self {
        Self {
            width: 1000,
            height: 600,
            background: "white".to_string(),
            plot_background: "white".to_string(),
            palette: TAB10.iter().map(|c| c.to_string()).collect(),
            font_family: "sans-serif".to_string(),
            title_font_size: 14.0,
            label_font_size: 12.0,
            tick_font_size: 10.0,
        }
    }

    /// Bar defaults: 16x9 figure, navy bars, large title.
    pub fn bar() -> Self {
        Self {
            width: 1600,
            height: 900,
            palette: vec!["#000080".to_string()],
            font_family: "Segoe UI, sans-serif".to_string(),
            title_font_size: 20.0,
            label_font_size: 15.0,
            tick_font_size: 12.0,
            ..Self::line()
        }
    }

    /// Box plot defaults: 14x7 figure, Set3 palette on ghostwhite / mintcream.
    pub fn box_plot() -> Self {
        Self {
            width: 1400,
            height: 700,
            background: "#f8f8ff".to_string(),
            plot_background: "#f5fffa".to_string(),
            palette: SET3.iter().map(|c| c.to_string()).collect(),
            font_family: "Segoe UI, sans-serif".to_string(),
            title_font_size: 20.0,
            ..Self::line()
        }
    }
}

/// Writes charts as SVG files into a directory.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    output_dir: PathBuf,
    /// Style for [`Self::line`].
    pub line_style: ChartStyle,
    /// Style for [`Self::bar`] and [`Self::ranked_bar`].
    pub bar_style: ChartStyle,
    /// Style for [`Self::box_plot`].
    pub box_style: ChartStyle,
}

impl ChartRenderer {
    /// Renderer writing into `output_dir` (created on first write) with default styles.
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            line_style: ChartStyle::line(),
            bar_style: ChartStyle::bar(),
            box_style: ChartStyle::box_plot(),
        }
    }

    /// Directory charts are written into.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Trend lines of `y` over `x`, one line per distinct `legend` value.
    pub fn line(&self, name: &str, table: &Table, x: &str, y: &str, legend: &str, title: &str) -> AnalysisResult<PathBuf> {
        let chart = LineChart::from_table(table, x, y, legend, title)?;
        self.write(name, svg::render_line(&chart, &self.line_style))
    }

    /// Vertical bars of `y` per `x` category, in row order.
    pub fn bar(&self, name: &str, table: &Table, x: &str, y: &str, title: &str) -> AnalysisResult<PathBuf> {
        let chart = BarChart::from_table(table, x, y, title, Orientation::Vertical)?;
        self.write(name, svg::render_bar(&chart, &self.bar_style))
    }

    /// Horizontal bars of `value` per `category`; the first row is drawn at the bottom, so an
    /// ascending table puts the largest value on top.
    pub fn ranked_bar(&self, name: &str, table: &Table, category: &str, value: &str, title: &str) -> AnalysisResult<PathBuf> {
        let chart = BarChart::from_table(table, category, value, title, Orientation::Horizontal)?;
        self.write(name, svg::render_bar(&chart, &self.bar_style))
    }

    /// Horizontal box plots of `value` per `category` (in `order`), split by `hue`.
    pub fn box_plot(
        &self,
        name: &str,
        table: &Table,
        value: &str,
        category: &str,
        order: &[&str],
        hue: &str,
        title: &str,
    ) -> AnalysisResult<PathBuf> {
        let chart = BoxChart::from_table(table, value, category, order, hue, title)?;
        self.write(name, svg::render_box(&chart, &self.box_style))
    }

    fn write(&self, name: &str, svg: String) -> AnalysisResult<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(format!("{name}.svg"));
        fs::write(&path, svg)?;
        tracing::info!(path = %path.display(), "wrote chart");
        Ok(path)
    }
}
