//! The hunger-trends analysis as an explicit composition of loader, transforms and charts.
//!
//! Each step is a plain function from tables to a table, so every intermediate result can be
//! inspected or tested on its own. [`run`] chains them for the binary.

use std::path::PathBuf;
use std::sync::Arc;

use crate::chart::ChartRenderer;
use crate::config::AnalysisConfig;
use crate::error::AnalysisResult;
use crate::explore::{SchemaReport, explore};
use crate::ingestion::{
    CompositeObserver, FileObserver, LoadObserver, LoadOptions, TextEncoding, TracingObserver, load,
};
use crate::processing::{
    MeanColumns, Predicate, SortOrder, classify_buckets, filter, filter_and_sort, group_by_mean, head,
    left_join, period_label, rename_column, select_columns, sort_by,
};
use crate::types::{Table, Value};

/// Hunger index column name in the source file.
pub const GHI_SOURCE_COLUMN: &str = "Global Hunger Index (2021)";
/// Underweight prevalence column name in the source file.
pub const UNDERWEIGHT_SOURCE_COLUMN: &str = "Prevalence of underweight, weight for age (% of children under 5)";

/// Short name of the hunger index column after preparation.
pub const GHI: &str = "GHI";
/// Short name of the underweight column after preparation.
pub const UNDERWEIGHT: &str = "Underweight %";
/// Derived period label column.
pub const PERIOD: &str = "period";

/// The three raw input tables.
#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    /// Hunger index time series.
    pub hunger_index: Table,
    /// Child underweight time series.
    pub child_weight: Table,
    /// Country to continent mapping.
    pub continents: Table,
}

impl Inputs {
    /// Load all three files named by `config`.
    pub fn load(config: &AnalysisConfig) -> AnalysisResult<Self> {
        let observer: Arc<dyn LoadObserver> = match &config.load_log {
            Some(path) => Arc::new(CompositeObserver::new(vec![
                Arc::new(TracingObserver) as Arc<dyn LoadObserver>,
                Arc::new(FileObserver::new(path)),
            ])),
            None => Arc::new(TracingObserver),
        };
        let observed = |encoding: TextEncoding| LoadOptions {
            observer: Some(observer.clone()),
            ..LoadOptions::with_encoding(encoding)
        };
        let utf8 = observed(TextEncoding::utf8());
        let continent_encoding = TextEncoding::from_label(&config.continent_encoding)?;

        Ok(Self {
            hunger_index: load(&config.hunger_index_path, &utf8)?,
            child_weight: load(&config.child_weight_path, &utf8)?,
            continents: load(&config.continent_path, &observed(continent_encoding))?,
        })
    }

    /// One labeled schema report per input, in load order.
    pub fn reports(&self) -> Vec<SchemaReport> {
        vec![
            explore(&self.hunger_index).labeled("hunger index"),
            explore(&self.child_weight).labeled("child weight"),
            explore(&self.continents).labeled("continents"),
        ]
    }
}

/// Rename the index column, attach each country's continent and keep
/// `country, Code, Year, GHI, continent`.
pub fn prepare_hunger_index(hunger: &Table, continents: &Table) -> AnalysisResult<Table> {
    let hunger = rename_column(hunger, GHI_SOURCE_COLUMN, GHI)?;
    let mapping = select_columns(continents, &["code_3", "continent"])?;
    let joined = left_join(&hunger, &mapping, "Code", "code_3")?;
    let selected = select_columns(&joined, &["Entity", "Code", "Year", GHI, "continent"])?;
    rename_column(&selected, "Entity", "country")
}

/// Rename the prevalence column and add the `period` label derived from `Year`.
pub fn prepare_child_weight(child: &Table) -> AnalysisResult<Table> {
    let child = rename_column(child, UNDERWEIGHT_SOURCE_COLUMN, UNDERWEIGHT)?;
    classify_buckets(&child, "Year", PERIOD, period_label)
}

/// Mean of every numeric column per `(continent, Year)`.
///
/// Countries without a continent are left out instead of forming a group of their own.
pub fn trends_by_continent(hunger: &Table) -> AnalysisResult<Table> {
    let with_continent = filter(hunger, &Predicate::not_null("continent"))?;
    group_by_mean(&with_continent, &["continent", "Year"], MeanColumns::AllNumeric)
}

/// Mean underweight share per period, lowest first.
pub fn child_trend(child: &Table) -> AnalysisResult<Table> {
    let by_period = group_by_mean(child, &[PERIOD], MeanColumns::Column(UNDERWEIGHT))?;
    filter_and_sort(&by_period, &Predicate::All, UNDERWEIGHT, SortOrder::Ascending)
}

/// Rows whose `Year` is one of `years`.
pub fn change_between(hunger: &Table, years: &[i64]) -> AnalysisResult<Table> {
    let years = years.iter().copied().map(Value::Int64).collect();
    filter(hunger, &Predicate::is_in("Year", years))
}

/// The `n` highest-GHI countries of `year`, in ascending GHI order for a ranked bar chart.
pub fn top_countries(hunger: &Table, year: i64, n: usize) -> AnalysisResult<Table> {
    let ranked = filter_and_sort(
        hunger,
        &Predicate::equals("Year", Value::Int64(year)),
        GHI,
        SortOrder::Descending,
    )?;
    sort_by(&head(&ranked, n), GHI, SortOrder::Ascending)
}

/// Every table the analysis derives from its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Derived {
    /// Prepared hunger index (`country, Code, Year, GHI, continent`).
    pub hunger_index: Table,
    /// Prepared child weight with `period`.
    pub child_weight: Table,
    /// Mean GHI per continent and year.
    pub trends: Table,
    /// Mean underweight share per period.
    pub child_trend: Table,
    /// Hunger index restricted to the comparison years.
    pub change: Table,
    /// Top countries of the ranking year.
    pub top: Table,
}

/// Run every transform over `inputs`.
pub fn derive(inputs: &Inputs, config: &AnalysisConfig) -> AnalysisResult<Derived> {
    let hunger_index = prepare_hunger_index(&inputs.hunger_index, &inputs.continents)?;
    let child_weight = prepare_child_weight(&inputs.child_weight)?;
    tracing::info!(
        hunger_rows = hunger_index.row_count(),
        child_rows = child_weight.row_count(),
        "prepared inputs"
    );

    let derived = Derived {
        trends: trends_by_continent(&hunger_index)?,
        child_trend: child_trend(&child_weight)?,
        change: change_between(&hunger_index, &config.comparison_years)?,
        top: top_countries(&hunger_index, config.ranking_year, config.top_n)?,
        hunger_index,
        child_weight,
    };
    tracing::info!(
        trends = derived.trends.row_count(),
        periods = derived.child_trend.row_count(),
        change = derived.change.row_count(),
        top = derived.top.row_count(),
        "derived tables"
    );
    Ok(derived)
}

/// Draw the four charts into `config.output_dir`.
pub fn render(derived: &Derived, config: &AnalysisConfig) -> AnalysisResult<Vec<PathBuf>> {
    let renderer = ChartRenderer::new(&config.output_dir);
    let [from, to] = config.comparison_years;
    let order: Vec<&str> = config.continent_order.iter().map(String::as_str).collect();

    Ok(vec![
        renderer.line(
            "trends_by_continent",
            &derived.trends,
            "Year",
            GHI,
            "continent",
            "Average Hunger Index Per Continent (2000- 2021)",
        )?,
        renderer.bar(
            "underweight_by_period",
            &derived.child_trend,
            PERIOD,
            UNDERWEIGHT,
            "Percentage of Underweight Children (1983-2021)",
        )?,
        renderer.box_plot(
            &format!("ghi_change_{from}_{to}"),
            &derived.change,
            GHI,
            "continent",
            &order,
            "Year",
            "Global Hunger Index Per Continent",
        )?,
        renderer.ranked_bar(
            &format!("top_ghi_{}", config.ranking_year),
            &derived.top,
            "country",
            GHI,
            &format!("Top {} Countries with Highest GHI in {}", config.top_n, config.ranking_year),
        )?,
    ])
}

/// Outcome of a full run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Schema reports of the raw inputs.
    pub reports: Vec<SchemaReport>,
    /// Derived tables.
    pub derived: Derived,
    /// Written chart files.
    pub charts: Vec<PathBuf>,
}

/// Load, transform and render in one call.
pub fn run(config: &AnalysisConfig) -> AnalysisResult<AnalysisReport> {
    let inputs = Inputs::load(config)?;
    let reports = inputs.reports();
    let derived = derive(&inputs, config)?;
    let charts = render(&derived, config)?;
    tracing::info!(charts = charts.len(), dir = %config.output_dir.display(), "analysis complete");
    Ok(AnalysisReport {
        reports,
        derived,
        charts,
    })
}
