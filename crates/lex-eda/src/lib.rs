//! Statistical profiling engine for tabular datasets.
//!
//! Given a table of named numeric and categorical columns and an optional
//! binary outcome column, the engine produces a single [`Report`] holding:
//!
//! - **Overview**: shape, completeness and class balance
//! - **Univariate profiles**: summary statistics, distribution shape, a
//!   normality test and IQR outlier bounds per numeric column; frequencies
//!   and entropy per categorical column
//! - **Bivariate analysis**: each feature against the outcome with
//!   t-test, Mann-Whitney U, Levene and Cohen's d, or chi-square and
//!   Cramér's V for categorical features
//! - **Multivariate analysis**: Pearson correlation matrix, strongly
//!   correlated pairs and a PCA explained-variance summary
//! - **Insights and recommendations**: rule-based sentences derived from
//!   the above
//!
//! Degenerate statistics (too few values, zero variance, an empty group)
//! never fail the run. They appear in the report as `not_computable`
//! entries. Only structural input problems are errors.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_eda::{Dataset, EdaProfiler, ProfilerConfig, load_csv};
//!
//! let df = load_csv("data/heart.csv")?;
//! let dataset = Dataset::from_dataframe(&df)?;
//!
//! let config = ProfilerConfig::builder()
//!     .outcome_column("target")
//!     .iqr_multiplier(1.5)
//!     .build()?;
//!
//! let report = EdaProfiler::new(config)?.profile(&dataset)?;
//! for insight in &report.insights {
//!     println!("{}", insight);
//! }
//! ```
//!
//! # Building a dataset by hand
//!
//! ```rust,ignore
//! use lex_eda::{Column, Dataset};
//!
//! let dataset = Dataset::new(vec![
//!     Column::numeric("age", vec![Some(54.0), None, Some(61.0)]),
//!     Column::categorical("sex", vec![Some("m"), Some("f"), Some("f")]),
//!     Column::numeric("target", vec![Some(1.0), Some(0.0), Some(1.0)]),
//! ])?;
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod insights;
pub mod profiler;
pub mod reporting;
pub mod stats;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{ConfigValidationError, ProfilerConfig, ProfilerConfigBuilder};
pub use dataset::{Column, ColumnData, ColumnKind, Dataset, load_csv};
pub use error::{EdaError, Result as EdaResult, ResultExt};
pub use insights::{generate_insights, generate_recommendations};
pub use profiler::{EdaProfiler, OutlierDetector};
pub use reporting::{ReportEnvelope, ReportGenerator};
pub use stats::StatsError;
pub use types::{
    BivariateDetail, BivariateResult, CategoricalProfile, Computation, EffectMagnitude,
    EffectSize, FeatureDetail, FeatureProfile, MultivariateResult, NumericProfile, OutlierReport,
    Overview, Report,
};
pub use utils::is_numeric_dtype;
