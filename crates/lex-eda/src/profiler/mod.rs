//! Profiling pipeline.
//!
//! [`EdaProfiler`] runs the stages in a fixed order:
//!
//! 1. outcome resolution and dataset overview
//! 2. univariate profiles for every column
//! 3. feature versus outcome comparisons (only with a binary outcome)
//! 4. correlation matrix and PCA over the numeric columns
//! 5. insights and recommendations
//!
//! Each stage is a pure function of the dataset and the earlier stages'
//! output. Structural problems with the input fail the whole run; anything
//! that goes wrong inside a single column is recorded in that column's entry.

pub mod bivariate;
pub mod multivariate;
pub mod outliers;
pub mod overview;
pub mod univariate;

use crate::config::ProfilerConfig;
use crate::dataset::Dataset;
use crate::error::{EdaError, Result};
use crate::insights::{generate_insights, generate_recommendations};
use crate::types::Report;
use std::time::Instant;
use tracing::{debug, info};

pub use outliers::OutlierDetector;
pub use overview::Outcome;

/// Runs the full profiling pipeline over a [`Dataset`].
///
/// # Example
///
/// ```rust,ignore
/// use lex_eda::{Dataset, EdaProfiler, ProfilerConfig};
///
/// let profiler = EdaProfiler::new(ProfilerConfig::builder().outcome_column("diagnosis").build()?)?;
/// let report = profiler.profile(&dataset)?;
/// println!("{}", serde_json::to_string_pretty(&report)?);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EdaProfiler {
    config: ProfilerConfig,
}

static_assertions::assert_impl_all!(EdaProfiler: Send, Sync);

impl EdaProfiler {
    /// Create a profiler, rejecting an invalid configuration.
    pub fn new(config: ProfilerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Profile a dataset.
    ///
    /// # Errors
    ///
    /// Fails with an input error when the dataset has no rows or columns,
    /// when an explicitly configured outcome column is missing, or when the
    /// outcome is not binary.
    pub fn profile(&self, dataset: &Dataset) -> Result<Report> {
        let start = Instant::now();
        let config = &self.config;

        if dataset.n_columns() == 0 {
            return Err(EdaError::EmptyDataset("no columns".to_string()));
        }
        if dataset.n_rows() == 0 {
            return Err(EdaError::EmptyDataset("no rows".to_string()));
        }

        info!(
            "Profiling dataset: {} rows x {} columns",
            dataset.n_rows(),
            dataset.n_columns()
        );

        let stage = Instant::now();
        let outcome = overview::resolve_outcome(dataset, config)?;
        let overview = overview::build_overview(dataset, outcome.as_ref(), config);
        debug!(
            "Overview complete in {}ms (outcome: {})",
            stage.elapsed().as_millis(),
            outcome.as_ref().map_or("none", |o| o.name())
        );

        let stage = Instant::now();
        let features = univariate::profile_columns(dataset.columns(), config);
        debug!(
            "Univariate profiles complete in {}ms ({} columns)",
            stage.elapsed().as_millis(),
            features.len()
        );

        let stage = Instant::now();
        let bivariate = match &outcome {
            Some(outcome) => bivariate::analyze_features(dataset.columns(), outcome, config),
            None => Vec::new(),
        };
        debug!(
            "Bivariate analysis complete in {}ms ({} features)",
            stage.elapsed().as_millis(),
            bivariate.len()
        );

        let stage = Instant::now();
        let outcome_name = outcome.as_ref().map(|o| o.name());
        let numeric = dataset.numeric_columns().filter(|c| {
            config.include_outcome_in_multivariate || Some(c.name()) != outcome_name
        });
        let multivariate = multivariate::analyze(numeric, config);
        debug!(
            "Multivariate analysis complete in {}ms",
            stage.elapsed().as_millis()
        );

        let stage = Instant::now();
        let insights = generate_insights(&overview, &features, config);
        let recommendations = generate_recommendations(&overview, &features, config);
        debug!(
            "Generated {} insights and {} recommendations in {}ms",
            insights.len(),
            recommendations.len(),
            stage.elapsed().as_millis()
        );

        info!(
            "Profiling complete in {}ms: {} numeric, {} categorical columns",
            start.elapsed().as_millis(),
            overview.numeric_columns,
            overview.categorical_columns
        );

        Ok(Report {
            overview,
            features,
            bivariate,
            multivariate,
            insights,
            recommendations,
        })
    }
}
