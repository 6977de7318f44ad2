//! Configuration types for the profiling engine.
//!
//! Every threshold the engine applies lives in [`thresholds`] as a named
//! constant and is surfaced through [`ProfilerConfig`], so callers can
//! recalibrate without touching analysis code.

use serde::{Deserialize, Serialize};

/// Default thresholds used by the profiler and the insight rules.
pub mod thresholds {
    /// Column name used as the outcome when none is configured.
    pub const DEFAULT_OUTCOME_COLUMN: &str = "target";
    /// p-value below which a test is reported as significant.
    pub const SIGNIFICANCE_LEVEL: f64 = 0.05;
    /// IQR multiplier `k` for the outlier fences.
    pub const IQR_MULTIPLIER: f64 = 1.5;
    /// Minority class share (percent) below which the outcome is imbalanced.
    pub const IMBALANCE_THRESHOLD_PCT: f64 = 30.0;
    /// Missing percentage above which a column gets a handling recommendation.
    pub const MISSING_RECOMMENDATION_PCT: f64 = 5.0;
    /// Outlier percentage above which a column gets a capping recommendation.
    pub const OUTLIER_RECOMMENDATION_PCT: f64 = 5.0;
    /// Standard deviation above which a column gets a scaling recommendation.
    pub const SCALING_STD_THRESHOLD: f64 = 100.0;
    /// Absolute Pearson correlation above which a pair is reported.
    pub const HIGH_CORRELATION_THRESHOLD: f64 = 0.7;
    /// Cumulative explained variance the PCA summary targets.
    pub const PCA_VARIANCE_TARGET: f64 = 0.95;
    /// Absolute skewness above which a skew insight is emitted.
    pub const SKEW_THRESHOLD: f64 = 1.0;
    /// Number of leading numeric columns inspected for skew insights.
    pub const SKEW_INSIGHT_COLUMNS: usize = 5;
    /// Maximum number of recommendations in a report.
    pub const MAX_RECOMMENDATIONS: usize = 10;
    /// Number of most frequent values kept per categorical column.
    pub const TOP_VALUES: usize = 10;
    /// Number of outlier values listed per numeric column.
    pub const MAX_OUTLIER_VALUES: usize = 10;
    /// Fewest observations the normality test accepts.
    pub const MIN_NORMALITY_SAMPLES: usize = 8;
    /// Upper bounds of the negligible, small and medium Cohen's d buckets.
    pub const COHENS_D_BUCKETS: [f64; 3] = [0.2, 0.5, 0.8];
    /// Upper bounds of the negligible, small and medium Cramér's V buckets.
    pub const CRAMERS_V_BUCKETS: [f64; 3] = [0.1, 0.3, 0.5];
}

use thresholds::*;

/// Configuration for the profiling engine.
///
/// Use [`ProfilerConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_eda::config::ProfilerConfig;
///
/// let config = ProfilerConfig::builder()
///     .outcome_column("diagnosis")
///     .iqr_multiplier(3.0)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    /// Explicit outcome column.
    ///
    /// When `None`, a column named `target` is used if present and bivariate
    /// analysis is skipped otherwise. When set, the column must exist.
    /// Default: None
    pub outcome_column: Option<String>,

    /// Significance level for every hypothesis test.
    /// Default: 0.05
    pub significance_level: f64,

    /// IQR multiplier for outlier bounds.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Minority class share (percent) below which the outcome counts as imbalanced.
    /// Default: 30.0
    pub imbalance_threshold_pct: f64,

    /// Missing percentage that triggers a handling recommendation.
    /// Default: 5.0
    pub missing_recommendation_pct: f64,

    /// Outlier percentage that triggers a capping recommendation.
    /// Default: 5.0
    pub outlier_recommendation_pct: f64,

    /// Standard deviation that triggers a scaling recommendation.
    /// Default: 100.0
    pub scaling_std_threshold: f64,

    /// Absolute correlation above which a pair is reported.
    /// Default: 0.7
    pub correlation_threshold: f64,

    /// Cumulative explained variance used for the component count.
    /// Default: 0.95
    pub pca_variance_target: f64,

    /// Absolute skewness that triggers a skew insight.
    /// Default: 1.0
    pub skew_threshold: f64,

    /// Leading numeric columns checked for skew insights.
    /// Default: 5
    pub skew_insight_columns: usize,

    /// Cap on the recommendation list.
    /// Default: 10
    pub max_recommendations: usize,

    /// Most frequent values kept per categorical column.
    /// Default: 10
    pub top_values: usize,

    /// Outlier values listed per numeric column.
    /// Default: 10
    pub max_outlier_values: usize,

    /// Fewest non-missing observations for the normality test.
    /// Default: 8
    pub min_normality_samples: usize,

    /// Whether a numeric outcome takes part in correlation and PCA.
    /// Default: true
    pub include_outcome_in_multivariate: bool,

    /// Run the outcome-dependent stages at all.
    /// Default: true
    pub analyze_outcome: bool,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            outcome_column: None,
            significance_level: SIGNIFICANCE_LEVEL,
            iqr_multiplier: IQR_MULTIPLIER,
            imbalance_threshold_pct: IMBALANCE_THRESHOLD_PCT,
            missing_recommendation_pct: MISSING_RECOMMENDATION_PCT,
            outlier_recommendation_pct: OUTLIER_RECOMMENDATION_PCT,
            scaling_std_threshold: SCALING_STD_THRESHOLD,
            correlation_threshold: HIGH_CORRELATION_THRESHOLD,
            pca_variance_target: PCA_VARIANCE_TARGET,
            skew_threshold: SKEW_THRESHOLD,
            skew_insight_columns: SKEW_INSIGHT_COLUMNS,
            max_recommendations: MAX_RECOMMENDATIONS,
            top_values: TOP_VALUES,
            max_outlier_values: MAX_OUTLIER_VALUES,
            min_normality_samples: MIN_NORMALITY_SAMPLES,
            include_outcome_in_multivariate: true,
            analyze_outcome: true,
        }
    }
}

impl ProfilerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ProfilerConfigBuilder {
        ProfilerConfigBuilder::default()
    }

    /// Name of the column to treat as outcome, and whether it was requested explicitly.
    pub fn outcome_name(&self) -> (&str, bool) {
        match &self.outcome_column {
            Some(name) => (name.as_str(), true),
            None => (DEFAULT_OUTCOME_COLUMN, false),
        }
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, value) in [
            ("significance_level", self.significance_level),
            ("pca_variance_target", self.pca_variance_target),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigValidationError::InvalidProbability {
                    field: field.to_string(),
                    value,
                });
            }
        }

        for (field, value) in [
            ("imbalance_threshold_pct", self.imbalance_threshold_pct),
            ("missing_recommendation_pct", self.missing_recommendation_pct),
            ("outlier_recommendation_pct", self.outlier_recommendation_pct),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigValidationError::InvalidPercentage {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if !(0.0..=1.0).contains(&self.correlation_threshold) {
            return Err(ConfigValidationError::InvalidProbability {
                field: "correlation_threshold".to_string(),
                value: self.correlation_threshold,
            });
        }

        for (field, value) in [
            ("iqr_multiplier", self.iqr_multiplier),
            ("scaling_std_threshold", self.scaling_std_threshold),
            ("skew_threshold", self.skew_threshold),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigValidationError::NotPositive {
                    field: field.to_string(),
                    value,
                });
            }
        }

        for (field, value) in [
            ("max_recommendations", self.max_recommendations),
            ("top_values", self.top_values),
            ("max_outlier_values", self.max_outlier_values),
        ] {
            if value == 0 {
                return Err(ConfigValidationError::ZeroCount(field.to_string()));
            }
        }

        if self.min_normality_samples < MIN_NORMALITY_SAMPLES {
            return Err(ConfigValidationError::NormalitySamples(
                self.min_normality_samples,
            ));
        }

        if matches!(&self.outcome_column, Some(name) if name.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyOutcomeName);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid value for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidProbability { field: String, value: f64 },

    #[error("Invalid percentage for '{field}': {value} (must be between 0 and 100)")]
    InvalidPercentage { field: String, value: f64 },

    #[error("Invalid value for '{field}': {value} (must be positive)")]
    NotPositive { field: String, value: f64 },

    #[error("Invalid value for '{0}': must be at least 1")]
    ZeroCount(String),

    #[error("Invalid normality sample floor: {0} (must be at least 8)")]
    NormalitySamples(usize),

    #[error("Outcome column name must not be empty")]
    EmptyOutcomeName,
}

impl From<ConfigValidationError> for crate::error::EdaError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::EdaError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`ProfilerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ProfilerConfigBuilder {
    outcome_column: Option<String>,
    significance_level: Option<f64>,
    iqr_multiplier: Option<f64>,
    imbalance_threshold_pct: Option<f64>,
    missing_recommendation_pct: Option<f64>,
    outlier_recommendation_pct: Option<f64>,
    scaling_std_threshold: Option<f64>,
    correlation_threshold: Option<f64>,
    pca_variance_target: Option<f64>,
    skew_threshold: Option<f64>,
    skew_insight_columns: Option<usize>,
    max_recommendations: Option<usize>,
    top_values: Option<usize>,
    max_outlier_values: Option<usize>,
    min_normality_samples: Option<usize>,
    include_outcome_in_multivariate: Option<bool>,
    analyze_outcome: Option<bool>,
}

impl ProfilerConfigBuilder {
    /// Set an explicit outcome column.
    ///
    /// The column must exist in every dataset profiled with this config.
    pub fn outcome_column(mut self, column: impl Into<String>) -> Self {
        self.outcome_column = Some(column.into());
        self
    }

    /// Set the significance level used by every test.
    pub fn significance_level(mut self, alpha: f64) -> Self {
        self.significance_level = Some(alpha);
        self
    }

    /// Set the IQR multiplier for outlier bounds.
    pub fn iqr_multiplier(mut self, k: f64) -> Self {
        self.iqr_multiplier = Some(k);
        self
    }

    /// Set the minority share (percent) below which the outcome is imbalanced.
    pub fn imbalance_threshold_pct(mut self, pct: f64) -> Self {
        self.imbalance_threshold_pct = Some(pct);
        self
    }

    /// Set the missing percentage that triggers a recommendation.
    pub fn missing_recommendation_pct(mut self, pct: f64) -> Self {
        self.missing_recommendation_pct = Some(pct);
        self
    }

    /// Set the outlier percentage that triggers a recommendation.
    pub fn outlier_recommendation_pct(mut self, pct: f64) -> Self {
        self.outlier_recommendation_pct = Some(pct);
        self
    }

    /// Set the standard deviation that triggers a scaling recommendation.
    pub fn scaling_std_threshold(mut self, std: f64) -> Self {
        self.scaling_std_threshold = Some(std);
        self
    }

    /// Set the absolute correlation above which pairs are reported.
    pub fn correlation_threshold(mut self, threshold: f64) -> Self {
        self.correlation_threshold = Some(threshold);
        self
    }

    /// Set the cumulative explained-variance target.
    pub fn pca_variance_target(mut self, target: f64) -> Self {
        self.pca_variance_target = Some(target);
        self
    }

    /// Set the absolute skewness that triggers an insight.
    pub fn skew_threshold(mut self, threshold: f64) -> Self {
        self.skew_threshold = Some(threshold);
        self
    }

    /// Set how many leading numeric columns are checked for skew.
    pub fn skew_insight_columns(mut self, n: usize) -> Self {
        self.skew_insight_columns = Some(n);
        self
    }

    /// Set the recommendation cap.
    pub fn max_recommendations(mut self, n: usize) -> Self {
        self.max_recommendations = Some(n);
        self
    }

    /// Set how many frequent values are kept per categorical column.
    pub fn top_values(mut self, n: usize) -> Self {
        self.top_values = Some(n);
        self
    }

    /// Set how many outlier values are listed per numeric column.
    pub fn max_outlier_values(mut self, n: usize) -> Self {
        self.max_outlier_values = Some(n);
        self
    }

    /// Set the observation floor for the normality test.
    pub fn min_normality_samples(mut self, n: usize) -> Self {
        self.min_normality_samples = Some(n);
        self
    }

    /// Include or exclude a numeric outcome from correlation and PCA.
    pub fn include_outcome_in_multivariate(mut self, include: bool) -> Self {
        self.include_outcome_in_multivariate = Some(include);
        self
    }

    /// Disable outcome resolution; the report then has no bivariate section.
    pub fn analyze_outcome(mut self, analyze: bool) -> Self {
        self.analyze_outcome = Some(analyze);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ProfilerConfig` or an error if validation fails.
    pub fn build(self) -> Result<ProfilerConfig, ConfigValidationError> {
        let config = ProfilerConfig {
            outcome_column: self.outcome_column,
            significance_level: self.significance_level.unwrap_or(SIGNIFICANCE_LEVEL),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(IQR_MULTIPLIER),
            imbalance_threshold_pct: self
                .imbalance_threshold_pct
                .unwrap_or(IMBALANCE_THRESHOLD_PCT),
            missing_recommendation_pct: self
                .missing_recommendation_pct
                .unwrap_or(MISSING_RECOMMENDATION_PCT),
            outlier_recommendation_pct: self
                .outlier_recommendation_pct
                .unwrap_or(OUTLIER_RECOMMENDATION_PCT),
            scaling_std_threshold: self.scaling_std_threshold.unwrap_or(SCALING_STD_THRESHOLD),
            correlation_threshold: self
                .correlation_threshold
                .unwrap_or(HIGH_CORRELATION_THRESHOLD),
            pca_variance_target: self.pca_variance_target.unwrap_or(PCA_VARIANCE_TARGET),
            skew_threshold: self.skew_threshold.unwrap_or(SKEW_THRESHOLD),
            skew_insight_columns: self.skew_insight_columns.unwrap_or(SKEW_INSIGHT_COLUMNS),
            max_recommendations: self.max_recommendations.unwrap_or(MAX_RECOMMENDATIONS),
            top_values: self.top_values.unwrap_or(TOP_VALUES),
            max_outlier_values: self.max_outlier_values.unwrap_or(MAX_OUTLIER_VALUES),
            min_normality_samples: self
                .min_normality_samples
                .unwrap_or(MIN_NORMALITY_SAMPLES),
            include_outcome_in_multivariate: self.include_outcome_in_multivariate.unwrap_or(true),
            analyze_outcome: self.analyze_outcome.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}
