//! Report value types.
//!
//! Everything here serializes to plain JSON. Undefined numbers are `null`,
//! never NaN, and per-column lists keep dataset column order.

use crate::config::thresholds::{COHENS_D_BUCKETS, CRAMERS_V_BUCKETS};
use crate::dataset::ColumnKind;
use crate::stats::{StatsError, StatsResult};
use serde::{Deserialize, Serialize};

// ============================================================================
// Soft failures
// ============================================================================

/// A statistic that is either computed or explicitly marked as not computable.
///
/// Serializes as `{"status": "computed", ...fields}` or
/// `{"status": "not_computable", "reason": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Computation<T> {
    Computed(T),
    NotComputable { reason: String },
}

impl<T> Computation<T> {
    pub fn not_computable(reason: impl Into<String>) -> Self {
        Computation::NotComputable {
            reason: reason.into(),
        }
    }

    /// The computed value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Computation::Computed(v) => Some(v),
            Computation::NotComputable { .. } => None,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, Computation::Computed(_))
    }
}

impl<T> From<StatsResult<T>> for Computation<T> {
    fn from(result: StatsResult<T>) -> Self {
        match result {
            Ok(v) => Computation::Computed(v),
            Err(e) => Computation::from(e),
        }
    }
}

impl<T> From<StatsError> for Computation<T> {
    fn from(err: StatsError) -> Self {
        Computation::not_computable(err.to_string())
    }
}

// ============================================================================
// Overview
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassCount {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

/// Class balance of the binary outcome column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    pub column: String,
    /// Both classes, ordered by label.
    pub classes: Vec<ClassCount>,
    /// Rows whose outcome is missing; excluded from group comparisons.
    pub missing: usize,
    pub minority_label: String,
    pub minority_percentage: f64,
    pub is_imbalanced: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub rows: usize,
    pub columns: usize,
    pub column_kinds: Vec<ColumnSummary>,
    pub numeric_columns: usize,
    pub categorical_columns: usize,
    /// Rows without any missing value.
    pub complete_rows: usize,
    pub complete_percentage: f64,
    pub columns_with_missing: Vec<String>,
    pub total_missing: usize,
    pub total_missing_percentage: f64,
    pub outcome: Option<OutcomeSummary>,
}

// ============================================================================
// Univariate
// ============================================================================

/// IQR fences and the values falling outside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    pub column: String,
    pub count: usize,
    pub percentage: f64,
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub multiplier: f64,
    /// First outliers in row order.
    pub outlier_values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalityResult {
    pub test: String,
    pub statistic: f64,
    pub p_value: f64,
    pub is_normal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericProfile {
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub mode: Option<f64>,
    pub std: Option<f64>,
    pub variance: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub range: Option<f64>,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
    pub iqr: Option<f64>,
    pub skewness: Option<f64>,
    /// Excess kurtosis.
    pub kurtosis: Option<f64>,
    pub normality: Computation<NormalityResult>,
    pub outliers: OutlierReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueFrequency {
    pub value: String,
    pub count: usize,
    /// Share of non-missing values.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalProfile {
    pub count: usize,
    pub unique_values: usize,
    pub top_values: Vec<ValueFrequency>,
    /// Shannon entropy in bits over the full distribution.
    pub entropy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureDetail {
    Numeric(NumericProfile),
    Categorical(CategoricalProfile),
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProfile {
    pub name: String,
    pub missing_count: usize,
    pub missing_percentage: f64,
    pub detail: FeatureDetail,
}

impl FeatureProfile {
    pub fn numeric(&self) -> Option<&NumericProfile> {
        match &self.detail {
            FeatureDetail::Numeric(p) => Some(p),
            _ => None,
        }
    }

    pub fn categorical(&self) -> Option<&CategoricalProfile> {
        match &self.detail {
            FeatureDetail::Categorical(p) => Some(p),
            _ => None,
        }
    }
}

// ============================================================================
// Bivariate
// ============================================================================

/// Qualitative strength of an effect size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectMagnitude {
    Negligible,
    Small,
    Medium,
    Large,
}

impl EffectMagnitude {
    fn bucket(value: f64, bounds: [f64; 3]) -> Self {
        if value < bounds[0] {
            EffectMagnitude::Negligible
        } else if value < bounds[1] {
            EffectMagnitude::Small
        } else if value < bounds[2] {
            EffectMagnitude::Medium
        } else {
            EffectMagnitude::Large
        }
    }

    pub fn from_cohens_d(d: f64) -> Self {
        Self::bucket(d, COHENS_D_BUCKETS)
    }

    pub fn from_cramers_v(v: f64) -> Self {
        Self::bucket(v, CRAMERS_V_BUCKETS)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectMagnitude::Negligible => "negligible",
            EffectMagnitude::Small => "small",
            EffectMagnitude::Medium => "medium",
            EffectMagnitude::Large => "large",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSize {
    pub measure: String,
    pub value: f64,
    pub magnitude: EffectMagnitude,
}

impl EffectSize {
    pub fn cohens_d(value: f64) -> Self {
        Self {
            measure: "cohens_d".to_string(),
            value,
            magnitude: EffectMagnitude::from_cohens_d(value),
        }
    }

    pub fn cramers_v(value: f64) -> Self {
        Self {
            measure: "cramers_v".to_string(),
            value,
            magnitude: EffectMagnitude::from_cramers_v(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub test: String,
    pub statistic: f64,
    pub p_value: f64,
    pub significant: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degrees_of_freedom: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeveneResult {
    pub statistic: f64,
    pub p_value: f64,
    pub equal_variance: bool,
}

/// Per-outcome-group summary of a numeric feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub label: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
}

/// Feature value by outcome label counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContingencyTable {
    /// Feature values in first-seen order.
    pub row_labels: Vec<String>,
    /// Outcome labels.
    pub column_labels: Vec<String>,
    pub counts: Vec<Vec<usize>>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BivariateDetail {
    Numeric {
        groups: Vec<GroupStats>,
        t_test: Computation<TestResult>,
        mann_whitney: Computation<TestResult>,
        levene: Computation<LeveneResult>,
        effect_size: Computation<EffectSize>,
    },
    Categorical {
        contingency: ContingencyTable,
        chi_square: Computation<TestResult>,
        effect_size: EffectSize,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BivariateResult {
    pub feature: String,
    pub detail: BivariateDetail,
}

// ============================================================================
// Multivariate
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub column_a: String,
    pub column_b: String,
    pub correlation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcaSummary {
    pub explained_variance_ratio: Vec<f64>,
    pub cumulative_variance: Vec<f64>,
    pub variance_target: f64,
    /// Smallest component count reaching `variance_target` (1-indexed).
    pub components_needed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultivariateResult {
    pub columns: Vec<String>,
    pub correlation_matrix: Vec<Vec<Option<f64>>>,
    pub high_correlations: Vec<CorrelationPair>,
    /// Present only when more than two numeric columns exist.
    pub pca: Option<Computation<PcaSummary>>,
}

// ============================================================================
// Report
// ============================================================================

/// Aggregate result of one profiling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub overview: Overview,
    pub features: Vec<FeatureProfile>,
    /// Empty when the dataset has no outcome column.
    pub bivariate: Vec<BivariateResult>,
    pub multivariate: MultivariateResult,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

impl Report {
    pub fn feature(&self, name: &str) -> Option<&FeatureProfile> {
        self.features.iter().find(|f| f.name == name)
    }

    pub fn bivariate_for(&self, name: &str) -> Option<&BivariateResult> {
        self.bivariate.iter().find(|b| b.feature == name)
    }
}
