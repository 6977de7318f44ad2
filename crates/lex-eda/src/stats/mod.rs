//! Statistical primitives used by the profiler stages.
//!
//! Every routine takes already-filtered observations: callers drop missing
//! values before calling in. Degenerate inputs are reported through
//! [`StatsError`], which the profiler turns into a `not_computable` marker.

pub mod correlation;
pub mod descriptive;
pub mod hypothesis;
pub mod pca;

pub use correlation::{correlation_matrix, pearson_pairwise};
pub use descriptive::{
    kurtosis, mean, median, mode, quantile_sorted, skewness, sorted, std_dev, variance,
};
pub use hypothesis::{
    TestOutcome, chi_square_independence, levene_median, mann_whitney_u, normality_k2,
    student_t_test,
};
pub use pca::{ExplainedVariance, explained_variance};

use thiserror::Error;

/// Reasons a statistic cannot be computed for the given observations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// Fewer observations than the routine needs.
    #[error("insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// All observations are identical so a ratio is undefined.
    #[error("zero variance")]
    ZeroVariance,

    /// One of the compared groups has no observations.
    #[error("group '{0}' has no observations")]
    EmptyGroup(String),

    /// Contingency table lacks a second row or column.
    #[error("degenerate contingency table: {rows} x {cols}")]
    DegenerateTable { rows: usize, cols: usize },

    /// A reference distribution could not be built.
    #[error("distribution error: {0}")]
    Distribution(String),

    /// The statistics backend rejected the input.
    #[error("test failed: {0}")]
    TestFailed(String),
}

/// Result type for statistical routines.
pub type StatsResult<T> = std::result::Result<T, StatsError>;
