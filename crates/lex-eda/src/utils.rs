//! Shared utilities for the profiling engine.
//!
//! Numeric dtype detection used when a polars frame is turned into a
//! [`Dataset`](crate::dataset::Dataset), plus small numeric formatting helpers
//! shared by the profiler stages and the report renderer.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
///
/// Only integers and floats are profiled as numeric. Booleans, dates and
/// strings are all treated as discrete labels.
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

// =============================================================================
// Numeric Helpers
// =============================================================================

/// Percentage of `part` in `total`, 0 when `total` is 0.
#[inline]
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

/// Turn a possibly non-finite float into an `Option`.
#[inline]
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Render a numeric outcome label.
///
/// Integral values print without a fractional part so a 0/1 outcome reads
/// as `"0"` and `"1"` instead of `"0.0"` and `"1.0"`.
pub fn format_label(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Format an optional float for terminal output.
pub fn format_optional(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "n/a".to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================
