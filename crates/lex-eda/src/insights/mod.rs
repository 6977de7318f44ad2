//! Rule-based insights and recommendations.
//!
//! Nothing here computes new statistics. The rules read the overview and the
//! per-column profiles and turn threshold crossings into sentences.

use crate::config::ProfilerConfig;
use crate::dataset::ColumnKind;
use crate::types::{FeatureProfile, NumericProfile, Overview};

/// Numeric profiles in dataset order, `None` for numeric columns that failed.
fn numeric_profiles<'a>(
    overview: &'a Overview,
    features: &'a [FeatureProfile],
) -> impl Iterator<Item = (&'a str, Option<&'a NumericProfile>)> {
    overview
        .column_kinds
        .iter()
        .zip(features)
        .filter(|(summary, _)| summary.kind == ColumnKind::Numeric)
        .map(|(summary, feature)| (summary.name.as_str(), feature.numeric()))
}

/// Format an integer with comma thousands separators.
fn with_separators(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Observations about the dataset, in a fixed order.
pub fn generate_insights(
    overview: &Overview,
    features: &[FeatureProfile],
    config: &ProfilerConfig,
) -> Vec<String> {
    let mut insights = vec![format!(
        "Dataset contains {} rows with {} features",
        with_separators(overview.rows),
        overview.columns
    )];

    if overview.total_missing > 0 {
        insights.push(format!(
            "Found {} missing values across the dataset",
            overview.total_missing
        ));
    }

    if let Some(outcome) = &overview.outcome
        && outcome.is_imbalanced
    {
        insights.push(format!(
            "Imbalanced dataset: minority class is only {:.1}%",
            outcome.minority_percentage
        ));
    }

    for (name, profile) in numeric_profiles(overview, features).take(config.skew_insight_columns) {
        if let Some(skew) = profile.and_then(|p| p.skewness)
            && skew.abs() > config.skew_threshold
        {
            insights.push(format!(
                "{} is highly skewed ({:.2}) - consider transformation",
                name, skew
            ));
        }
    }

    insights
}

/// Suggested preprocessing steps.
///
/// Missing-value items come first, then outliers, then scaling, then class
/// imbalance. The list is cut to `max_recommendations`.
pub fn generate_recommendations(
    overview: &Overview,
    features: &[FeatureProfile],
    config: &ProfilerConfig,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    for feature in features {
        if feature.missing_percentage > config.missing_recommendation_pct {
            recommendations.push(format!(
                "Handle missing values in {} ({:.1}% missing)",
                feature.name, feature.missing_percentage
            ));
        }
    }

    for (name, profile) in numeric_profiles(overview, features) {
        if let Some(outliers) = profile.map(|p| &p.outliers)
            && outliers.count > 0
            && outliers.percentage > config.outlier_recommendation_pct
        {
            recommendations.push(format!(
                "Consider capping outliers in {} ({:.1}% outliers)",
                name, outliers.percentage
            ));
        }
    }

    for (name, profile) in numeric_profiles(overview, features) {
        if let Some(std) = profile.and_then(|p| p.std)
            && std > config.scaling_std_threshold
        {
            recommendations.push(format!("Scale {} due to large magnitude differences", name));
        }
    }

    if overview.outcome.as_ref().is_some_and(|o| o.is_imbalanced) {
        recommendations.push("Apply SMOTE or class weights to handle imbalance".to_string());
    }

    recommendations.truncate(config.max_recommendations);
    recommendations
}
