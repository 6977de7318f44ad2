//! Dataset overview and outcome resolution.

use crate::config::ProfilerConfig;
use crate::dataset::{Column, ColumnData, ColumnKind, Dataset};
use crate::error::{EdaError, Result};
use crate::types::{ClassCount, ColumnSummary, OutcomeSummary, Overview};
use crate::utils::{format_label, percentage};
use tracing::debug;

/// The binary outcome column with every row assigned to a group.
#[derive(Debug, Clone)]
pub struct Outcome<'a> {
    pub column: &'a Column,
    /// Both labels in ascending order.
    pub labels: [String; 2],
    /// Group index per row, `None` where the outcome is missing.
    pub groups: Vec<Option<usize>>,
}

impl Outcome<'_> {
    pub fn name(&self) -> &str {
        self.column.name()
    }

    /// Rows per group.
    pub fn counts(&self) -> [usize; 2] {
        let mut counts = [0, 0];
        for g in self.groups.iter().flatten() {
            counts[*g] += 1;
        }
        counts
    }
}

/// Find the outcome column and check that it is binary.
///
/// Without an explicit name the conventional `target` column is used when
/// present; its absence just disables the outcome-dependent stages. An
/// explicit name that is absent is an input error.
pub fn resolve_outcome<'a>(
    dataset: &'a Dataset,
    config: &ProfilerConfig,
) -> Result<Option<Outcome<'a>>> {
    if !config.analyze_outcome {
        debug!("Outcome analysis disabled");
        return Ok(None);
    }

    let (name, explicit) = config.outcome_name();
    let column = match dataset.column(name) {
        Some(column) => column,
        None if explicit => return Err(EdaError::ColumnNotFound(name.to_string())),
        None => {
            debug!("No '{}' column, skipping outcome analysis", name);
            return Ok(None);
        }
    };

    let labels = distinct_labels(column.data());
    if labels.len() != 2 {
        return Err(EdaError::OutcomeNotBinary {
            column: name.to_string(),
            distinct: labels.len(),
        });
    }
    let labels = [labels[0].clone(), labels[1].clone()];

    let groups = (0..column.len())
        .map(|row| {
            column
                .label_at(row)
                .map(|label| usize::from(label == labels[1]))
        })
        .collect();

    Ok(Some(Outcome {
        column,
        labels,
        groups,
    }))
}

/// Distinct non-missing labels, numeric ascending or lexicographic.
fn distinct_labels(data: &ColumnData) -> Vec<String> {
    match data {
        ColumnData::Numeric(values) => {
            let mut distinct: Vec<f64> = values.iter().flatten().copied().collect();
            distinct.sort_by(f64::total_cmp);
            distinct.dedup();
            distinct.into_iter().map(format_label).collect()
        }
        ColumnData::Categorical(values) => {
            let mut distinct: Vec<String> = values.iter().flatten().cloned().collect();
            distinct.sort();
            distinct.dedup();
            distinct
        }
    }
}

/// Shape, completeness and class balance of the dataset.
pub fn build_overview(
    dataset: &Dataset,
    outcome: Option<&Outcome<'_>>,
    config: &ProfilerConfig,
) -> Overview {
    let rows = dataset.n_rows();
    let columns = dataset.columns();

    let column_kinds: Vec<ColumnSummary> = columns
        .iter()
        .map(|c| ColumnSummary {
            name: c.name().to_string(),
            kind: c.kind(),
        })
        .collect();
    let numeric_columns = column_kinds
        .iter()
        .filter(|c| c.kind == ColumnKind::Numeric)
        .count();

    let complete_rows = (0..rows)
        .filter(|&row| columns.iter().all(|c| !c.is_missing(row)))
        .count();
    let columns_with_missing = columns
        .iter()
        .filter(|c| c.missing_count() > 0)
        .map(|c| c.name().to_string())
        .collect();
    let total_missing: usize = columns.iter().map(Column::missing_count).sum();

    Overview {
        rows,
        columns: columns.len(),
        numeric_columns,
        categorical_columns: columns.len() - numeric_columns,
        column_kinds,
        complete_rows,
        complete_percentage: percentage(complete_rows, rows),
        columns_with_missing,
        total_missing,
        total_missing_percentage: percentage(total_missing, rows * columns.len()),
        outcome: outcome.map(|o| outcome_summary(o, config)),
    }
}

fn outcome_summary(outcome: &Outcome<'_>, config: &ProfilerConfig) -> OutcomeSummary {
    let counts = outcome.counts();
    let observed = counts[0] + counts[1];

    let classes: Vec<ClassCount> = outcome
        .labels
        .iter()
        .zip(counts)
        .map(|(label, count)| ClassCount {
            label: label.clone(),
            count,
            percentage: percentage(count, observed),
        })
        .collect();

    let minority = usize::from(counts[1] < counts[0]);
    let minority_percentage = classes[minority].percentage;

    OutcomeSummary {
        column: outcome.name().to_string(),
        missing: outcome.groups.len() - observed,
        minority_label: classes[minority].label.clone(),
        minority_percentage,
        is_imbalanced: minority_percentage < config.imbalance_threshold_pct,
        classes,
    }
}
