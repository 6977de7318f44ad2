use crate::error::Result;
use crate::types::{BivariateDetail, Computation, FeatureDetail, Report};
use crate::utils::format_optional;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

// ============================================================================
// Report Envelope
// ============================================================================

/// A report together with the metadata of the run that produced it.
///
/// This is what the CLI prints with `--json` and writes with `--emit-report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEnvelope {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Outcome column the bivariate section was computed against
    pub outcome_column: Option<String>,
    /// Wall-clock profiling time in milliseconds
    pub duration_ms: u64,
    pub report: Report,
}

impl ReportEnvelope {
    pub fn new(input_file: impl Into<String>, report: Report, duration: Duration) -> Self {
        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.into(),
            outcome_column: report.overview.outcome.as_ref().map(|o| o.column.clone()),
            duration_ms: duration.as_millis() as u64,
            report,
        }
    }
}

// ============================================================================
// Report Generator
// ============================================================================

pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write an envelope to `<output_dir>/<stem>_eda_report.json`.
    ///
    /// The output directory is created when missing.
    pub fn write_report_to_file(&self, envelope: &ReportEnvelope, stem: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self.output_dir.join(format!("{}_eda_report.json", stem));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(envelope)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }

    /// Plain-text summary of a report for terminals.
    pub fn render_summary(envelope: &ReportEnvelope) -> String {
        Summary(envelope).to_string()
    }
}

struct Summary<'a>(&'a ReportEnvelope);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let envelope = self.0;
        let report = &envelope.report;
        let overview = &report.overview;

        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(f, "EXPLORATORY DATA ANALYSIS")?;
        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(f)?;
        writeln!(
            f,
            "Input:  {} ({} rows x {} columns)",
            envelope.input_file, overview.rows, overview.columns
        )?;
        writeln!(
            f,
            "Columns: {} numeric, {} categorical",
            overview.numeric_columns, overview.categorical_columns
        )?;
        writeln!(
            f,
            "Complete rows: {} ({:.1}%)",
            overview.complete_rows, overview.complete_percentage
        )?;
        if let Some(outcome) = &overview.outcome {
            let classes: Vec<String> = outcome
                .classes
                .iter()
                .map(|c| format!("{}={} ({:.1}%)", c.label, c.count, c.percentage))
                .collect();
            writeln!(f, "Outcome: {} [{}]", outcome.column, classes.join(", "))?;
        }
        writeln!(f, "Duration: {}ms", envelope.duration_ms)?;
        writeln!(f)?;

        writeln!(f, "Column Profiles:")?;
        writeln!(
            f,
            "  {:<20} {:<12} {:>10} {:>12} {:>12} {:>10}",
            "Column", "Kind", "Missing %", "Mean", "Std", "Outliers"
        )?;
        writeln!(f, "  {}", "-".repeat(78))?;
        for feature in &report.features {
            let name = truncate_str(&feature.name, 19);
            match &feature.detail {
                FeatureDetail::Numeric(p) => {
                    writeln!(
                        f,
                        "  {:<20} {:<12} {:>10.1} {:>12} {:>12} {:>10}",
                        name,
                        "numeric",
                        feature.missing_percentage,
                        format_optional(p.mean, 2),
                        format_optional(p.std, 2),
                        p.outliers.count
                    )?;
                }
                FeatureDetail::Categorical(p) => {
                    writeln!(
                        f,
                        "  {:<20} {:<12} {:>10.1} {:>12} {:>12} {:>10}",
                        name,
                        "categorical",
                        feature.missing_percentage,
                        format!("{} uniq", p.unique_values),
                        format!("H={:.2}", p.entropy),
                        "-"
                    )?;
                }
                FeatureDetail::Failed { error } => {
                    writeln!(f, "  {:<20} failed: {}", name, error)?;
                }
            }
        }
        writeln!(f)?;

        if !report.bivariate.is_empty() {
            writeln!(f, "Outcome Associations:")?;
            for result in &report.bivariate {
                writeln!(f, "  {}", association_line(&result.feature, &result.detail))?;
            }
            writeln!(f)?;
        }

        if !report.multivariate.high_correlations.is_empty() {
            writeln!(f, "Highly Correlated Pairs:")?;
            for pair in &report.multivariate.high_correlations {
                writeln!(
                    f,
                    "  {} ~ {}: {:.3}",
                    pair.column_a, pair.column_b, pair.correlation
                )?;
            }
            writeln!(f)?;
        }

        if let Some(Computation::Computed(pca)) = &report.multivariate.pca {
            writeln!(
                f,
                "PCA: {} of {} components explain {:.0}% of variance",
                pca.components_needed,
                pca.explained_variance_ratio.len(),
                pca.variance_target * 100.0
            )?;
            writeln!(f)?;
        }

        writeln!(f, "Insights:")?;
        for insight in &report.insights {
            writeln!(f, "  - {}", insight)?;
        }
        writeln!(f)?;

        if !report.recommendations.is_empty() {
            writeln!(f, "Recommendations:")?;
            for (i, rec) in report.recommendations.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, rec)?;
            }
            writeln!(f)?;
        }

        write!(f, "{}", "=".repeat(80))
    }
}

fn association_line(feature: &str, detail: &BivariateDetail) -> String {
    let name = truncate_str(feature, 19);
    match detail {
        BivariateDetail::Numeric {
            t_test,
            effect_size,
            ..
        } => {
            let p = t_test.value().map(|t| t.p_value);
            let effect = match effect_size {
                Computation::Computed(e) => format!("d={:.2} ({})", e.value, e.magnitude.as_str()),
                Computation::NotComputable { .. } => "d=n/a".to_string(),
            };
            format!("{:<20} t-test p={:<10} {}", name, format_optional(p, 4), effect)
        }
        BivariateDetail::Categorical {
            chi_square,
            effect_size,
            ..
        } => {
            let p = chi_square.value().map(|t| t.p_value);
            format!(
                "{:<20} chi2   p={:<10} V={:.2} ({})",
                name,
                format_optional(p, 4),
                effect_size.value,
                effect_size.magnitude.as_str()
            )
        }
        BivariateDetail::Failed { error } => format!("{:<20} failed: {}", name, error),
    }
}

/// Truncate a string to `max_len` characters, marking the cut with `~`.
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}~", kept)
    }
}
