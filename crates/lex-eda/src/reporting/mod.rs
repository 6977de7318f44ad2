//! Report persistence and rendering.
//!
//! The profiling engine itself performs no I/O. This module wraps a finished
//! [`Report`](crate::types::Report) in a [`ReportEnvelope`] with run metadata,
//! writes it as JSON and renders a plain-text summary for terminals.
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_eda::reporting::{ReportEnvelope, ReportGenerator};
//!
//! let envelope = ReportEnvelope::new("data/heart.csv", report, elapsed);
//!
//! // Print as JSON
//! println!("{}", serde_json::to_string_pretty(&envelope)?);
//!
//! // Or write to file
//! let generator = ReportGenerator::new("outputs");
//! generator.write_report_to_file(&envelope, "heart")?;
//! ```

mod generator;

pub use generator::{ReportEnvelope, ReportGenerator};
