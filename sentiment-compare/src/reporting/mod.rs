//! Results reporting

pub mod tsv_writer;

pub use tsv_writer::TsvWriter;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analysis::EvaluationReport;
use crate::corpus::Label;
use crate::runner::DispatchResult;

/// Error type for report output
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One line of the per-document results table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRow {
    pub document_id: usize,
    pub text: String,
    pub gold: Label,
    /// Backend name to its label, or the error marker, in registry order
    pub outputs: IndexMap<String, String>,
}

impl DocumentRow {
    pub fn from_dispatch(document_id: usize, text: &str, gold: Label, result: &DispatchResult) -> Self {
        Self {
            document_id,
            text: text.to_string(),
            gold,
            outputs: result
                .iter()
                .map(|(backend, outcome)| (backend.to_string(), outcome.raw_output().to_string()))
                .collect(),
        }
    }
}

/// Consumer of per-document rows as the evaluation progresses
pub trait RowSink {
    fn write_row(&mut self, row: &DocumentRow) -> Result<(), ReportError>;
}

impl RowSink for Vec<DocumentRow> {
    fn write_row(&mut self, row: &DocumentRow) -> Result<(), ReportError> {
        self.push(row.clone());
        Ok(())
    }
}

/// JSON summary export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    pub run_id: String,
    pub timestamp: String,
    pub total_documents: usize,
    pub max_weighted_errors: u64,
    pub backends: Vec<BackendSummary>,
    pub detailed_results_file: String,
}

/// Backend entry in the summary, ordered by accuracy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSummary {
    pub backend: String,
    pub accuracy: f64,
    pub error_rate: f64,
    pub hits: u64,
    pub weighted_errors: u64,
    pub skipped: u64,
}

impl JsonSummary {
    /// Create from the final report
    pub fn from_report(
        run_id: impl Into<String>,
        report: &EvaluationReport,
        detailed_file: impl Into<String>,
    ) -> Self {
        let backends = report
            .ranked_by_accuracy()
            .into_iter()
            .map(|s| BackendSummary {
                backend: s.backend.clone(),
                accuracy: s.accuracy,
                error_rate: s.error_rate,
                hits: s.hits,
                weighted_errors: s.weighted_errors,
                skipped: s.skipped,
            })
            .collect();

        Self {
            run_id: run_id.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            total_documents: report.total_documents,
            max_weighted_errors: report.max_weighted_errors,
            backends,
            detailed_results_file: detailed_file.into(),
        }
    }

    /// Write to JSON file
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Render the accuracy and error-rate tables
pub fn format_console_report(report: &EvaluationReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("{:<15}{}\n", "Analyzer", "Accuracy"));
    for score in report.ranked_by_accuracy() {
        out.push_str(&format!("{:<15}{:.3}\n", score.backend, score.accuracy));
    }
    out.push('\n');

    out.push_str(&format!("{:<15}{}\n", "Analyzer", "Error rate"));
    for score in report.ranked_by_error_rate() {
        out.push_str(&format!("{:<15}{:.3}\n", score.backend, score.error_rate));
    }

    let failing: Vec<_> = report.scores.iter().filter(|s| s.skipped > 0).collect();
    if !failing.is_empty() {
        out.push('\n');
        out.push_str(&format!("{:<15}{}\n", "Analyzer", "Failed calls"));
        for score in failing {
            out.push_str(&format!(
                "{:<15}{}/{}\n",
                score.backend, score.skipped, report.total_documents
            ));
        }
    }

    out
}

/// Generate a console report
pub fn print_console_report(report: &EvaluationReport) {
    println!("\n=== Sentiment Comparison Results ===\n");
    println!(
        "Documents: {}  (max weighted errors: {})\n",
        report.total_documents, report.max_weighted_errors
    );
    print!("{}", format_console_report(report));
    println!("\n{:=<50}", "");
}
