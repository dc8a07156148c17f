//! Corpus evaluation driver: dispatch, score and accumulate, one document at a time

use std::sync::Arc;

use tracing::Instrument;

use super::dispatcher::Dispatcher;
use crate::analysis::{score_document, AggregateError, Aggregator, EvaluationReport};
use crate::backends::BackendRegistry;
use crate::corpus::{Corpus, Label};
use crate::reporting::{DocumentRow, ReportError, RowSink};

/// Errors that abort an evaluation run
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error("Failed to write results: {0}")]
    Report(#[from] ReportError),
}

/// Runs a corpus through every backend and scores the results.
///
/// Documents are processed sequentially in ascending id order; each
/// document's backends run concurrently.
pub struct Evaluator {
    dispatcher: Dispatcher,
    progress: Arc<dyn ProgressCallback>,
}

impl Evaluator {
    pub fn new(registry: BackendRegistry) -> Self {
        Self {
            dispatcher: Dispatcher::new(registry),
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Report progress through `progress`
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    pub fn backend_names(&self) -> Vec<String> {
        self.dispatcher.registry().names()
    }

    /// Evaluate every evaluable document, streaming one row per document to `sink`
    pub async fn evaluate(
        &self,
        corpus: &Corpus,
        sink: &mut dyn RowSink,
    ) -> Result<EvaluationReport, EvaluationError> {
        let documents = corpus.evaluable();
        if documents.is_empty() {
            return Err(AggregateError::EmptyCorpus.into());
        }

        let total = documents.len();
        let mut aggregator = Aggregator::new(self.backend_names());

        for (index, doc) in documents.iter().enumerate() {
            self.progress.on_document_start(doc.id);

            let span = tracing::info_span!("document", id = doc.id);
            let result = self.dispatcher.dispatch(doc.text).instrument(span).await;

            let entries = score_document(&result, doc.gold);
            aggregator.accumulate(doc.id, &entries);
            sink.write_row(&DocumentRow::from_dispatch(doc.id, doc.text, doc.gold, &result))?;

            self.progress.on_document_complete(doc.id, result.failures());
            self.progress.on_progress(index + 1, total);
        }

        let gold_labels: Vec<Label> = documents.iter().map(|d| d.gold).collect();
        let report = aggregator.finalize(total, &gold_labels)?;

        tracing::info!(
            "Evaluated {} documents across {} backends",
            report.total_documents,
            report.scores.len()
        );
        Ok(report)
    }
}

/// Progress callback for tracking evaluation
pub trait ProgressCallback: Send + Sync {
    fn on_document_start(&self, document_id: usize);
    fn on_document_complete(&self, document_id: usize, failures: usize);
    fn on_progress(&self, completed: usize, total: usize);
}

/// Default no-op progress callback
pub struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_document_start(&self, _document_id: usize) {}
    fn on_document_complete(&self, _document_id: usize, _failures: usize) {}
    fn on_progress(&self, _completed: usize, _total: usize) {}
}

/// Console progress callback
pub struct ConsoleProgress;

impl ProgressCallback for ConsoleProgress {
    fn on_document_start(&self, _document_id: usize) {}

    fn on_document_complete(&self, document_id: usize, failures: usize) {
        if failures > 0 {
            println!("  Document {}: {} backend(s) failed", document_id, failures);
        }
    }

    fn on_progress(&self, completed: usize, total: usize) {
        if completed == total || completed % 10 == 0 {
            println!("Progress: {}/{} documents complete", completed, total);
        }
    }
}
