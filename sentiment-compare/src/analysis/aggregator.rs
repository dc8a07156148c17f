//! Corpus-level accumulation of per-document scores

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::scoring::ScoreEntry;
use crate::corpus::Label;

/// Running counters for one backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendTally {
    pub hits: u64,
    pub weighted_errors: u64,
    /// Documents the backend failed on; never part of any ratio
    pub skipped: u64,
}

impl BackendTally {
    fn add(&mut self, entry: ScoreEntry) {
        match entry {
            ScoreEntry::Hit => self.hits += 1,
            ScoreEntry::Error { weight } => self.weighted_errors += u64::from(weight),
            ScoreEntry::Skip => self.skipped += 1,
        }
    }
}

/// Per-backend counters for one corpus run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateTally {
    backends: IndexMap<String, BackendTally>,
}

impl AggregateTally {
    pub fn get(&self, backend: &str) -> Option<&BackendTally> {
        self.backends.get(backend)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BackendTally)> {
        self.backends.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Errors raised when deriving final ratios
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    #[error("Cannot compute scores: the corpus has no evaluable documents")]
    EmptyCorpus,
}

/// Final scores for one backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendScore {
    pub backend: String,
    pub hits: u64,
    pub weighted_errors: u64,
    pub skipped: u64,
    /// hits / total documents
    pub accuracy: f64,
    /// weighted errors / corpus-wide maximum weighted errors
    pub error_rate: f64,
}

/// Per-backend accuracy and error rate over a whole corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub total_documents: usize,
    pub max_weighted_errors: u64,
    /// In registry order
    pub scores: Vec<BackendScore>,
}

impl EvaluationReport {
    pub fn get(&self, backend: &str) -> Option<&BackendScore> {
        self.scores.iter().find(|s| s.backend == backend)
    }

    /// Highest accuracy first
    pub fn ranked_by_accuracy(&self) -> Vec<&BackendScore> {
        let mut ranked: Vec<&BackendScore> = self.scores.iter().collect();
        ranked.sort_by(|a, b| {
            b.accuracy
                .partial_cmp(&a.accuracy)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }

    /// Lowest error rate first
    pub fn ranked_by_error_rate(&self) -> Vec<&BackendScore> {
        let mut ranked: Vec<&BackendScore> = self.scores.iter().collect();
        ranked.sort_by(|a, b| {
            a.error_rate
                .partial_cmp(&b.error_rate)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }
}

/// Worst-case weighted errors for a corpus: every document missed with the
/// maximum severity its gold label allows
pub fn max_weighted_errors(gold_labels: &[Label]) -> u64 {
    gold_labels
        .iter()
        .map(|label| u64::from(label.max_error_weight()))
        .sum()
}

/// Accumulates score entries document by document.
///
/// Sums only, so documents may arrive in any order.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    tally: AggregateTally,
    documents_seen: usize,
}

impl Aggregator {
    /// Start a fresh tally with a zeroed row for every backend
    pub fn new<I, S>(backends: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let backends = backends
            .into_iter()
            .map(|name| (name.into(), BackendTally::default()))
            .collect();
        Self {
            tally: AggregateTally { backends },
            documents_seen: 0,
        }
    }

    /// Add one document's entries to the running totals.
    ///
    /// Entries for backends this aggregator was not created with are dropped.
    pub fn accumulate(&mut self, document_id: usize, entries: &IndexMap<String, ScoreEntry>) {
        for (backend, entry) in entries {
            match self.tally.backends.get_mut(backend) {
                Some(tally) => tally.add(*entry),
                None => tracing::warn!(
                    document_id,
                    backend = %backend,
                    "Ignoring score for unregistered backend"
                ),
            }
        }
        self.documents_seen += 1;
        tracing::trace!(document_id, "Accumulated {} score entries", entries.len());
    }

    pub fn tally(&self) -> &AggregateTally {
        &self.tally
    }

    pub fn documents_seen(&self) -> usize {
        self.documents_seen
    }

    /// Derive final ratios.
    ///
    /// `total_documents` is the accuracy denominator and `gold_labels` the
    /// evaluable corpus; both are shared by every backend.
    pub fn finalize(
        self,
        total_documents: usize,
        gold_labels: &[Label],
    ) -> Result<EvaluationReport, AggregateError> {
        let max_errors = max_weighted_errors(gold_labels);
        if total_documents == 0 || max_errors == 0 {
            return Err(AggregateError::EmptyCorpus);
        }

        let scores = self
            .tally
            .backends
            .into_iter()
            .map(|(backend, t)| BackendScore {
                backend,
                hits: t.hits,
                weighted_errors: t.weighted_errors,
                skipped: t.skipped,
                accuracy: t.hits as f64 / total_documents as f64,
                error_rate: t.weighted_errors as f64 / max_errors as f64,
            })
            .collect();

        Ok(EvaluationReport {
            total_documents,
            max_weighted_errors: max_errors,
            scores,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(items: &[(&str, ScoreEntry)]) -> IndexMap<String, ScoreEntry> {
        items.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_max_weighted_errors() {
        assert_eq!(max_weighted_errors(&[Label::Neutral, Label::Positive]), 3);
        assert_eq!(max_weighted_errors(&[Label::Negative, Label::Positive]), 4);
        assert_eq!(max_weighted_errors(&[]), 0);
    }

    #[test]
    fn test_accumulate_and_finalize() {
        let mut agg = Aggregator::new(["one", "two"]);
        agg.accumulate(0, &entries(&[("one", ScoreEntry::Hit), ("two", ScoreEntry::Error { weight: 2 })]));
        agg.accumulate(1, &entries(&[("one", ScoreEntry::Error { weight: 1 }), ("two", ScoreEntry::Skip)]));
        assert_eq!(agg.documents_seen(), 2);

        let report = agg.finalize(2, &[Label::Positive, Label::Neutral]).unwrap();
        assert_eq!(report.max_weighted_errors, 3);

        let one = report.get("one").unwrap();
        assert_eq!(one.hits, 1);
        assert_eq!(one.accuracy, 0.5);
        assert!((one.error_rate - 1.0 / 3.0).abs() < 1e-12);

        let two = report.get("two").unwrap();
        assert_eq!(two.hits, 0);
        assert_eq!(two.skipped, 1);
        assert!((two.error_rate - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_always_failing_backend_scores_zero() {
        let mut agg = Aggregator::new(["down"]);
        agg.accumulate(0, &entries(&[("down", ScoreEntry::Skip)]));
        agg.accumulate(1, &entries(&[("down", ScoreEntry::Skip)]));

        let report = agg.finalize(2, &[Label::Positive, Label::Negative]).unwrap();
        let down = report.get("down").unwrap();
        assert_eq!(down.accuracy, 0.0);
        assert_eq!(down.error_rate, 0.0);
        assert_eq!(down.skipped, 2);
    }

    #[test]
    fn test_registered_backend_without_entries_is_reported() {
        let report = Aggregator::new(["idle"]).finalize(1, &[Label::Neutral]).unwrap();
        assert_eq!(report.scores.len(), 1);
        assert_eq!(report.scores[0].accuracy, 0.0);
    }

    #[test]
    fn test_unregistered_backend_is_ignored() {
        let mut agg = Aggregator::new(["known"]);
        agg.accumulate(0, &entries(&[("known", ScoreEntry::Hit), ("stray", ScoreEntry::Hit)]));

        assert!(agg.tally().get("stray").is_none());
        let report = agg.finalize(1, &[Label::Positive]).unwrap();
        assert_eq!(report.scores.len(), 1);
        assert_eq!(report.get("known").unwrap().hits, 1);
    }

    #[test]
    fn test_empty_corpus_is_an_error() {
        let err = Aggregator::new(["a"]).finalize(0, &[]).unwrap_err();
        assert_eq!(err, AggregateError::EmptyCorpus);
    }

    #[test]
    fn test_order_independent() {
        let docs = vec![
            entries(&[("a", ScoreEntry::Hit), ("b", ScoreEntry::Error { weight: 1 })]),
            entries(&[("a", ScoreEntry::Error { weight: 2 }), ("b", ScoreEntry::Skip)]),
            entries(&[("b", ScoreEntry::Hit), ("a", ScoreEntry::Skip)]),
        ];

        let mut forward = Aggregator::new(["a", "b"]);
        for (i, d) in docs.iter().enumerate() {
            forward.accumulate(i, d);
        }

        let mut backward = Aggregator::new(["a", "b"]);
        for (i, d) in docs.iter().enumerate().rev() {
            backward.accumulate(i, d);
        }

        assert_eq!(forward.tally(), backward.tally());
    }

    #[test]
    fn test_rankings() {
        let mut agg = Aggregator::new(["low", "high"]);
        agg.accumulate(0, &entries(&[("low", ScoreEntry::Error { weight: 2 }), ("high", ScoreEntry::Hit)]));
        let report = agg.finalize(1, &[Label::Positive]).unwrap();

        assert_eq!(report.ranked_by_accuracy()[0].backend, "high");
        assert_eq!(report.ranked_by_error_rate()[0].backend, "high");
    }
}
