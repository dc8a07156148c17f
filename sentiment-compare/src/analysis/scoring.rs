//! Weighted scoring of backend outcomes against the gold label
//!
//! A wrong answer that confuses a polar label with neutral costs 1; an
//! inverted polarity (positive vs negative) costs 2. A backend that could
//! not answer is skipped: neither rewarded nor penalised.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::corpus::Label;
use crate::runner::{DispatchResult, Outcome};

/// Per-backend, per-document scoring outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreEntry {
    Hit,
    Error { weight: u32 },
    Skip,
}

impl ScoreEntry {
    pub fn is_hit(&self) -> bool {
        matches!(self, ScoreEntry::Hit)
    }

    /// Weighted error contributed by this entry
    pub fn weight(&self) -> u32 {
        match self {
            ScoreEntry::Error { weight } => *weight,
            ScoreEntry::Hit | ScoreEntry::Skip => 0,
        }
    }
}

/// Severity of predicting `predicted` when `gold` was expected.
///
/// Only meaningful for a mismatch.
pub fn error_weight(predicted: Label, gold: Label) -> u32 {
    if gold == Label::Neutral || predicted == Label::Neutral {
        1
    } else {
        2
    }
}

/// Score one outcome against the gold label
pub fn score(outcome: &Outcome, gold: Label) -> ScoreEntry {
    match outcome {
        Outcome::Failure(_) => ScoreEntry::Skip,
        Outcome::Label(label) if *label == gold => ScoreEntry::Hit,
        Outcome::Label(label) => ScoreEntry::Error {
            weight: error_weight(*label, gold),
        },
    }
}

/// Score every backend's outcome for one document
pub fn score_document(result: &DispatchResult, gold: Label) -> IndexMap<String, ScoreEntry> {
    result
        .iter()
        .map(|(backend, outcome)| (backend.to_string(), score(outcome, gold)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_is_hit() {
        for label in Label::all() {
            assert_eq!(score(&Outcome::Label(label), label), ScoreEntry::Hit);
        }
    }

    #[test]
    fn test_inverted_polarity_weighs_two() {
        assert_eq!(
            score(&Outcome::Label(Label::Negative), Label::Positive),
            ScoreEntry::Error { weight: 2 }
        );
        assert_eq!(
            score(&Outcome::Label(Label::Positive), Label::Negative),
            ScoreEntry::Error { weight: 2 }
        );
    }

    #[test]
    fn test_neutral_confusion_weighs_one() {
        assert_eq!(
            score(&Outcome::Label(Label::Positive), Label::Neutral),
            ScoreEntry::Error { weight: 1 }
        );
        assert_eq!(
            score(&Outcome::Label(Label::Neutral), Label::Negative),
            ScoreEntry::Error { weight: 1 }
        );
    }

    #[test]
    fn test_failure_is_skip() {
        let entry = score(&Outcome::Failure("timeout".to_string()), Label::Positive);
        assert_eq!(entry, ScoreEntry::Skip);
        assert_eq!(entry.weight(), 0);
        assert!(!entry.is_hit());
    }

    #[test]
    fn test_error_weight_never_exceeds_gold_max() {
        for gold in Label::all() {
            for predicted in Label::all() {
                let entry = score(&Outcome::Label(predicted), gold);
                assert!(entry.weight() <= gold.max_error_weight());
            }
        }
    }

    #[test]
    fn test_score_document() {
        let result: DispatchResult = vec![
            ("one".to_string(), Outcome::Label(Label::Positive)),
            ("two".to_string(), Outcome::Label(Label::Negative)),
            ("three".to_string(), Outcome::Label(Label::Neutral)),
            ("four".to_string(), Outcome::Failure("down".to_string())),
        ]
        .into_iter()
        .collect();

        let entries = score_document(&result, Label::Positive);
        assert_eq!(entries["one"], ScoreEntry::Hit);
        assert_eq!(entries["two"], ScoreEntry::Error { weight: 2 });
        assert_eq!(entries["three"], ScoreEntry::Error { weight: 1 });
        assert_eq!(entries["four"], ScoreEntry::Skip);
    }
}
