//! Scoring and aggregation of backend outcomes

pub mod aggregator;
pub mod scoring;

pub use aggregator::{
    max_weighted_errors, AggregateError, AggregateTally, Aggregator, BackendScore, BackendTally,
    EvaluationReport,
};
pub use scoring::{error_weight, score, score_document, ScoreEntry};
