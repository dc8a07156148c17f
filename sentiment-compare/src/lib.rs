//! Sentiment Backend Comparison
//!
//! This crate runs a gold-labelled corpus through several sentiment
//! analysis backends and compares how well each one agrees with the gold
//! standard.
//!
//! # Features
//!
//! - Concurrent fan-out of every document to all registered backends
//! - Failure isolation: one backend's error never affects another's result
//! - Severity-weighted scoring (polarity reversals cost twice as much)
//! - Per-backend accuracy and error rate over the whole corpus
//! - Tab-separated per-document results and a JSON summary
//!
//! # Example
//!
//! ```no_run
//! use sentiment_compare::{
//!     backends::create_backends_with_config,
//!     config::Config,
//!     corpus::load_corpus_from_file,
//!     reporting::{print_console_report, TsvWriter},
//!     runner::Evaluator,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None)?;
//!     let registry = create_backends_with_config(&config, None)?;
//!     let corpus = load_corpus_from_file("corpus.tsv")?;
//!
//!     let evaluator = Evaluator::new(registry);
//!     let mut sink = TsvWriter::create("results.tsv", &evaluator.backend_names())?;
//!     let report = evaluator.evaluate(&corpus, &mut sink).await?;
//!
//!     print_console_report(&report);
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod backends;
pub mod config;
pub mod corpus;
pub mod reporting;
pub mod runner;

pub use config::Config;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::analysis::{
        score, score_document, Aggregator, BackendScore, EvaluationReport, ScoreEntry,
    };
    pub use crate::backends::{
        create_backends_with_config, BackendError, BackendRegistry, BackendResult,
        SentimentBackend,
    };
    pub use crate::config::{Config, ConfigError};
    pub use crate::corpus::{load_corpus_from_file, Corpus, Document, Label};
    pub use crate::reporting::{print_console_report, DocumentRow, JsonSummary, RowSink, TsvWriter};
    pub use crate::runner::{DispatchResult, Dispatcher, Evaluator, Outcome};
}
