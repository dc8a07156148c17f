//! Evaluation execution engine

pub mod dispatcher;
pub mod evaluator;
pub mod rate_limiter;

pub use dispatcher::{DispatchResult, Dispatcher, Outcome, ERROR_MARKER};
pub use evaluator::{ConsoleProgress, EvaluationError, Evaluator, NoOpProgress, ProgressCallback};
pub use rate_limiter::RateLimiter;
