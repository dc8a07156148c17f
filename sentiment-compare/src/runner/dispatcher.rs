//! Concurrent fan-out of one document to every registered backend

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::backends::BackendRegistry;
use crate::corpus::Label;

/// Marker written in place of a label when a backend could not answer
pub const ERROR_MARKER: &str = "Error";

/// Length of the text excerpt attached to failure logs
const SNIPPET_CHARS: usize = 60;

/// What a single backend produced for a single document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Label(Label),
    Failure(String),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// Report spelling: the label, or the explicit error marker
    pub fn raw_output(&self) -> &str {
        match self {
            Outcome::Label(label) => label.as_str(),
            Outcome::Failure(_) => ERROR_MARKER,
        }
    }
}

/// Outcomes of one dispatch, keyed by backend name in registry order.
///
/// Holds exactly one entry per registered backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchResult {
    outcomes: IndexMap<String, Outcome>,
}

impl DispatchResult {
    pub fn get(&self, backend: &str) -> Option<&Outcome> {
        self.outcomes.get(backend)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Outcome)> {
        self.outcomes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn failures(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_failure()).count()
    }
}

#[cfg(test)]
impl FromIterator<(String, Outcome)> for DispatchResult {
    fn from_iter<I: IntoIterator<Item = (String, Outcome)>>(iter: I) -> Self {
        Self {
            outcomes: iter.into_iter().collect(),
        }
    }
}

/// Runs one classification call per backend in parallel and joins them all
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: BackendRegistry,
}

impl Dispatcher {
    pub fn new(registry: BackendRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Classify `text` with every backend.
    ///
    /// Returns once every backend has answered or failed. A failing or
    /// panicking backend is recorded as [`Outcome::Failure`] and never
    /// affects the others; nothing is retried or cancelled.
    pub async fn dispatch(&self, text: &str) -> DispatchResult {
        let text: Arc<str> = Arc::from(text);
        let span = tracing::Span::current();

        let mut handles = Vec::with_capacity(self.registry.len());
        for backend in self.registry.iter() {
            let backend = backend.clone();
            let text = text.clone();
            let name = backend.name().to_string();

            let handle = tokio::spawn(
                async move { backend.classify(&text).await }.instrument(span.clone()),
            );
            handles.push((name, handle));
        }

        let mut outcomes = IndexMap::with_capacity(handles.len());
        for (name, handle) in handles {
            let outcome = match handle.await {
                Ok(Ok(label)) => {
                    tracing::debug!(backend = %name, label = %label, "Backend answered");
                    Outcome::Label(label)
                }
                Ok(Err(e)) => {
                    tracing::warn!(
                        backend = %name,
                        error = %e,
                        text = %snippet(&text),
                        "Backend call failed"
                    );
                    Outcome::Failure(e.to_string())
                }
                Err(e) => {
                    tracing::error!(
                        backend = %name,
                        error = %e,
                        text = %snippet(&text),
                        "Backend task panicked"
                    );
                    Outcome::Failure(format!("backend task failed: {}", e))
                }
            };

            // registry names are unique, so every slot is written once
            let previous = outcomes.insert(name, outcome);
            debug_assert!(previous.is_none());
        }

        DispatchResult { outcomes }
    }
}

fn snippet(text: &str) -> String {
    if text.chars().count() > SNIPPET_CHARS {
        let head: String = text.chars().take(SNIPPET_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
