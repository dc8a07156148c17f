//! Corpus loading from tab-separated annotated text files
//!
//! One document per line: `text<TAB>label`. Labels are `+`, `-`, `0`
//! (or their long forms). `X` marks a document as irrelevant; a line with
//! no tab is kept as an unlabeled document.

use std::path::Path;

use super::{Corpus, Document, Label};

/// Marker for documents excluded from the evaluation
const IRRELEVANT_MARKER: &str = "X";

/// Error type for corpus loading
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: unrecognised gold label '{label}'")]
    InvalidLabel { line: usize, label: String },

    #[error("Line {line}: labeled document has no text")]
    EmptyText { line: usize },

    #[error("Corpus contains no evaluable documents")]
    NoEvaluableDocuments,
}

/// Load a corpus from an annotated text file
pub fn load_corpus_from_file(path: impl AsRef<Path>) -> Result<Corpus, CorpusError> {
    let content = std::fs::read_to_string(path)?;
    load_corpus_from_string(&content)
}

/// Load a corpus from annotated text
pub fn load_corpus_from_string(content: &str) -> Result<Corpus, CorpusError> {
    let mut documents = Vec::new();
    let mut next_id = 0;

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }

        // the label is the last field; text may itself contain tabs
        let document = match raw.rsplit_once('\t') {
            Some((text, key)) if !key.trim().is_empty() => {
                let text = text.trim();
                let key = key.trim();
                if key == IRRELEVANT_MARKER {
                    tracing::debug!("Line {}: skipping irrelevant document", line_no);
                    continue;
                }
                let gold: Label = key.parse().map_err(|_| CorpusError::InvalidLabel {
                    line: line_no,
                    label: key.to_string(),
                })?;
                if text.is_empty() {
                    return Err(CorpusError::EmptyText { line: line_no });
                }
                Document::labeled(next_id, text, gold)
            }
            _ => {
                tracing::debug!("Line {}: no gold label, document will not be scored", line_no);
                Document::new(next_id, raw.trim(), None)
            }
        };

        documents.push(document);
        next_id += 1;
    }

    let corpus = Corpus::new(documents);
    if corpus.evaluable().is_empty() {
        return Err(CorpusError::NoEvaluableDocuments);
    }

    tracing::info!(
        "Loaded {} documents ({} evaluable)",
        corpus.len(),
        corpus.evaluable().len()
    );
    Ok(corpus)
}
