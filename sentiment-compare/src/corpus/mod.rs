//! Gold-standard corpus definitions and loading

pub mod label;
pub mod loader;

pub use label::Label;
pub use loader::{load_corpus_from_file, load_corpus_from_string, CorpusError};

use serde::{Deserialize, Serialize};

/// A single corpus document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: usize,
    pub text: String,
    /// Human-assigned reference label; `None` means the document cannot be scored
    pub gold: Option<Label>,
}

impl Document {
    pub fn new(id: usize, text: impl Into<String>, gold: Option<Label>) -> Self {
        Self {
            id,
            text: text.into(),
            gold,
        }
    }

    pub fn labeled(id: usize, text: impl Into<String>, gold: Label) -> Self {
        Self::new(id, text, Some(gold))
    }

    pub fn is_evaluable(&self) -> bool {
        self.gold.is_some()
    }
}

/// An evaluable document: one that carries a gold label
#[derive(Debug, Clone, Copy)]
pub struct EvaluableDocument<'a> {
    pub id: usize,
    pub text: &'a str,
    pub gold: Label,
}

/// Ordered document collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents that can be scored, in ascending id order
    pub fn evaluable(&self) -> Vec<EvaluableDocument<'_>> {
        let mut docs: Vec<EvaluableDocument<'_>> = self
            .documents
            .iter()
            .filter_map(|d| {
                d.gold.map(|gold| EvaluableDocument {
                    id: d.id,
                    text: d.text.as_str(),
                    gold,
                })
            })
            .collect();
        docs.sort_by_key(|d| d.id);
        docs
    }

    /// Gold labels of every evaluable document
    pub fn gold_labels(&self) -> Vec<Label> {
        self.documents.iter().filter_map(|d| d.gold).collect()
    }

    /// Count of evaluable documents per gold label
    pub fn label_distribution(&self) -> Vec<(Label, usize)> {
        Label::all()
            .into_iter()
            .map(|label| {
                let count = self
                    .documents
                    .iter()
                    .filter(|d| d.gold == Some(label))
                    .count();
                (label, count)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluable_sorted_and_filtered() {
        let corpus = Corpus::new(vec![
            Document::labeled(2, "c", Label::Neutral),
            Document::new(1, "b", None),
            Document::labeled(0, "a", Label::Positive),
        ]);

        let evaluable = corpus.evaluable();
        let ids: Vec<usize> = evaluable.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![0, 2]);
        assert_eq!(corpus.gold_labels().len(), 2);
    }

    #[test]
    fn test_label_distribution() {
        let corpus = Corpus::new(vec![
            Document::labeled(0, "a", Label::Positive),
            Document::labeled(1, "b", Label::Positive),
            Document::labeled(2, "c", Label::Negative),
        ]);

        let dist = corpus.label_distribution();
        assert_eq!(dist[0], (Label::Positive, 2));
        assert_eq!(dist[1], (Label::Negative, 1));
        assert_eq!(dist[2], (Label::Neutral, 0));
    }
}
