//! Tab-separated per-document results table

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{DocumentRow, ReportError, RowSink};

/// Streams result rows to a tab-separated file.
///
/// Columns: document id, text, gold standard, then one column per backend.
pub struct TsvWriter<W: Write> {
    out: W,
    backends: Vec<String>,
}

impl TsvWriter<BufWriter<File>> {
    /// Create `path` and write the header row
    pub fn create(path: impl AsRef<Path>, backends: &[String]) -> Result<Self, ReportError> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), backends)
    }
}

impl<W: Write> TsvWriter<W> {
    pub fn new(mut out: W, backends: &[String]) -> Result<Self, ReportError> {
        let mut header = vec!["doc_id".to_string(), "text".to_string(), "gold standard".to_string()];
        header.extend(backends.iter().cloned());
        writeln!(out, "{}", header.join("\t"))?;

        Ok(Self {
            out,
            backends: backends.to_vec(),
        })
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(mut self) -> Result<W, ReportError> {
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> RowSink for TsvWriter<W> {
    fn write_row(&mut self, row: &DocumentRow) -> Result<(), ReportError> {
        let mut fields = vec![
            row.document_id.to_string(),
            escape(&row.text),
            row.gold.to_string(),
        ];
        for backend in &self.backends {
            let value = row.outputs.get(backend).map(String::as_str).unwrap_or("");
            fields.push(value.to_string());
        }
        writeln!(self.out, "{}", fields.join("\t"))?;
        self.out.flush()?;
        Ok(())
    }
}

/// Keep one row per line: tabs and newlines inside text become spaces
fn escape(text: &str) -> String {
    text.replace(['\t', '\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Label;
    use indexmap::IndexMap;

    fn row(id: usize, text: &str, outputs: &[(&str, &str)]) -> DocumentRow {
        DocumentRow {
            document_id: id,
            text: text.to_string(),
            gold: Label::Positive,
            outputs: outputs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<IndexMap<_, _>>(),
        }
    }

    #[test]
    fn test_header_and_rows() {
        let backends = vec!["one".to_string(), "two".to_string()];
        let mut writer = TsvWriter::new(Vec::new(), &backends).unwrap();

        writer.write_row(&row(0, "Nice\tday", &[("one", "+"), ("two", "Error")])).unwrap();

        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "doc_id\ttext\tgold standard\tone\ttwo");
        assert_eq!(lines[1], "0\tNice day\t+\t+\tError");
    }

    #[test]
    fn test_columns_follow_registry_order() {
        let backends = vec!["b".to_string(), "a".to_string()];
        let mut writer = TsvWriter::new(Vec::new(), &backends).unwrap();

        writer.write_row(&row(3, "text", &[("a", "-"), ("b", "0")])).unwrap();

        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(out.lines().nth(1), Some("3\ttext\t+\t0\t-"));
    }

    #[test]
    fn test_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.tsv");
        let backends = vec!["one".to_string()];

        let mut writer = TsvWriter::create(&path, &backends).unwrap();
        writer.write_row(&row(0, "text", &[("one", "+")])).unwrap();
        drop(writer);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
