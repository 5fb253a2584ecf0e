use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::download::DownloadedPdf;
use super::ExtractionError;
use crate::pipeline_config::ID_PLACEHOLDER;

/// Opaque identifier of a source document (an arXiv id such as `2602.01234`
/// or `hep-th/9901001`). Used to build the PDF and HTML retrieval URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentRef(String);

impl DocumentRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fill a URL template with this reference.
    pub fn url_from(&self, template: &str) -> String {
        template.replace(ID_PLACEHOLDER, &self.0)
    }

    /// File name safe for a local directory: path separators become `_`.
    pub fn file_stem(&self) -> String {
        self.0.replace(['/', '\\'], "_")
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentRef {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Which rendition produced the text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    Pdf,
    Html,
}

/// Bounded text for one document, ready for summarization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub document_ref: DocumentRef,
    pub source: ExtractionSource,
    pub text: String,
    /// Words in the cleaned text before truncation.
    pub word_count: usize,
    pub truncated: bool,
}

/// Outcome of the PDF attempt. Everything except `Extracted` sends the
/// orchestrator to the HTML rendition.
#[derive(Debug)]
pub enum PdfOutcome {
    Extracted(String),
    TooShort { text: String, word_count: usize },
    Failed(ExtractionError),
}

/// Downloads the PDF rendition to a scoped temporary file.
pub trait PdfFetcher {
    fn download(&self, document_ref: &DocumentRef) -> Result<DownloadedPdf, ExtractionError>;
}

/// PDF text extraction abstraction (allows mocking for tests)
pub trait PdfExtractor {
    /// Cleaned text of every page, in order.
    fn extract_text(&self, pdf_path: &Path) -> Result<String, ExtractionError>;
}

/// HTML rendition. `None` means no usable article exists; never an error.
pub trait HtmlSource {
    fn fetch_article(&self, document_ref: &DocumentRef) -> Option<String>;
}

/// Main extraction orchestrator trait
pub trait TextExtractor {
    fn extract(&self, document_ref: &DocumentRef) -> Result<ExtractionResult, ExtractionError>;
}

/// Whitespace-separated word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_from_fills_placeholder() {
        let doc = DocumentRef::new("2602.01234");
        assert_eq!(
            doc.url_from("https://arxiv.org/pdf/{id}"),
            "https://arxiv.org/pdf/2602.01234"
        );
    }

    #[test]
    fn old_style_reference_keeps_slash_in_url() {
        let doc = DocumentRef::new("hep-th/9901001");
        assert_eq!(
            doc.url_from("https://arxiv.org/html/{id}"),
            "https://arxiv.org/html/hep-th/9901001"
        );
        assert_eq!(doc.file_stem(), "hep-th_9901001");
    }

    #[test]
    fn reference_serializes_as_plain_string() {
        let json = serde_json::to_string(&DocumentRef::new("2602.01234")).unwrap();
        assert_eq!(json, "\"2602.01234\"");
    }

    #[test]
    fn source_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ExtractionSource::Html).unwrap(),
            "\"html\""
        );
    }

    #[test]
    fn word_count_ignores_whitespace_runs() {
        assert_eq!(word_count("  one\ttwo\n\nthree  "), 3);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn traits_are_object_safe() {
        fn _assert_fetcher(_: &dyn PdfFetcher) {}
        fn _assert_pdf(_: &dyn PdfExtractor) {}
        fn _assert_html(_: &dyn HtmlSource) {}
        fn _assert_extractor(_: &dyn TextExtractor) {}
    }
}
