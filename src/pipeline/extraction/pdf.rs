use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use super::clean::clean_text;
use super::types::PdfExtractor;
use super::ExtractionError;

/// PDF text extractor using the pdf-extract crate.
/// Handles digital PDFs with embedded text layers; scanned pages yield little
/// or no text and are caught by the orchestrator's word-count check.
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Raw per-page text, in document order.
    pub fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        // pdf-extract panics on some malformed inputs instead of returning Err
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        }));
        match result {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(ExtractionError::PdfParsing(e.to_string())),
            Err(_) => Err(ExtractionError::PdfParsing(
                "extractor panicked on malformed document".into(),
            )),
        }
    }
}

impl PdfExtractor for PdfTextExtractor {
    fn extract_text(&self, pdf_path: &Path) -> Result<String, ExtractionError> {
        let bytes = std::fs::read(pdf_path)?;
        let pages = self.extract_pages(&bytes)?;

        tracing::debug!(
            path = %pdf_path.display(),
            pages = pages.len(),
            "PDF text layer extracted"
        );

        Ok(clean_text(&pages.join("\n")))
    }
}
