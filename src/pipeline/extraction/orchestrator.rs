use super::download::{build_http_client, PdfDownloader};
use super::html::HtmlArticleExtractor;
use super::pdf::PdfTextExtractor;
use super::truncate::{truncate_to_budget, was_truncated};
use super::types::{
    word_count, DocumentRef, ExtractionResult, ExtractionSource, HtmlSource, PdfExtractor,
    PdfFetcher, PdfOutcome, TextExtractor,
};
use super::ExtractionError;
use crate::pipeline_config::ExtractionConfig;

/// Concrete implementation of the text extractor.
/// PDF first, HTML rendition as fallback; collaborators are trait objects,
/// enabling dependency injection.
pub struct DocumentExtractor {
    pdf_fetcher: Box<dyn PdfFetcher + Send + Sync>,
    pdf_extractor: Box<dyn PdfExtractor + Send + Sync>,
    html_source: Box<dyn HtmlSource + Send + Sync>,
    config: ExtractionConfig,
}

impl DocumentExtractor {
    pub fn new(
        pdf_fetcher: Box<dyn PdfFetcher + Send + Sync>,
        pdf_extractor: Box<dyn PdfExtractor + Send + Sync>,
        html_source: Box<dyn HtmlSource + Send + Sync>,
        config: ExtractionConfig,
    ) -> Self {
        Self {
            pdf_fetcher,
            pdf_extractor,
            html_source,
            config,
        }
    }

    /// Extractor wired to the live document service described by `config`.
    pub fn over_http(config: ExtractionConfig) -> Result<Self, ExtractionError> {
        config.validate()?;
        let client = build_http_client(&config)?;
        Ok(Self::new(
            Box::new(PdfDownloader::new(client.clone(), &config)),
            Box::new(PdfTextExtractor),
            Box::new(HtmlArticleExtractor::new(client, &config)),
            config,
        ))
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Download and extract the PDF rendition.
    /// The downloaded file is released when `pdf` goes out of scope.
    pub fn try_pdf(&self, document_ref: &DocumentRef) -> PdfOutcome {
        let pdf = match self.pdf_fetcher.download(document_ref) {
            Ok(pdf) => pdf,
            Err(e) => return PdfOutcome::Failed(e),
        };

        let text = match self.pdf_extractor.extract_text(pdf.path()) {
            Ok(text) => text,
            Err(e) => return PdfOutcome::Failed(e),
        };

        let words = word_count(&text);
        if words < self.config.min_pdf_words {
            return PdfOutcome::TooShort {
                text,
                word_count: words,
            };
        }
        PdfOutcome::Extracted(text)
    }

    fn bounded(
        &self,
        document_ref: &DocumentRef,
        source: ExtractionSource,
        text: String,
    ) -> ExtractionResult {
        let words = word_count(&text);
        let bounded =
            truncate_to_budget(&text, self.config.max_tokens, self.config.chars_per_token);
        let truncated = was_truncated(&bounded, &text);

        tracing::info!(
            document_ref = %document_ref,
            source = ?source,
            words,
            truncated,
            "Text extraction complete"
        );

        ExtractionResult {
            document_ref: document_ref.clone(),
            source,
            text: bounded,
            word_count: words,
            truncated,
        }
    }
}

impl TextExtractor for DocumentExtractor {
    fn extract(&self, document_ref: &DocumentRef) -> Result<ExtractionResult, ExtractionError> {
        tracing::info!(document_ref = %document_ref, "Starting text extraction");

        match self.try_pdf(document_ref) {
            PdfOutcome::Extracted(text) => {
                return Ok(self.bounded(document_ref, ExtractionSource::Pdf, text));
            }
            PdfOutcome::TooShort { word_count, .. } => {
                tracing::warn!(
                    document_ref = %document_ref,
                    words = word_count,
                    min_words = self.config.min_pdf_words,
                    "PDF extraction yielded too little text, trying HTML fallback"
                );
            }
            PdfOutcome::Failed(e) => {
                tracing::warn!(
                    document_ref = %document_ref,
                    error = %e,
                    "PDF extraction failed, trying HTML fallback"
                );
            }
        }

        match self.html_source.fetch_article(document_ref) {
            Some(text) if !text.is_empty() => {
                Ok(self.bounded(document_ref, ExtractionSource::Html, text))
            }
            _ => Err(ExtractionError::Exhausted(document_ref.to_string())),
        }
    }
}
