//! Sequential batch extraction.
//!
//! One document at a time with a fixed pause between documents, to stay polite
//! towards the document service. A document that cannot be extracted is logged
//! and skipped; the batch never aborts on a single failure.

use std::fmt::Display;
use std::time::{Duration, Instant};

use serde::Serialize;

use super::extraction::{DocumentRef, ExtractionResult, TextExtractor};

/// A document the batch had to skip.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub document_ref: DocumentRef,
    pub error: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub requested: usize,
    pub extracted: Vec<ExtractionResult>,
    pub failures: Vec<BatchFailure>,
    pub duration_ms: u64,
}

impl BatchReport {
    pub fn all_failed(&self) -> bool {
        self.requested > 0 && self.extracted.is_empty()
    }
}

/// Runs extractions in order, pausing `delay` between consecutive documents.
pub struct BatchRunner {
    delay: Duration,
}

impl BatchRunner {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn run(&self, extractor: &dyn TextExtractor, refs: &[DocumentRef]) -> BatchReport {
        self.run_with(extractor, refs, |_| Ok::<(), std::convert::Infallible>(()))
    }

    /// Like `run`, handing each extracted document to `on_item` as soon as it
    /// is ready. An `on_item` error skips that document like an extraction
    /// failure would.
    pub fn run_with<F, E>(
        &self,
        extractor: &dyn TextExtractor,
        refs: &[DocumentRef],
        mut on_item: F,
    ) -> BatchReport
    where
        F: FnMut(&ExtractionResult) -> Result<(), E>,
        E: Display,
    {
        let start = Instant::now();
        let total = refs.len();
        let mut extracted = Vec::with_capacity(total);
        let mut failures = Vec::new();

        for (i, document_ref) in refs.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                std::thread::sleep(self.delay);
            }

            tracing::info!(
                document_ref = %document_ref,
                "[{}/{}] Processing document",
                i + 1,
                total
            );

            let outcome = extractor
                .extract(document_ref)
                .map_err(|e| e.to_string())
                .and_then(|result| {
                    on_item(&result).map_err(|e| e.to_string())?;
                    Ok(result)
                });

            match outcome {
                Ok(result) => extracted.push(result),
                Err(error) => {
                    tracing::error!(document_ref = %document_ref, error = %error, "Failed to process document");
                    failures.push(BatchFailure {
                        document_ref: document_ref.clone(),
                        error,
                    });
                }
            }
        }

        if extracted.len() < total {
            tracing::warn!(
                "Only {}/{} documents extracted successfully",
                extracted.len(),
                total
            );
        }

        BatchReport {
            requested: total,
            extracted,
            failures,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}
