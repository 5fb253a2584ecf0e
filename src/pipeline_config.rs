//! Extraction configuration.
//!
//! Every threshold, timeout and URL template the extraction pipeline uses lives
//! here, passed explicitly into each component. Defaults match the arXiv
//! document service; tests override individual fields.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::default_user_agent;
use crate::pipeline::extraction::ExtractionError;

/// Placeholder replaced by the document reference in URL templates.
pub const ID_PLACEHOLDER: &str = "{id}";

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Configuration for document retrieval, extraction and bounding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// URL of the PDF rendition. `{id}` is replaced by the document reference.
    pub pdf_url_template: String,
    /// URL of the HTML rendition. `{id}` is replaced by the document reference.
    pub html_url_template: String,
    /// Timeout for every HTTP request (PDF download and HTML fetch).
    pub request_timeout_secs: u64,
    /// PDF text with fewer words than this falls back to HTML.
    pub min_pdf_words: usize,
    /// Token budget for the bounded text handed downstream.
    pub max_tokens: usize,
    /// Characters-per-token estimate used for the budget.
    pub chars_per_token: usize,
    /// Pause between consecutive documents in a batch.
    pub inter_item_delay_ms: u64,
    /// User agent for document requests.
    pub user_agent: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            pdf_url_template: "https://arxiv.org/pdf/{id}".into(),
            html_url_template: "https://arxiv.org/html/{id}".into(),
            request_timeout_secs: 60,
            min_pdf_words: 200,
            max_tokens: 80_000,
            chars_per_token: 4,
            inter_item_delay_ms: 3_000,
            user_agent: default_user_agent(),
        }
    }
}

impl ExtractionConfig {
    /// Parse a (possibly partial) JSON override document.
    /// Fields not present keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ExtractionError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ExtractionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ExtractionError> {
        if self.chars_per_token == 0 {
            return Err(ExtractionError::Config(
                "chars_per_token must be at least 1".into(),
            ));
        }
        for (name, template) in [
            ("pdf_url_template", &self.pdf_url_template),
            ("html_url_template", &self.html_url_template),
        ] {
            if !template.contains(ID_PLACEHOLDER) {
                return Err(ExtractionError::Config(format!(
                    "{name} must contain {ID_PLACEHOLDER}"
                )));
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn inter_item_delay(&self) -> Duration {
        Duration::from_millis(self.inter_item_delay_ms)
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
