pub mod types;
pub mod clean;
pub mod truncate;
pub mod pdf;
pub mod download;
pub mod html;
pub mod orchestrator;

pub use types::*;
pub use clean::*;
pub use truncate::*;
pub use pdf::*;
pub use download::*;
pub use html::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Expected PDF but got {content_type}")]
    NotPdf { content_type: String },

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to extract text for {0} via both PDF and HTML")]
    Exhausted(String),
}

impl ExtractionError {
    /// Map a reqwest transport error, naming the timeout when one fired.
    pub(crate) fn from_transport(e: reqwest::Error, timeout_secs: u64) -> Self {
        if e.is_timeout() {
            ExtractionError::HttpClient(format!("Request timed out after {timeout_secs}s"))
        } else {
            ExtractionError::HttpClient(e.to_string())
        }
    }
}
