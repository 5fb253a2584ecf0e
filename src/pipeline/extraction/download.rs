//! PDF retrieval into a scoped temporary file.
//!
//! The downloaded file lives in its own temporary directory, owned by
//! `DownloadedPdf`. Dropping the guard deletes both, so every exit path of the
//! PDF attempt (success, short text, parse failure, panic unwind) releases it.

use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tempfile::TempDir;

use super::types::{DocumentRef, PdfFetcher};
use super::ExtractionError;
use crate::pipeline_config::ExtractionConfig;

/// Build the blocking HTTP client shared by the PDF and HTML paths.
pub fn build_http_client(config: &ExtractionConfig) -> Result<Client, ExtractionError> {
    Client::builder()
        .timeout(config.request_timeout())
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| ExtractionError::HttpClient(e.to_string()))
}

/// A PDF on local disk, deleted when dropped.
#[derive(Debug)]
pub struct DownloadedPdf {
    _dir: TempDir,
    path: PathBuf,
    size_bytes: usize,
}

impl DownloadedPdf {
    /// Persist `bytes` to a fresh temporary directory, named after the reference.
    pub fn write(document_ref: &DocumentRef, bytes: &[u8]) -> Result<Self, ExtractionError> {
        let dir = tempfile::Builder::new().prefix("paper_").tempdir()?;
        let path = dir.path().join(format!("{}.pdf", document_ref.file_stem()));
        std::fs::write(&path, bytes)?;
        Ok(Self {
            _dir: dir,
            path,
            size_bytes: bytes.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }
}

/// Downloads PDF renditions over HTTP.
pub struct PdfDownloader {
    client: Client,
    url_template: String,
    timeout_secs: u64,
}

impl PdfDownloader {
    pub fn new(client: Client, config: &ExtractionConfig) -> Self {
        Self {
            client,
            url_template: config.pdf_url_template.clone(),
            timeout_secs: config.request_timeout_secs,
        }
    }
}

impl PdfFetcher for PdfDownloader {
    fn download(&self, document_ref: &DocumentRef) -> Result<DownloadedPdf, ExtractionError> {
        let url = document_ref.url_from(&self.url_template);
        tracing::info!(document_ref = %document_ref, url = %url, "Downloading PDF");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| ExtractionError::from_transport(e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.contains("application/pdf") {
            return Err(ExtractionError::NotPdf { content_type });
        }

        let bytes = response
            .bytes()
            .map_err(|e| ExtractionError::from_transport(e, self.timeout_secs))?;
        let pdf = DownloadedPdf::write(document_ref, &bytes)?;

        tracing::info!(
            document_ref = %document_ref,
            size = pdf.size_bytes(),
            path = %pdf.path().display(),
            "PDF downloaded"
        );
        Ok(pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::test_support::{config_for, serve_once, test_client};

    fn downloader(config: &ExtractionConfig) -> PdfDownloader {
        PdfDownloader::new(test_client(config), config)
    }

    #[test]
    fn http_client_builds_from_default_config() {
        assert!(build_http_client(&ExtractionConfig::default()).is_ok());
    }

    #[test]
    fn downloaded_file_named_from_sanitized_reference() {
        let pdf = DownloadedPdf::write(&DocumentRef::new("hep-th/9901001"), b"%PDF-1.4").unwrap();
        assert_eq!(pdf.path().file_name().unwrap(), "hep-th_9901001.pdf");
        assert_eq!(pdf.size_bytes(), 8);
    }

    #[test]
    fn dropping_guard_deletes_file_and_directory() {
        let pdf = DownloadedPdf::write(&DocumentRef::new("2602.00001"), b"%PDF-1.4").unwrap();
        let path = pdf.path().to_path_buf();
        let dir = path.parent().unwrap().to_path_buf();
        assert!(path.exists());
        drop(pdf);
        assert!(!path.exists());
        assert!(!dir.exists());
    }

    #[test]
    fn download_writes_pdf_body() {
        let body = b"%PDF-1.4 fake body".to_vec();
        let (base, server) = serve_once("200 OK", "application/pdf", body.clone());
        let config = config_for(&base);

        let pdf = downloader(&config)
            .download(&DocumentRef::new("2602.12345"))
            .unwrap();
        assert_eq!(std::fs::read(pdf.path()).unwrap(), body);

        let request_line = server.join().unwrap();
        assert!(request_line.starts_with("GET /pdf/2602.12345 "));
    }

    #[test]
    fn non_pdf_content_type_rejected() {
        let (base, server) = serve_once("200 OK", "text/html; charset=utf-8", b"<html/>".to_vec());
        let config = config_for(&base);

        let err = downloader(&config)
            .download(&DocumentRef::new("2602.12345"))
            .unwrap_err();
        server.join().unwrap();
        match err {
            ExtractionError::NotPdf { content_type } => assert!(content_type.starts_with("text/html")),
            other => panic!("expected NotPdf, got {other:?}"),
        }
    }

    #[test]
    fn error_status_rejected() {
        let (base, server) = serve_once("503 Service Unavailable", "text/plain", b"busy".to_vec());
        let config = config_for(&base);

        let err = downloader(&config)
            .download(&DocumentRef::new("2602.12345"))
            .unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, ExtractionError::HttpStatus { status: 503, .. }));
    }
}
