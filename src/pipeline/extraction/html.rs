use std::sync::LazyLock;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use scraper::{Html, Selector};

use super::clean::clean_text;
use super::types::{DocumentRef, HtmlSource};
use crate::pipeline_config::ExtractionConfig;

/// Primary content containers, in order of preference.
static CONTENT_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["article", "div.ltx_page_content"]
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});

/// Text under these elements is never visible prose.
const SKIP_TAGS: &[&str] = &["script", "style", "noscript"];

/// Locate the article container and return its cleaned text.
/// `None` when the page has no recognizable content container, or the
/// container holds no visible text.
pub fn extract_article_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let container = CONTENT_SELECTORS
        .iter()
        .find_map(|selector| document.select(selector).next())?;

    let blocks: Vec<&str> = container
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .parent()
                .and_then(|p| p.value().as_element())
                .is_some_and(|e| SKIP_TAGS.contains(&e.name()));
            if hidden {
                return None;
            }
            let trimmed = text.trim();
            (!trimmed.is_empty()).then_some(trimmed)
        })
        .collect();

    let text = clean_text(&blocks.join("\n"));
    (!text.is_empty()).then_some(text)
}

/// Fetches the HTML rendition of a document and extracts the article text.
/// Every failure is an absence, logged, never an error.
pub struct HtmlArticleExtractor {
    client: Client,
    url_template: String,
}

impl HtmlArticleExtractor {
    pub fn new(client: Client, config: &ExtractionConfig) -> Self {
        Self {
            client,
            url_template: config.html_url_template.clone(),
        }
    }
}

impl HtmlSource for HtmlArticleExtractor {
    fn fetch_article(&self, document_ref: &DocumentRef) -> Option<String> {
        let url = document_ref.url_from(&self.url_template);
        tracing::info!(document_ref = %document_ref, url = %url, "Trying HTML fallback");

        let response = match self.client.get(&url).send() {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(document_ref = %document_ref, error = %e, "HTML fallback failed");
                return None;
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::info!(document_ref = %document_ref, "No HTML version available");
            return None;
        }
        if !status.is_success() {
            tracing::warn!(
                document_ref = %document_ref,
                status = status.as_u16(),
                "HTML fallback failed"
            );
            return None;
        }

        let body = match response.text() {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(document_ref = %document_ref, error = %e, "HTML fallback failed");
                return None;
            }
        };

        let text = extract_article_text(&body);
        if text.is_none() {
            tracing::warn!(document_ref = %document_ref, "Could not find article content in HTML");
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::test_support::{config_for, serve_once, test_client};

    fn extractor_for(base: &str) -> HtmlArticleExtractor {
        let config = config_for(base);
        HtmlArticleExtractor::new(test_client(&config), &config)
    }

    #[test]
    fn article_element_preferred() {
        let html = r#"<html><body>
            <nav>Menu</nav>
            <article><h1>Title</h1><p>First paragraph.</p><p>Second <em>emphasised</em> one.</p></article>
            <div class="ltx_page_content"><p>Other container</p></div>
        </body></html>"#;
        let text = extract_article_text(html).unwrap();
        assert_eq!(text, "Title\nFirst paragraph.\nSecond\nemphasised\none.");
        assert!(!text.contains("Menu"));
        assert!(!text.contains("Other container"));
    }

    #[test]
    fn falls_back_to_page_content_div() {
        let html = r#"<html><body>
            <div class="ltx_page_content"><h2>Abstract</h2><p>We study things.</p></div>
        </body></html>"#;
        assert_eq!(
            extract_article_text(html).unwrap(),
            "Abstract\nWe study things."
        );
    }

    #[test]
    fn no_container_is_absence() {
        assert!(extract_article_text("<html><body><p>Just a page</p></body></html>").is_none());
    }

    #[test]
    fn container_without_visible_text_is_absence() {
        assert!(extract_article_text("<article><script>x()</script>  </article>").is_none());
        assert!(extract_article_text("<div class=\"ltx_page_content\"></div>").is_none());
    }

    #[test]
    fn script_and_style_text_skipped() {
        let html = r#"<article><style>p { color: red }</style><p>Visible</p><script>var x = 1;</script></article>"#;
        assert_eq!(extract_article_text(html).unwrap(), "Visible");
    }

    #[test]
    fn extracted_text_is_cleaned() {
        let mut body = String::from("<article>");
        for i in 0..4 {
            body.push_str(&format!("<p>Running header</p><p>Section {i}</p><p>12</p>"));
        }
        body.push_str("</article>");
        let text = extract_article_text(&body).unwrap();
        assert!(!text.contains("Running header"));
        assert!(text.contains("Section 0"));
        assert!(text.contains("Section 3"));
    }

    #[test]
    fn not_found_is_absence() {
        let (base, server) = serve_once("404 Not Found", "text/html", b"missing".to_vec());
        let result = extractor_for(&base).fetch_article(&DocumentRef::new("2602.00002"));
        let request_line = server.join().unwrap();
        assert!(result.is_none());
        assert!(request_line.starts_with("GET /html/2602.00002 "));
    }

    #[test]
    fn server_error_is_absence() {
        let (base, server) = serve_once("500 Internal Server Error", "text/html", Vec::new());
        let result = extractor_for(&base).fetch_article(&DocumentRef::new("2602.00002"));
        server.join().unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn connection_refused_is_absence() {
        // Bind then drop to get a port with nothing listening
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let result = extractor_for(&format!("http://127.0.0.1:{port}"))
            .fetch_article(&DocumentRef::new("2602.00002"));
        assert!(result.is_none());
    }

    #[test]
    fn successful_fetch_returns_article_text() {
        let page = b"<html><body><article><p>Full paper body.</p></article></body></html>".to_vec();
        let (base, server) = serve_once("200 OK", "text/html; charset=utf-8", page);
        let result = extractor_for(&base).fetch_article(&DocumentRef::new("2602.00003"));
        server.join().unwrap();
        assert_eq!(result.as_deref(), Some("Full paper body."));
    }
}
