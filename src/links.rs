//! PDF attachment discovery.
//!
//! Scans the anchors of a notice page and turns every link whose target ends
//! in `.pdf` into an absolute URL plus a display label.

use crate::error::ParseError;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Label used when an anchor has no visible text.
pub const UNNAMED_PDF: &str = "Unnamed PDF";

/// Path prepended to bare relative hrefs (`file.pdf`).
///
/// Matches the attachment layout of the Kwangwoon University notice board only.
/// It is not a relative-URL resolver: `./`, `../` and query-relative forms are
/// joined as-is.
pub const FALLBACK_ATTACHMENT_PREFIX: &str = "/kw_service/";

/// A discovered PDF attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    label: String,
    url: String,
}

impl LinkEntry {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Always absolute.
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Extracts PDF links, resolving relative targets against one base host.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    base_host: String,
    fallback_prefix: String,
}

impl LinkExtractor {
    /// `base_host` is `scheme://host[:port]`, e.g. `https://www.kw.ac.kr`.
    pub fn new(base_host: &str) -> Self {
        Self {
            base_host: base_host.trim_end_matches('/').to_string(),
            fallback_prefix: FALLBACK_ATTACHMENT_PREFIX.to_string(),
        }
    }

    pub fn with_fallback_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.fallback_prefix = prefix.into();
        self
    }

    pub fn base_host(&self) -> &str {
        &self.base_host
    }

    /// All PDF links in document order. Duplicates are kept.
    pub fn extract(&self, html: &str) -> Vec<LinkEntry> {
        let document = Html::parse_document(html);
        let Ok(anchors) = Selector::parse("a[href]") else {
            return Vec::new();
        };

        let links: Vec<LinkEntry> = document
            .select(&anchors)
            .filter_map(|a| {
                let href = a.value().attr("href")?;
                if !href.to_lowercase().ends_with(".pdf") {
                    return None;
                }
                Some(LinkEntry {
                    label: anchor_label(&a),
                    url: self.normalize(href),
                })
            })
            .collect();

        debug!(count = links.len(), base_host = %self.base_host, "extracted PDF links");
        links
    }

    /// Absolute hrefs pass through, root-relative ones get the host, bare
    /// ones get the host plus the fallback prefix.
    pub fn normalize(&self, href: &str) -> String {
        if has_http_scheme(href) {
            href.to_string()
        } else if href.starts_with('/') {
            format!("{}{}", self.base_host, href)
        } else {
            format!("{}{}{}", self.base_host, self.fallback_prefix, href)
        }
    }
}

/// Convenience wrapper using the default fallback prefix.
pub fn extract_pdf_links(html: &str, base_host: &str) -> Vec<LinkEntry> {
    LinkExtractor::new(base_host).extract(html)
}

/// `scheme://host[:port]` of a page URL.
pub fn base_host_of(page_url: &str) -> Result<String, ParseError> {
    let invalid = |reason: String| ParseError::InvalidUrl {
        url: page_url.to_string(),
        reason,
    };

    let parsed = Url::parse(page_url).map_err(|e| invalid(e.to_string()))?;
    if !["http", "https"].contains(&parsed.scheme()) {
        return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
    }
    let host = parsed
        .host_str()
        .ok_or_else(|| invalid("missing host".to_string()))?;

    Ok(match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    })
}

fn has_http_scheme(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn anchor_label(a: &ElementRef) -> String {
    let text: String = a.text().collect();
    let text = text.trim();
    if text.is_empty() {
        UNNAMED_PDF.to_string()
    } else {
        text.to_string()
    }
}
