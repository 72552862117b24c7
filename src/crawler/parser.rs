//! HTML document access for index pages
//!
//! This module wraps a parsed page behind [`PageDocument`] and provides:
//! - Link lookup by selector, returning visible text and raw `href`
//! - Detail URL extraction from an index page
//! - Next-page lookup by exact link text
//!
//! `scraper::Html` is not `Send`, so callers parse, extract owned data and
//! drop the document before the next `.await`.

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A link found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkHandle {
    /// Visible text, trimmed
    pub text: String,

    /// Raw `href` attribute, if the element carries one
    pub href: Option<String>,
}

/// A parsed HTML page
pub struct PageDocument {
    html: Html,
}

impl PageDocument {
    /// Parses a full HTML document
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// Returns every element matching `selector` as a link, in document order
    pub fn find_links(&self, selector: &Selector) -> Vec<LinkHandle> {
        self.html
            .select(selector)
            .map(|element| LinkHandle {
                text: element.text().collect::<String>().trim().to_string(),
                href: element.value().attr("href").map(str::to_string),
            })
            .collect()
    }

    /// Iterates over the elements matching `selector`
    pub fn select<'a, 'b>(
        &'a self,
        selector: &'b Selector,
    ) -> scraper::html::Select<'a, 'b> {
        self.html.select(selector)
    }
}

/// Extracts the absolute detail-page URLs from an index page
///
/// Hrefs are resolved against `page_url`; elements without a usable href are
/// skipped. Duplicates are kept.
pub fn extract_detail_urls(
    document: &PageDocument,
    selector: &Selector,
    page_url: &Url,
) -> Vec<Url> {
    document
        .find_links(selector)
        .into_iter()
        .filter_map(|link| link.href.and_then(|href| resolve_link(&href, page_url)))
        .collect()
}

/// Locates the "next page" link in the pagination control
///
/// The first element whose trimmed text equals `marker` wins. Returns `None`
/// when there is no such element or it carries no usable href, which ends the
/// walk.
pub fn find_next_page(
    document: &PageDocument,
    selector: &Selector,
    marker: &str,
    page_url: &Url,
) -> Option<Url> {
    let next = document
        .find_links(selector)
        .into_iter()
        .find(|link| link.text == marker)?;

    resolve_link(next.href.as_deref()?, page_url)
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only anchors
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url)
    } else {
        None
    }
}

/// Text content of an element with runs of whitespace collapsed to one space
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}
