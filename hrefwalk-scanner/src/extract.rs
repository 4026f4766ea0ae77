use crate::error::{Result, ScanError};
use scraper::{Html, Selector};

/// Pulls raw anchor `href` values out of page content.
pub trait LinkExtractor: Send + Sync {
    /// Non-empty raw `href` values in document order. `Err` means the
    /// content could not be parsed, which is distinct from a page with no links.
    fn extract(&self, content: &str) -> Result<Vec<String>>;
}

/// [`LinkExtractor`] for HTML documents, reading `a[href]` elements.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlLinkExtractor;

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract(&self, content: &str) -> Result<Vec<String>> {
        let document = Html::parse_document(content);
        let link_selector = Selector::parse("a[href]")
            .map_err(|e| ScanError::ParseError(format!("bad anchor selector: {:?}", e)))?;

        let links = document
            .select(&link_selector)
            .filter_map(|element| element.value().attr("href"))
            .filter(|href| !href.is_empty())
            .map(str::to_string)
            .collect();

        Ok(links)
    }
}
