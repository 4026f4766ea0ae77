use std::collections::HashSet;
use url::Url;

/// Canonical addresses already dispatched for fetching during one crawl.
///
/// Append-only: entries are never removed. Insertion order is kept so the
/// pages a crawl touched can be reported in the order they were visited.
#[derive(Debug, Default, Clone)]
pub struct VisitedSet {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.seen.contains(url.as_str())
    }

    /// Record `url`; returns `false` if it was already present.
    pub fn insert(&mut self, url: &Url) -> bool {
        let href = url.as_str();
        if self.seen.contains(href) {
            return false;
        }
        self.seen.insert(href.to_string());
        self.order.push(href.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}
