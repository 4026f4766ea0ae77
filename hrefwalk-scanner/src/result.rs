use serde::{Deserialize, Serialize};

/// Internal and external links gathered by a node and its descendants.
///
/// Internal links are normalized addresses, external links are the raw
/// `href` values. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPair {
    pub internal: Vec<String>,
    pub external: Vec<String>,
}

impl LinkPair {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.internal.is_empty() && self.external.is_empty()
    }

    /// Concatenate `other` after the links already held.
    pub fn append(&mut self, other: LinkPair) {
        self.internal.extend(other.internal);
        self.external.extend(other.external);
    }
}

/// A node whose fetch or link extraction failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFailure {
    pub url: String,
    pub error: String,
}

/// Everything one crawl invocation produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlOutcome {
    /// Seed after scheme prepending.
    pub seed: String,
    pub links: LinkPair,
    /// Canonical addresses whose fetch was attempted, in visit order.
    pub pages_visited: Vec<String>,
    pub failures: Vec<NodeFailure>,
}

impl CrawlOutcome {
    pub fn new(seed: String) -> Self {
        Self {
            seed,
            links: LinkPair::new(),
            pages_visited: Vec::new(),
            failures: Vec::new(),
        }
    }
}
