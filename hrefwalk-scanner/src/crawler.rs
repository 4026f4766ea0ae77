use crate::error::{Result, SkipReason};
use crate::extract::LinkExtractor;
use crate::fetch::PageFetcher;
use crate::link::{ClassifiedLink, classify, parse_address, prepend_scheme_if_missing};
use crate::result::{CrawlOutcome, LinkPair, NodeFailure};
use crate::visited::VisitedSet;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Deepest level that is still fetched; the seed sits at depth 1.
pub const MAX_DEPTH: usize = 2;

/// Called with `(depth, url)` right before a page is fetched.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// Depth-bounded, strictly sequential link crawler.
pub struct Crawler<F, X> {
    fetcher: F,
    extractor: X,
    max_depth: usize,
    progress_callback: Option<ProgressCallback>,
}

/// Mutable state owned by a single crawl invocation.
#[derive(Default)]
struct Traversal {
    visited: VisitedSet,
    failures: Vec<NodeFailure>,
}

impl<F, X> Crawler<F, X>
where
    F: PageFetcher,
    X: LinkExtractor,
{
    pub fn new(fetcher: F, extractor: X) -> Self {
        Self {
            fetcher,
            extractor,
            max_depth: MAX_DEPTH,
            progress_callback: None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Crawl from `seed` and return every internal and external link found.
    ///
    /// Never fails: unreachable pages and malformed addresses just contribute
    /// nothing, and an unusable seed yields an empty pair.
    pub async fn crawl(&self, seed: &str) -> LinkPair {
        self.crawl_with_report(seed).await.links
    }

    /// Same traversal as [`Crawler::crawl`], also reporting the pages that
    /// were visited and the ones that failed.
    pub async fn crawl_with_report(&self, seed: &str) -> CrawlOutcome {
        let seed = prepend_scheme_if_missing(seed);
        info!("Starting crawl of {} (max depth {})", seed, self.max_depth);

        let mut traversal = Traversal::default();
        let links = self.visit(seed.clone(), 1, &mut traversal).await;

        if traversal.visited.is_empty() {
            warn!("Nothing was fetched for {}", seed);
        }

        info!(
            "Crawl complete. Visited {} pages, {} internal and {} external links",
            traversal.visited.len(),
            links.internal.len(),
            links.external.len()
        );

        CrawlOutcome {
            seed,
            links,
            pages_visited: traversal.visited.iter().map(str::to_string).collect(),
            failures: traversal.failures,
        }
    }

    fn visit<'a>(
        &'a self,
        url: String,
        depth: usize,
        traversal: &'a mut Traversal,
    ) -> BoxFuture<'a, LinkPair> {
        async move {
            debug!("processing: {}", url);

            let address = match self.admit(&url, depth, &traversal.visited) {
                Ok(address) => address,
                Err(reason) => {
                    debug!("{}: {}", reason, url);
                    return LinkPair::new();
                }
            };

            if let Some(ref callback) = self.progress_callback {
                callback(depth, address.to_string());
            }

            let raw_links = match self.fetch_links(&address).await {
                Ok(links) => links,
                Err(e) => {
                    warn!("error: {} ({})", e, address);
                    traversal.failures.push(NodeFailure {
                        url: address.to_string(),
                        error: e.to_string(),
                    });
                    Vec::new()
                }
            };

            // Marked only once the fetch has resolved, failed or not
            traversal.visited.insert(&address);

            let mut links = partition(&raw_links, &address);
            debug!(
                "{}: {} internal, {} external links at depth {}",
                address,
                links.internal.len(),
                links.external.len(),
                depth
            );

            let children = links.internal.clone();
            for child in children {
                let found = self.visit(child, depth + 1, traversal).await;
                links.append(found);
            }

            links
        }
        .boxed()
    }

    fn admit(
        &self,
        url: &str,
        depth: usize,
        visited: &VisitedSet,
    ) -> std::result::Result<Url, SkipReason> {
        if depth > self.max_depth {
            return Err(SkipReason::DepthExceeded);
        }

        let address = parse_address(url).ok_or(SkipReason::MalformedAddress)?;

        if visited.contains(&address) {
            return Err(SkipReason::DuplicateVisit);
        }

        Ok(address)
    }

    async fn fetch_links(&self, address: &Url) -> Result<Vec<String>> {
        let content = self.fetcher.fetch(address).await?;
        self.extractor.extract(&content)
    }
}

/// Split raw links into normalized internal and raw external lists,
/// dropping anything that is not fetchable.
fn partition(raw_links: &[String], base: &Url) -> LinkPair {
    let mut links = LinkPair::new();

    for raw in raw_links {
        match classify(raw, base) {
            ClassifiedLink::Internal(normalized) => links.internal.push(normalized),
            ClassifiedLink::External(raw) => links.external.push(raw),
            ClassifiedLink::Ignored => {}
        }
    }

    links
}
