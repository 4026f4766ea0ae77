pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod link;
pub mod result;
pub mod visited;

pub use crawler::{Crawler, MAX_DEPTH, ProgressCallback};
pub use error::{ScanError, SkipReason};
pub use extract::{HtmlLinkExtractor, LinkExtractor};
pub use fetch::{FetchConfig, HttpFetcher, PageFetcher};
pub use result::{CrawlOutcome, LinkPair, NodeFailure};
pub use visited::VisitedSet;
