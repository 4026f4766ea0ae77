use anyhow::Context;
use hrefwalk_scanner::{
    CrawlOutcome, Crawler, FetchConfig, HtmlLinkExtractor, HttpFetcher, LinkExtractor, MAX_DEPTH,
    PageFetcher, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;
use url::Url;

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub urls: Vec<String>,
    pub max_depth: usize,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
    pub show_progress: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            max_depth: MAX_DEPTH,
            timeout_secs: 10,
            user_agent: None,
            show_progress: false,
        }
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Crawl every seed in `options.urls` over HTTP, one after the other.
///
/// Each seed gets its own visited set; a seed that cannot be reached simply
/// produces an empty outcome. The only error is failing to build the client.
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> anyhow::Result<Vec<CrawlOutcome>> {
    let CrawlOptions {
        urls,
        max_depth,
        timeout_secs,
        user_agent,
        show_progress,
    } = options;

    let mut config = FetchConfig {
        timeout_secs,
        ..FetchConfig::default()
    };
    if let Some(user_agent) = user_agent {
        config.user_agent = user_agent;
    }
    let fetcher = HttpFetcher::new(config).context("failed to build HTTP client")?;

    let progress_bar = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .context("invalid progress template")?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(pb)
    } else {
        None
    };

    let processed_count = Arc::new(AtomicUsize::new(0));
    let count_clone = processed_count.clone();
    let pb_clone = progress_bar.clone();
    let page_callback: ProgressCallback = Arc::new(move |depth: usize, url: String| {
        let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(ref pb) = pb_clone {
            pb.set_message(format!(
                "[{}] depth {} {}",
                count,
                depth,
                extract_url_path(&url)
            ));
        }
    });

    let crawler = Crawler::new(fetcher, HtmlLinkExtractor::new())
        .with_max_depth(max_depth)
        .with_progress_callback(page_callback);

    let outcomes = execute_crawl_with(&crawler, &urls, progress_callback).await;

    if let Some(ref pb) = progress_bar {
        let total = processed_count.load(Ordering::Relaxed);
        pb.finish_with_message(format!("Crawl complete! {} pages fetched", total));
    }

    Ok(outcomes)
}

/// Crawl each seed with an existing crawler, in order.
pub async fn execute_crawl_with<F, X>(
    crawler: &Crawler<F, X>,
    urls: &[String],
    progress_callback: Option<CrawlProgressCallback>,
) -> Vec<CrawlOutcome>
where
    F: PageFetcher,
    X: LinkExtractor,
{
    let mut outcomes = Vec::with_capacity(urls.len());

    for (idx, url_str) in urls.iter().enumerate() {
        if let Some(ref callback) = progress_callback
            && urls.len() > 1
        {
            callback(format!(
                "Crawling host {}/{}: {}",
                idx + 1,
                urls.len(),
                url_str
            ));
        }

        let outcome = crawler.crawl_with_report(url_str).await;

        if outcome.pages_visited.is_empty()
            && let Some(ref callback) = progress_callback
        {
            callback(format!("[!]  Nothing crawled for {}", url_str));
        }

        info!(
            "{}: {} pages, {} failures",
            outcome.seed,
            outcome.pages_visited.len(),
            outcome.failures.len()
        );
        outcomes.push(outcome);
    }

    outcomes
}
