// Report generation from crawl outcomes

use crate::crawl::extract_url_path;
use anyhow::Context;
use chrono::Utc;
use hrefwalk_scanner::CrawlOutcome;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use url::Url;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub internal_links: usize,
    pub external_links: usize,
    pub pages_visited: usize,
    pub failures: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub generated_at: String,
    pub max_depth: usize,
    pub seeds: Vec<CrawlOutcome>,
    pub totals: Totals,
}

impl ReportData {
    pub fn new(seeds: Vec<CrawlOutcome>, max_depth: usize) -> Self {
        let totals = Totals {
            internal_links: seeds.iter().map(|s| s.links.internal.len()).sum(),
            external_links: seeds.iter().map(|s| s.links.external.len()).sum(),
            pages_visited: seeds.iter().map(|s| s.pages_visited.len()).sum(),
            failures: seeds.iter().map(|s| s.failures.len()).sum(),
        };

        Self {
            generated_at: Utc::now().to_rfc3339(),
            max_depth,
            seeds,
            totals,
        }
    }

    /// Drop repeated links from every seed's lists, keeping first occurrences.
    pub fn deduplicated(mut self) -> Self {
        for seed in &mut self.seeds {
            dedup_preserving_order(&mut seed.links.internal);
            dedup_preserving_order(&mut seed.links.external);
        }
        self.totals.internal_links = self.seeds.iter().map(|s| s.links.internal.len()).sum();
        self.totals.external_links = self.seeds.iter().map(|s| s.links.external.len()).sum();
        self
    }
}

fn dedup_preserving_order(links: &mut Vec<String>) {
    let mut seen = HashSet::new();
    links.retain(|link| seen.insert(link.clone()));
}

pub fn generate_text_report(data: &ReportData) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push_str("                           HREFWALK CRAWL REPORT\n");
    report.push_str(RULE);
    report.push('\n');

    report.push_str(&format!("Generated:    {}\n", data.generated_at));
    report.push_str(&format!("Max depth:    {}\n", data.max_depth));
    report.push_str(&format!("Seeds:        {}\n", data.seeds.len()));
    report.push_str(&format!("Pages:        {}\n", data.totals.pages_visited));
    report.push_str(&format!("Failures:     {}\n", data.totals.failures));
    report.push('\n');

    for seed in &data.seeds {
        report.push_str(RULE);
        report.push_str(&format!("{}\n", seed.seed));
        report.push_str(RULE);
        report.push('\n');

        report.push_str(&format!("internal links ({}):\n", seed.links.internal.len()));
        for link in &seed.links.internal {
            report.push_str(&format!("  {}\n", link));
        }
        report.push('\n');

        report.push_str(&format!("external links ({}):\n", seed.links.external.len()));
        for link in &seed.links.external {
            report.push_str(&format!("  {}\n", link));
        }
        report.push('\n');

        if !seed.failures.is_empty() {
            report.push_str(&format!("failed pages ({}):\n", seed.failures.len()));
            for failure in &seed.failures {
                report.push_str(&format!("  {}  {}\n", failure.url, failure.error));
            }
            report.push('\n');
        }
    }

    report
}

pub fn generate_json_report(data: &ReportData) -> anyhow::Result<String> {
    serde_json::to_string_pretty(data).context("failed to serialize report")
}

pub fn generate_markdown_report(data: &ReportData) -> String {
    let mut md = String::new();

    md.push_str("# hrefwalk crawl report\n\n");
    md.push_str(&format!("**Generated:** {}  \n", data.generated_at));
    md.push_str(&format!("**Max depth:** {}  \n", data.max_depth));
    md.push_str(&format!(
        "**Pages visited:** {} ({} failed)\n\n",
        data.totals.pages_visited, data.totals.failures
    ));

    md.push_str("| Seed | Internal | External | Pages | Failures |\n");
    md.push_str("|------|----------|----------|-------|----------|\n");
    for seed in &data.seeds {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            seed.seed,
            seed.links.internal.len(),
            seed.links.external.len(),
            seed.pages_visited.len(),
            seed.failures.len()
        ));
    }
    md.push('\n');

    for seed in &data.seeds {
        md.push_str(&format!("## {}\n\n", seed.seed));

        md.push_str("### Internal links\n\n");
        for link in &seed.links.internal {
            md.push_str(&format!("- {}\n", link));
        }
        md.push('\n');

        md.push_str("### External links\n\n");
        for link in &seed.links.external {
            md.push_str(&format!("- {}\n", link));
        }
        md.push('\n');

        md.push_str("### Pages visited\n\n");
        for (host, paths) in group_by_host(&seed.pages_visited) {
            md.push_str(&format!("**{}**\n\n", host));
            for path in paths {
                md.push_str(&format!("- `{}`\n", path));
            }
            md.push('\n');
        }

        if !seed.failures.is_empty() {
            md.push_str("### Failures\n\n");
            for failure in &seed.failures {
                md.push_str(&format!("- {}: {}\n", failure.url, failure.error));
            }
            md.push('\n');
        }
    }

    md
}

/// Group page addresses by host, keeping their paths in visit order.
fn group_by_host(pages: &[String]) -> BTreeMap<String, Vec<String>> {
    let mut by_host: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for page in pages {
        if let Ok(url) = Url::parse(page)
            && let Some(host) = url.host_str()
        {
            by_host
                .entry(host.to_string())
                .or_default()
                .push(extract_url_path(page));
        }
    }

    by_host
}

pub fn generate_report(data: &ReportData, format: ReportFormat) -> anyhow::Result<String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(data)),
        ReportFormat::Json => generate_json_report(data),
        ReportFormat::Markdown => Ok(generate_markdown_report(data)),
    }
}

pub fn save_report(content: &str, path: &Path) -> anyhow::Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("failed to create report file {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    Ok(())
}
