use anyhow::{Context, anyhow, bail};
use clap::ArgMatches;
use colored::Colorize;
use hrefwalk_scanner::MAX_DEPTH;
use hrefwalk_scanner::link::{parse_address, prepend_scheme_if_missing};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

// Re-export crawl and report types from hrefwalk-core
pub use hrefwalk_core::crawl::{CrawlOptions, CrawlProgressCallback, execute_crawl};
pub use hrefwalk_core::report::{ReportData, ReportFormat, generate_report, save_report};

/// Install the fmt subscriber on stderr. `RUST_LOG` wins over `verbose`.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "warn,hrefwalk_scanner=debug,hrefwalk_core=info"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn print_banner() {
    eprintln!(
        "{} {}",
        "hrefwalk".bright_cyan().bold(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
}

// Helper functions for crawl handler

/// Load seeds from either a file or a single URL argument
pub fn load_urls_from_source(
    url: Option<&String>,
    hosts_file: Option<&PathBuf>,
) -> anyhow::Result<Vec<String>> {
    if let Some(hosts_file_path) = hosts_file {
        load_urls_from_file(hosts_file_path)
    } else if let Some(url) = url {
        parse_url_line(url)
            .map(|seed| vec![seed])
            .ok_or_else(|| anyhow!("Invalid URL '{}'", url))
    } else {
        bail!("Either --url or --hosts-file must be provided")
    }
}

/// Load and parse seeds from a file, one per line
pub fn load_urls_from_file(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read hosts file {}", path.display()))?;

    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_url_line)
        .collect();

    if urls.is_empty() {
        bail!("No valid URLs found in {}", path.display());
    }

    Ok(urls)
}

/// Parse a single line as a seed, adding http:// if it has no scheme
pub fn parse_url_line(line: &str) -> Option<String> {
    let with_scheme = prepend_scheme_if_missing(line.trim());
    if parse_address(&with_scheme).is_some() {
        return Some(with_scheme);
    }

    eprintln!("{} Skipping invalid URL '{}'", "⚠".yellow().bold(), line);
    None
}

pub async fn handle_crawl(sub_matches: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    let url = sub_matches.get_one::<String>("url");
    let hosts_file = sub_matches.get_one::<PathBuf>("hosts-file");
    let max_depth = *sub_matches.get_one::<usize>("depth").unwrap_or(&MAX_DEPTH);
    let timeout_secs = *sub_matches.get_one::<u64>("timeout").unwrap_or(&10);
    let user_agent = sub_matches.get_one::<String>("user-agent").cloned();
    let unique = sub_matches.get_flag("unique");
    let output = sub_matches.get_one::<String>("output");
    let format_name = sub_matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    let format = ReportFormat::from_str(format_name)
        .ok_or_else(|| anyhow!("Unknown report format '{}'", format_name))?;

    let urls = load_urls_from_source(url, hosts_file)?;
    info!("Loaded {} seed(s)", urls.len());

    if !quiet {
        eprintln!();
        eprintln!(
            "{} Crawling {} seed(s)",
            "→".blue(),
            urls.len().to_string().bright_white()
        );
        eprintln!("{} Max depth: {}", "→".blue(), max_depth);
        eprintln!("{} Timeout: {}s", "→".blue(), timeout_secs);
        eprintln!();
    }

    let options = CrawlOptions {
        urls,
        max_depth,
        timeout_secs,
        user_agent,
        show_progress: !quiet,
    };

    let progress_callback: Option<CrawlProgressCallback> = if quiet {
        None
    } else {
        Some(Arc::new(|msg: String| {
            eprintln!("{}", msg);
        }))
    };

    let outcomes = execute_crawl(options, progress_callback).await?;

    let mut data = ReportData::new(outcomes, max_depth);
    if unique {
        data = data.deduplicated();
    }

    if !quiet {
        eprintln!(
            "\n{} Crawl complete: {} pages, {} internal, {} external links\n",
            "✓".green().bold(),
            data.totals.pages_visited,
            data.totals.internal_links,
            data.totals.external_links
        );
        if data.totals.failures > 0 {
            eprintln!(
                "{} {} page(s) could not be fetched",
                "⚠".yellow().bold(),
                data.totals.failures
            );
        }
    }

    let report = generate_report(&data, format)?;

    match output {
        Some(path) => {
            let expanded = shellexpand::tilde(path);
            let report_path = Path::new(expanded.as_ref());
            save_report(&report, report_path)?;
            info!("Wrote {} report to {}", format_name, report_path.display());
            if !quiet {
                eprintln!(
                    "{} Report saved to {}",
                    "✓".green().bold(),
                    report_path.display().to_string().bright_white()
                );
            }
        }
        None => print!("{}", report),
    }

    Ok(())
}
