pub mod crawl;
pub mod report;

pub use crawl::{CrawlOptions, CrawlProgressCallback, execute_crawl, execute_crawl_with};
pub use report::{ReportData, ReportFormat, generate_report, save_report};
