// Library interface for feedscrape
// This allows tests and external crates to use the scraper components

pub mod browser;
pub mod config;
pub mod dom;
pub mod extract;
pub mod metrics;
pub mod models;
pub mod report;
pub mod scraper;
