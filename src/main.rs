use std::path::Path;

use log::{error, info};

use feedscrape::config::Config;
use feedscrape::report;
use feedscrape::scraper::FeedScraper;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("scrape aborted: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = Config::load(Path::new(&config_path))?;
    let output = config.output.clone();

    let scraper = FeedScraper::new(config)?;
    let posts = scraper.run()?;

    report::print_summary(&posts);
    if let Some(path) = &output.posts_path {
        report::write_json(&posts, Path::new(path))?;
        info!("wrote {} posts to {path}", posts.len());
    }

    Ok(())
}
