//! Browser automation: the live session the extraction pipeline drives.
//!
//! Built on headless Chrome. [`BrowserManager`] launches the browser,
//! [`FeedSession`] wraps the single tab a scrape runs in and implements
//! the [`crate::dom`] traits the pipeline is generic over.
//!
//! # Example
//!
//! ```no_run
//! use feedscrape::browser::{BrowserConfig, FeedSession};
//! use feedscrape::dom::Locator;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let session = FeedSession::open(BrowserConfig::default())?;
//! session.navigate("https://example.com")?;
//! session.wait_until_present(&Locator::Css("h1"), Duration::from_secs(10))?;
//! println!("{} bytes of page source", session.page_source()?.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod manager;
pub mod session;

pub use config::BrowserConfig;
pub use manager::{BrowserError, BrowserManager};
pub use session::FeedSession;
