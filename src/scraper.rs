//! Top-level orchestration of one scrape run: login, navigate, load,
//! extract.

use std::fs;

use log::{info, warn};

use crate::browser::{BrowserError, FeedSession};
use crate::config::Config;
use crate::dom::DomError;
use crate::extract::{extract, selectors, ProgressiveLoader};
use crate::metrics::ScrapeMetrics;
use crate::models::PostRecord;

/// Fatal, session-level failures. Everything below the post level is
/// absorbed inside the pipeline and never reaches this type.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("session error: {0}")]
    Session(#[from] DomError),
}

/// Owns the browsing session for the duration of one run.
///
/// The session is acquired in [`FeedScraper::new`] and torn down when the
/// scraper is dropped, on the success path and on every early return,
/// including login failing partway through.
pub struct FeedScraper {
    session: FeedSession,
    config: Config,
}

impl FeedScraper {
    pub fn new(config: Config) -> Result<Self, ScrapeError> {
        let session = FeedSession::open(config.browser.browser_config())?;
        Ok(Self { session, config })
    }

    /// Authenticate the session: fill the login form, submit, and wait for
    /// the logged-in landing signal.
    pub fn login(&self) -> Result<(), ScrapeError> {
        info!("logging in at {}", self.config.login_url);
        self.session.navigate(&self.config.login_url)?;

        let timeout = self.config.scrape.wait_timeout();
        self.session
            .wait_until_present(&selectors::LOGIN_EMAIL, timeout)
            .map_err(|e| ScrapeError::Authentication(format!("login form never appeared: {e}")))?;
        self.session
            .type_into(&selectors::LOGIN_EMAIL, &self.config.account.email)
            .map_err(|e| ScrapeError::Authentication(e.to_string()))?;
        self.session
            .type_into(&selectors::LOGIN_PASSWORD, &self.config.account.password)
            .map_err(|e| ScrapeError::Authentication(e.to_string()))?;
        self.session
            .press_enter()
            .map_err(|e| ScrapeError::Authentication(e.to_string()))?;
        self.session
            .wait_until_present(&selectors::LOGGED_IN_BANNER, timeout)
            .map_err(|e| {
                ScrapeError::Authentication(format!("no landing signal after submit: {e}"))
            })?;

        info!("login successful");
        Ok(())
    }

    /// Load the group feed and wait for its main content to render.
    pub fn navigate_to_group(&self) -> Result<(), ScrapeError> {
        info!("navigating to {}", self.config.group_url);
        self.session
            .navigate(&self.config.group_url)
            .map_err(|e| ScrapeError::Navigation(e.to_string()))?;
        self.session
            .wait_until_present(
                &selectors::MAIN_CONTENT,
                self.config.scrape.wait_timeout(),
            )
            .map_err(|e| ScrapeError::Navigation(format!("group page did not load: {e}")))?;

        info!("group feed loaded");
        Ok(())
    }

    /// Run the whole scrape: login, navigate, progressive load, optional
    /// page-source snapshot, extraction. Logs a phase summary regardless
    /// of outcome.
    pub fn run(&self) -> Result<Vec<PostRecord>, ScrapeError> {
        let mut metrics = ScrapeMetrics::new();
        let result = self.run_phases(&mut metrics);
        if let Ok(posts) = &result {
            metrics.set_posts_extracted(posts.len());
        }
        metrics.log_summary();
        result
    }

    fn run_phases(&self, metrics: &mut ScrapeMetrics) -> Result<Vec<PostRecord>, ScrapeError> {
        metrics.timed("login", || self.login())?;
        metrics.timed("navigation", || self.navigate_to_group())?;

        metrics.timed("loading", || -> Result<(), ScrapeError> {
            let scrape = &self.config.scrape;
            ProgressiveLoader::new(
                scrape.max_scroll_cycles,
                scrape.settle_delay(),
                scrape.expand_click_delay(),
            )
            .load(&self.session);
            Ok(())
        })?;

        if let Some(path) = &self.config.output.page_source_path {
            self.save_page_source(path);
        }

        let posts = metrics.timed("extraction", || {
            extract(&self.session, self.config.scrape.max_posts)
        })?;
        Ok(posts)
    }

    /// Snapshot the fully-loaded page HTML. Best-effort: a failure is
    /// logged and the run continues.
    fn save_page_source(&self, path: &str) {
        match self.session.page_source() {
            Ok(html) => match fs::write(path, html) {
                Ok(()) => info!("page source saved to {path}"),
                Err(e) => warn!("could not save page source to {path}: {e}"),
            },
            Err(e) => warn!("could not capture page source: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_errors_become_session_errors() {
        let err = ScrapeError::from(DomError::Script("boom".to_string()));
        assert!(matches!(err, ScrapeError::Session(_)));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_browser_errors_pass_through_transparently() {
        let err = ScrapeError::from(BrowserError::Timeout("css `div`".to_string()));
        assert_eq!(err.to_string(), "timeout waiting for: css `div`");
    }
}
