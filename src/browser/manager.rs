use std::ffi::OsStr;
use std::sync::Arc;

use headless_chrome::{Browser, LaunchOptions, Tab};

use super::config::BrowserConfig;

/// Launches the browser process and hands out tabs.
///
/// Dropping the manager (and every tab cloned from it) terminates the
/// browser process; ownership of the manager is how session teardown is
/// guaranteed on every exit path.
pub struct BrowserManager {
    browser: Arc<Browser>,
    config: BrowserConfig,
}

impl BrowserManager {
    /// Launch a browser with the given configuration.
    pub fn new(config: BrowserConfig) -> Result<Self, BrowserError> {
        // Owned flag strings first; LaunchOptions borrows them as &OsStr.
        let mut flags: Vec<String> = config.chrome_flags.clone();
        if config.disable_images {
            flags.push("--blink-settings=imagesEnabled=false".to_string());
        }
        if let Some(user_agent) = &config.user_agent {
            flags.push(format!("--user-agent={user_agent}"));
        }
        let args: Vec<&OsStr> = flags.iter().map(OsStr::new).collect();

        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some(config.window_size))
            .args(args)
            .build()
            .map_err(|e| BrowserError::ConfigurationError(e.to_string()))?;

        let browser =
            Browser::new(options).map_err(|e| BrowserError::InitializationError(e.to_string()))?;

        Ok(Self {
            browser: Arc::new(browser),
            config,
        })
    }

    /// Open a new tab.
    pub fn new_tab(&self) -> Result<Arc<Tab>, BrowserError> {
        self.browser
            .new_tab()
            .map_err(|e| BrowserError::TabCreationError(e.to_string()))
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }
}

/// Errors from driving the browser at the session level. Element-level
/// failures are [`crate::dom::DomError`] instead.
#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("browser initialization failed: {0}")]
    InitializationError(String),

    #[error("browser configuration error: {0}")]
    ConfigurationError(String),

    #[error("tab creation failed: {0}")]
    TabCreationError(String),

    #[error("navigation error: {0}")]
    NavigationError(String),

    #[error("timeout waiting for: {0}")]
    Timeout(String),

    #[error("input error: {0}")]
    InputError(String),

    #[error("page source extraction error: {0}")]
    PageSourceError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires Chrome to be installed
    fn test_browser_manager_creation() {
        let manager = BrowserManager::new(BrowserConfig::default()).unwrap();
        assert!(manager.new_tab().is_ok());
    }

    #[test]
    fn test_error_display_carries_cause() {
        let err = BrowserError::NavigationError("dns failure".to_string());
        assert!(err.to_string().contains("dns failure"));
    }
}
