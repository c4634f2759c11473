use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::browser::BrowserConfig;

const DEFAULT_LOGIN_URL: &str = "https://www.facebook.com";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub account: AccountConfig,

    /// The group feed to scrape.
    pub group_url: String,

    /// Where the login form lives.
    #[serde(default = "default_login_url")]
    pub login_url: String,

    #[serde(default)]
    pub scrape: ScrapeConfig,

    #[serde(default)]
    pub browser: BrowserSettings,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AccountConfig {
    /// Login email. Overridable with FEEDSCRAPE_EMAIL.
    #[serde(default)]
    pub email: String,

    /// Login password. Overridable with FEEDSCRAPE_PASSWORD.
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScrapeConfig {
    /// Scroll / settle / expand cycles to run before extraction.
    #[serde(default = "default_max_scroll_cycles")]
    pub max_scroll_cycles: u32,

    /// Maximum number of posts to extract.
    #[serde(default = "default_max_posts")]
    pub max_posts: usize,

    /// Pause after each scroll so lazy content can render.
    #[serde(default = "default_settle_delay")]
    pub settle_delay_secs: f64,

    /// Pause between "see more" activations so each triggered DOM
    /// mutation can settle.
    #[serde(default = "default_expand_click_delay")]
    pub expand_click_delay_secs: f64,

    /// Timeout for landing-signal waits after login and navigation.
    #[serde(default = "default_wait_timeout")]
    pub wait_timeout_secs: u64,
}

fn default_login_url() -> String {
    DEFAULT_LOGIN_URL.to_string()
}
fn default_max_scroll_cycles() -> u32 {
    5
}
fn default_max_posts() -> usize {
    10
}
fn default_settle_delay() -> f64 {
    2.0
}
fn default_expand_click_delay() -> f64 {
    0.5
}
fn default_wait_timeout() -> u64 {
    10
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_scroll_cycles: default_max_scroll_cycles(),
            max_posts: default_max_posts(),
            settle_delay_secs: default_settle_delay(),
            expand_click_delay_secs: default_expand_click_delay(),
            wait_timeout_secs: default_wait_timeout(),
        }
    }
}

impl ScrapeConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs_f64(self.settle_delay_secs)
    }

    pub fn expand_click_delay(&self) -> Duration {
        Duration::from_secs_f64(self.expand_click_delay_secs)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrowserSettings {
    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default = "default_true")]
    pub disable_images: bool,

    #[serde(default = "default_window_width")]
    pub window_width: u32,

    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// Override the default user agent.
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_true() -> bool {
    true
}
fn default_window_width() -> u32 {
    1920
}
fn default_window_height() -> u32 {
    1080
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            disable_images: true,
            window_width: default_window_width(),
            window_height: default_window_height(),
            user_agent: None,
        }
    }
}

impl BrowserSettings {
    /// Map the file settings onto a launchable browser configuration.
    pub fn browser_config(&self) -> BrowserConfig {
        let mut config = BrowserConfig::default();
        config.headless = self.headless;
        config.disable_images = self.disable_images;
        config.window_size = (self.window_width, self.window_height);
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = Some(user_agent.clone());
        }
        config
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct OutputConfig {
    /// Snapshot the fully-loaded page HTML to this file before extraction.
    #[serde(default)]
    pub page_source_path: Option<String>,

    /// Write the extracted posts as JSON to this file.
    #[serde(default)]
    pub posts_path: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {0}: {1}")]
    Read(String, String),

    #[error("could not parse {0}: {1}")]
    Parse(String, String),

    #[error("missing required setting: {0}")]
    MissingField(&'static str),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

impl Config {
    /// Load from a TOML file, apply environment overrides for the
    /// credentials, and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.display().to_string(), e.to_string()))?;
        let mut config = Self::parse(path.display().to_string(), &content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn parse(origin: String, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(origin, e.to_string()))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(email) = env::var("FEEDSCRAPE_EMAIL") {
            self.account.email = email;
        }
        if let Ok(password) = env::var("FEEDSCRAPE_PASSWORD") {
            self.account.password = password;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.account.email.is_empty() {
            return Err(ConfigError::MissingField("account.email"));
        }
        if self.account.password.is_empty() {
            return Err(ConfigError::MissingField("account.password"));
        }
        if self.group_url.is_empty() {
            return Err(ConfigError::MissingField("group_url"));
        }
        if self.scrape.settle_delay_secs < 0.0 {
            return Err(ConfigError::InvalidValue(
                "scrape.settle_delay_secs",
                self.scrape.settle_delay_secs.to_string(),
            ));
        }
        if self.scrape.expand_click_delay_secs < 0.0 {
            return Err(ConfigError::InvalidValue(
                "scrape.expand_click_delay_secs",
                self.scrape.expand_click_delay_secs.to_string(),
            ));
        }
        Ok(())
    }
}
