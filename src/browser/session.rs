//! The live browsing session: one browser, one tab, blocking calls.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use headless_chrome::{Element, Tab};

use super::config::BrowserConfig;
use super::manager::{BrowserError, BrowserManager};
use crate::dom::{DomElement, DomError, DomSession, Locator};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Handle to a live browsing context.
///
/// Owns the browser for its whole lifetime: dropping the session (on any
/// exit path, including a failed login) terminates the browser process
/// exactly once. The extraction pipeline borrows it through the
/// [`DomSession`] trait and never closes it.
pub struct FeedSession {
    manager: BrowserManager,
    tab: Arc<Tab>,
}

impl FeedSession {
    /// Launch a browser and open the tab this session will drive.
    pub fn open(config: BrowserConfig) -> Result<Self, BrowserError> {
        let manager = BrowserManager::new(config)?;
        let tab = manager.new_tab()?;
        Ok(Self { manager, tab })
    }

    /// Load `url` and block until navigation completes.
    pub fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        self.tab
            .navigate_to(url)
            .map_err(|e| BrowserError::NavigationError(format!("failed to navigate to {url}: {e}")))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| BrowserError::NavigationError(format!("navigation timeout for {url}: {e}")))?;
        Ok(())
    }

    /// Block until `locator` matches at least one element, polling the DOM
    /// at a fixed interval, bounded by `timeout`.
    pub fn wait_until_present(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let check = match locator {
            Locator::Css(css) => format!(
                "document.querySelector('{}') !== null",
                escape_single_quotes(css)
            ),
            Locator::XPath(xpath) => format!(
                r#"document.evaluate("{xpath}", document, null, XPathResult.BOOLEAN_TYPE, null).booleanValue"#
            ),
        };

        let start = Instant::now();
        loop {
            if start.elapsed() > timeout {
                return Err(BrowserError::Timeout(locator.to_string()));
            }
            if let Ok(result) = self.tab.evaluate(&check, false) {
                if let Some(value) = result.value {
                    if value.as_bool() == Some(true) {
                        return Ok(());
                    }
                }
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Focus the first element matching `locator` and type `text` into it.
    pub fn type_into(&self, locator: &Locator, text: &str) -> Result<(), BrowserError> {
        let Locator::Css(selector) = locator else {
            return Err(BrowserError::InputError(format!(
                "typing requires a css locator, got {locator}"
            )));
        };
        let field = self
            .tab
            .find_element(selector)
            .map_err(|e| BrowserError::InputError(format!("{locator}: {e}")))?;
        field
            .click()
            .map_err(|e| BrowserError::InputError(format!("could not focus {locator}: {e}")))?;
        self.tab
            .type_str(text)
            .map_err(|e| BrowserError::InputError(format!("typing into {locator} failed: {e}")))?;
        Ok(())
    }

    /// Send the Enter key to the focused element.
    pub fn press_enter(&self) -> Result<(), BrowserError> {
        self.tab
            .press_key("Enter")
            .map_err(|e| BrowserError::InputError(format!("enter key: {e}")))?;
        Ok(())
    }

    /// The full HTML source of the current page.
    pub fn page_source(&self) -> Result<String, BrowserError> {
        self.tab
            .get_content()
            .map_err(|e| BrowserError::PageSourceError(e.to_string()))
    }

    pub fn config(&self) -> &BrowserConfig {
        self.manager.config()
    }
}

impl DomSession for FeedSession {
    type Element = SessionElement;

    fn find_all(&self, locator: &Locator) -> Result<Vec<SessionElement>, DomError> {
        let found = match locator {
            Locator::Css(css) => self.tab.find_elements(css),
            Locator::XPath(xpath) => self.tab.find_elements_by_xpath(xpath),
        };
        match found {
            Ok(elements) => Ok(elements
                .iter()
                .map(|el| SessionElement {
                    tab: Arc::clone(&self.tab),
                    node_id: el.node_id,
                })
                .collect()),
            Err(e) => match classify(e.to_string()) {
                DomError::NotFound(_) => Ok(Vec::new()),
                other => Err(other),
            },
        }
    }

    fn run_script(&self, script: &str) -> Result<(), DomError> {
        self.tab
            .evaluate(script, false)
            .map(|_| ())
            .map_err(|e| DomError::Script(e.to_string()))
    }
}

/// Reference to one live DOM element, held as a node id so it can outlive
/// the driver's borrow-scoped element type. Re-attached on every
/// operation; a node invalidated by a DOM mutation fails with
/// [`DomError::Stale`].
pub struct SessionElement {
    tab: Arc<Tab>,
    node_id: u32,
}

impl SessionElement {
    fn attach(&self) -> Result<Element<'_>, DomError> {
        Element::new(&self.tab, self.node_id).map_err(|e| match classify(e.to_string()) {
            // A node id the driver no longer knows is an expired handle.
            DomError::NotFound(msg) => DomError::Stale(msg),
            other => other,
        })
    }
}

impl DomElement for SessionElement {
    fn find_all(&self, locator: &Locator) -> Result<Vec<Self>, DomError> {
        let element = self.attach()?;
        let found = match locator {
            Locator::Css(css) => element.find_elements(css),
            Locator::XPath(xpath) => element.find_elements_by_xpath(xpath),
        };
        match found {
            Ok(elements) => Ok(elements
                .iter()
                .map(|el| SessionElement {
                    tab: Arc::clone(&self.tab),
                    node_id: el.node_id,
                })
                .collect()),
            Err(e) => match classify(e.to_string()) {
                DomError::NotFound(_) => Ok(Vec::new()),
                other => Err(other),
            },
        }
    }

    fn text(&self) -> Result<String, DomError> {
        self.attach()?
            .get_inner_text()
            .map_err(|e| classify(e.to_string()))
    }

    fn click(&self) -> Result<(), DomError> {
        // Activate in page context rather than through trusted input: a
        // trusted click needs screen coordinates, which shift whenever the
        // feed re-renders mid-scroll.
        self.attach()?
            .call_js_fn("function() { this.click(); }", vec![], false)
            .map(|_| ())
            .map_err(|e| classify(e.to_string()))
    }
}

/// Sort a driver error into a [`DomError`] kind. The driver reports
/// everything as a flat error message, so kinds are recovered from the
/// text: node-id failures mean the handle went stale, "not found" means a
/// query miss.
fn classify(message: String) -> DomError {
    let lower = message.to_lowercase();
    if lower.contains("node") && (lower.contains("not found") || lower.contains("could not find")) {
        DomError::Stale(message)
    } else if lower.contains("no element") || lower.contains("not found") {
        DomError::NotFound(message)
    } else if lower.contains("timeout") || lower.contains("timed out") {
        DomError::Timeout(message)
    } else {
        DomError::Driver(message)
    }
}

fn escape_single_quotes(selector: &str) -> String {
    selector.replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_stale_node_errors() {
        let err = classify("Could not find node with given id".to_string());
        assert!(matches!(err, DomError::Stale(_)));
    }

    #[test]
    fn test_classify_query_misses() {
        let err = classify("No element found for selector".to_string());
        assert!(matches!(err, DomError::NotFound(_)));
    }

    #[test]
    fn test_classify_timeouts() {
        let err = classify("The event waited for timed out".to_string());
        assert!(matches!(err, DomError::Timeout(_)));
    }

    #[test]
    fn test_classify_everything_else_is_driver() {
        let err = classify("websocket connection closed".to_string());
        assert!(matches!(err, DomError::Driver(_)));
    }

    #[test]
    fn test_escape_single_quotes() {
        assert_eq!(
            escape_single_quotes("div[role='main']"),
            "div[role=\\'main\\']"
        );
    }

    #[test]
    #[ignore] // Requires Chrome to be installed
    fn test_basic_navigation() {
        let session = FeedSession::open(BrowserConfig::default()).unwrap();
        assert!(session.navigate("https://example.com").is_ok());
        assert!(session
            .wait_until_present(&Locator::Css("h1"), Duration::from_secs(10))
            .is_ok());
    }
}
