//! The slice of a live browsing session that the extraction pipeline
//! depends on.
//!
//! The scraping components never hold the browser driver directly; they are
//! generic over these traits so they can be exercised against a fixture DOM
//! in tests. The real implementation lives in [`crate::browser::session`].

use std::fmt;

/// A single query expression scoped to whatever element it is issued
/// against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// CSS selector, matched against descendants of the scope.
    Css(&'static str),
    /// XPath expression. Only used where CSS cannot express the query
    /// (text-content matching).
    XPath(&'static str),
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(css) => write!(f, "css `{css}`"),
            Locator::XPath(xpath) => write!(f, "xpath `{xpath}`"),
        }
    }
}

/// Errors surfaced by DOM operations, split by kind so each layer of the
/// pipeline can absorb exactly the kinds it owns: misses stay inside the
/// resolver, staleness is converted into a per-post skip, everything else
/// is a session-level failure.
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("no element matched {0}")]
    NotFound(String),

    /// The element reference was invalidated by a DOM mutation after it
    /// was handed out.
    #[error("stale element reference: {0}")]
    Stale(String),

    #[error("script execution failed: {0}")]
    Script(String),

    #[error("timed out waiting for {0}")]
    Timeout(String),

    #[error("driver error: {0}")]
    Driver(String),
}

/// Document-level handle to the browsing session.
pub trait DomSession {
    type Element: DomElement;

    /// Query the whole document for every element matching `locator`.
    /// A query that matches nothing returns an empty list, not an error.
    fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Element>, DomError>;

    /// Execute a script in page context, discarding its result.
    fn run_script(&self, script: &str) -> Result<(), DomError>;
}

/// A handle to one DOM element. Valid only until the next DOM mutation;
/// operations on an expired handle fail with [`DomError::Stale`].
pub trait DomElement: Sized {
    /// Query the element's descendants for every match of `locator`.
    fn find_all(&self, locator: &Locator) -> Result<Vec<Self>, DomError>;

    /// The element's rendered text.
    fn text(&self) -> Result<String, DomError>;

    /// Synthetically activate the element.
    fn click(&self) -> Result<(), DomError>;
}
