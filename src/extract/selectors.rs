//! Locator chains for the group feed DOM.
//!
//! The feed markup uses auto-generated structural class names that change
//! across releases and experiments, so every field carries several
//! independently plausible locators, raced in priority order by the
//! resolver. First non-empty match wins.

use crate::dom::Locator;

/// One rendered feed post.
pub const POST_CONTAINER: Locator = Locator::Css("div[role='article']");

/// Login form fields.
pub const LOGIN_EMAIL: Locator = Locator::Css("#email");
pub const LOGIN_PASSWORD: Locator = Locator::Css("#pass");

/// Landing signal that the session is authenticated.
pub const LOGGED_IN_BANNER: Locator = Locator::Css("div[role='banner']");

/// Landing signal that the group page finished its initial render.
pub const MAIN_CONTENT: Locator = Locator::Css("div[role='main']");

pub const AUTHOR: &[Locator] = &[
    Locator::Css("h3 span a"),
    Locator::Css("h4 span a"),
    Locator::Css("strong a"),
    Locator::Css("span[class*='x3nfvp2'] a"),
    Locator::Css("span[class*='x1i10hfl'] a"),
];

pub const CONTENT: &[Locator] = &[
    Locator::Css("div[data-ad-preview='message']"),
    Locator::Css("div[class*='xdj266r']"),
    Locator::Css("div[class*='x1iorvi4']"),
    Locator::Css("div[class*='x1lliihq']"),
];

pub const TIMESTAMP: &[Locator] = &[
    Locator::Css("span[class*='x4k7w5x']"),
    Locator::Css("span[class*='x1i10hfl'][class*='xjbqb8w']"),
    Locator::Css("a[class*='x1i10hfl'][class*='xjbqb8w']"),
];

/// Engagement counters. Unlike the chains above, the first strategy that
/// matches a non-empty list supplies all three counter slots positionally
/// (likes, comments, shares).
pub const ENGAGEMENT: &[Locator] = &[
    Locator::Css("span[class*='x193iq5w']"),
    Locator::Css("span[class*='x1lliihq']"),
];

/// "See more" style affordances that reveal truncated post content.
pub const EXPAND_AFFORDANCES: &[Locator] =
    &[Locator::XPath("//div[contains(text(), 'See more')]")];
