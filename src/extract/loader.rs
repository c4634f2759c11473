//! Progressive content loading: force lazy-rendered posts into the DOM
//! before extraction starts.

use std::thread;
use std::time::Duration;

use log::{debug, warn};

use crate::dom::{DomElement, DomSession, Locator};
use crate::extract::selectors;

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Drives repeated scroll / settle / expand cycles against the live page.
///
/// The loop is best-effort content maximization: every failure inside a
/// cycle is logged and absorbed, and the only terminal condition is the
/// cycle budget running out.
pub struct ProgressiveLoader {
    max_cycles: u32,
    settle_delay: Duration,
    expand_click_delay: Duration,
    affordances: &'static [Locator],
}

impl ProgressiveLoader {
    pub fn new(max_cycles: u32, settle_delay: Duration, expand_click_delay: Duration) -> Self {
        Self {
            max_cycles,
            settle_delay,
            expand_click_delay,
            affordances: selectors::EXPAND_AFFORDANCES,
        }
    }

    /// Override the affordance chain used to find truncated-content
    /// elements.
    pub fn with_affordances(mut self, affordances: &'static [Locator]) -> Self {
        self.affordances = affordances;
        self
    }

    /// Run the scroll / settle / expand loop for the configured number of
    /// cycles. Mutates the page as a side effect; never fails.
    pub fn load<S: DomSession>(&self, session: &S) {
        for cycle in 1..=self.max_cycles {
            debug!("load cycle {}/{}", cycle, self.max_cycles);
            if let Err(e) = session.run_script(SCROLL_TO_BOTTOM) {
                warn!("scroll command failed on cycle {cycle}: {e}");
            }
            thread::sleep(self.settle_delay);
            self.expand_collapsed(session);
        }
    }

    /// Click every truncated-content affordance currently in the DOM,
    /// pausing between activations so each triggered mutation can settle.
    fn expand_collapsed<S: DomSession>(&self, session: &S) {
        let mut affordances = Vec::new();
        for locator in self.affordances {
            match session.find_all(locator) {
                Ok(matches) if !matches.is_empty() => {
                    affordances = matches;
                    break;
                }
                Ok(_) => {}
                Err(e) => warn!("affordance query {locator} failed: {e}"),
            }
        }

        if affordances.is_empty() {
            return;
        }

        debug!("expanding {} collapsed posts", affordances.len());
        for affordance in &affordances {
            if let Err(e) = affordance.click() {
                warn!("could not expand collapsed post: {e}");
            }
            thread::sleep(self.expand_click_delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::fixtures::FakePage;

    const SEE_MORE: &[Locator] = &[Locator::Css("div.see-more")];

    const PAGE: &str = r#"
        <div role="main">
            <div class="see-more" id="m1">See more</div>
            <div class="see-more" id="m2">See more</div>
        </div>
    "#;

    fn loader(max_cycles: u32) -> ProgressiveLoader {
        ProgressiveLoader::new(max_cycles, Duration::ZERO, Duration::ZERO)
            .with_affordances(SEE_MORE)
    }

    #[test]
    fn test_runs_the_full_cycle_budget() {
        let page = FakePage::new(PAGE);
        loader(3).load(&page);

        let state = page.state();
        let state = state.borrow();
        assert_eq!(state.scripts.len(), 3);
        assert!(state.scripts.iter().all(|s| s.contains("scrollTo")));
        assert_eq!(state.clicked, vec!["m1", "m2", "m1", "m2", "m1", "m2"]);
    }

    #[test]
    fn test_zero_cycles_touches_nothing() {
        let page = FakePage::new(PAGE);
        loader(0).load(&page);

        let state = page.state();
        assert!(state.borrow().scripts.is_empty());
        assert!(state.borrow().clicked.is_empty());
    }

    #[test]
    fn test_failed_activation_does_not_stop_the_cycle() {
        let page = FakePage::new(PAGE);
        page.fail_click("m1");
        loader(2).load(&page);

        let state = page.state();
        let state = state.borrow();
        // m1 raises on every attempt; m2 is still activated each cycle and
        // the loop runs to its budget.
        assert_eq!(state.clicked, vec!["m2", "m2"]);
        assert_eq!(state.scripts.len(), 2);
    }

    #[test]
    fn test_no_affordances_is_a_quiet_cycle() {
        let page = FakePage::new(r#"<div role="main"></div>"#);
        loader(2).load(&page);

        let state = page.state();
        assert_eq!(state.borrow().scripts.len(), 2);
        assert!(state.borrow().clicked.is_empty());
    }
}
