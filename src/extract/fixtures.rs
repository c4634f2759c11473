//! Fixture DOM for pipeline tests: implements the `dom` traits over a
//! parsed HTML document so resolver, loader, and extractor run against
//! real CSS-selector semantics without a browser.
//!
//! Elements are identified by their `id` attribute for fault injection:
//! `mark_stale` makes every access to that element fail like an
//! invalidated live reference, `fail_click` makes its activation throw.
//! XPath locators are not emulated; fixtures use CSS chains.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};

use crate::dom::{DomElement, DomError, DomSession, Locator};

#[derive(Debug, Default)]
pub struct PageState {
    /// Scripts passed to `run_script`, in order.
    pub scripts: Vec<String>,
    /// `id` attributes of successfully clicked elements, in order.
    pub clicked: Vec<String>,
    pub failing_clicks: HashSet<String>,
    pub stale_markers: HashSet<String>,
}

pub struct FakePage {
    doc: Rc<Html>,
    state: Rc<RefCell<PageState>>,
}

impl FakePage {
    pub fn new(html: &str) -> Self {
        Self {
            doc: Rc::new(Html::parse_document(html)),
            state: Rc::new(RefCell::new(PageState::default())),
        }
    }

    pub fn state(&self) -> Rc<RefCell<PageState>> {
        Rc::clone(&self.state)
    }

    /// Make every subsequent access to the element with this `id` fail
    /// with a stale-reference error.
    pub fn mark_stale(&self, marker: &str) {
        self.state
            .borrow_mut()
            .stale_markers
            .insert(marker.to_string());
    }

    /// Make clicking the element with this `id` throw.
    pub fn fail_click(&self, marker: &str) {
        self.state
            .borrow_mut()
            .failing_clicks
            .insert(marker.to_string());
    }

    fn element(&self, id: NodeId) -> FakeElement {
        FakeElement {
            doc: Rc::clone(&self.doc),
            state: Rc::clone(&self.state),
            id,
        }
    }
}

impl DomSession for FakePage {
    type Element = FakeElement;

    fn find_all(&self, locator: &Locator) -> Result<Vec<FakeElement>, DomError> {
        let matches = select_within(self.doc.root_element(), locator)?;
        Ok(matches.into_iter().map(|id| self.element(id)).collect())
    }

    fn run_script(&self, script: &str) -> Result<(), DomError> {
        self.state.borrow_mut().scripts.push(script.to_string());
        Ok(())
    }
}

pub struct FakeElement {
    doc: Rc<Html>,
    state: Rc<RefCell<PageState>>,
    id: NodeId,
}

impl FakeElement {
    fn resolve(&self) -> Result<ElementRef<'_>, DomError> {
        let node = self
            .doc
            .tree
            .get(self.id)
            .ok_or_else(|| DomError::Stale("node no longer in the tree".to_string()))?;
        let element = ElementRef::wrap(node)
            .ok_or_else(|| DomError::Driver("node is not an element".to_string()))?;
        if let Some(marker) = element.value().attr("id") {
            if self.state.borrow().stale_markers.contains(marker) {
                return Err(DomError::Stale(marker.to_string()));
            }
        }
        Ok(element)
    }

    fn marker(element: ElementRef<'_>) -> String {
        element.value().attr("id").unwrap_or_default().to_string()
    }
}

impl DomElement for FakeElement {
    fn find_all(&self, locator: &Locator) -> Result<Vec<Self>, DomError> {
        let scope = self.resolve()?;
        let matches = select_within(scope, locator)?;
        Ok(matches
            .into_iter()
            .map(|id| FakeElement {
                doc: Rc::clone(&self.doc),
                state: Rc::clone(&self.state),
                id,
            })
            .collect())
    }

    fn text(&self) -> Result<String, DomError> {
        Ok(self.resolve()?.text().collect())
    }

    fn click(&self) -> Result<(), DomError> {
        let marker = Self::marker(self.resolve()?);
        let mut state = self.state.borrow_mut();
        if state.failing_clicks.contains(&marker) {
            return Err(DomError::Stale(format!(
                "element {marker} went stale mid-activation"
            )));
        }
        state.clicked.push(marker);
        Ok(())
    }
}

fn select_within(scope: ElementRef<'_>, locator: &Locator) -> Result<Vec<NodeId>, DomError> {
    match locator {
        Locator::Css(css) => {
            let selector = Selector::parse(css)
                .map_err(|e| DomError::Driver(format!("invalid selector {css}: {e}")))?;
            Ok(scope.select(&selector).map(|m| m.id()).collect())
        }
        Locator::XPath(_) => Ok(Vec::new()),
    }
}
