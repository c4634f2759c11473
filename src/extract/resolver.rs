//! Ordered-fallback resolution of one field against one scope element.

use log::warn;

use crate::dom::{DomElement, DomError, Locator};

/// Outcome of resolving one field through its locator chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldResult {
    /// Non-empty, trimmed text from the first strategy that matched.
    Found(String),
    /// Every strategy missed; carries the field name for the placeholder.
    NotFound(&'static str),
}

impl FieldResult {
    pub fn is_found(&self) -> bool {
        matches!(self, FieldResult::Found(_))
    }

    /// The field value for the record: the matched text, or the
    /// `"Unknown <Field>"` placeholder.
    pub fn into_value(self) -> String {
        match self {
            FieldResult::Found(text) => text,
            FieldResult::NotFound(field) => format!("Unknown {field}"),
        }
    }
}

/// Try `strategies` in order against `scope`; the first whose query matches
/// at least one element with non-empty trimmed text wins.
///
/// Misses (no element, or only whitespace text) advance to the next
/// strategy. A stale scope or driver failure escapes as `Err` so the caller
/// can isolate the whole post; an exhausted chain is `Ok(NotFound)`, not an
/// error.
pub fn resolve_text<E: DomElement>(
    scope: &E,
    strategies: &[Locator],
    field: &'static str,
) -> Result<FieldResult, DomError> {
    for locator in strategies {
        let matches = match scope.find_all(locator) {
            Ok(matches) => matches,
            Err(DomError::NotFound(_)) => continue,
            Err(e) => return Err(e),
        };
        let Some(first) = matches.first() else {
            continue;
        };
        let text = first.text()?;
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        return Ok(FieldResult::Found(text.to_string()));
    }
    warn!("{field} not found");
    Ok(FieldResult::NotFound(field))
}

/// List-valued sibling of [`resolve_text`]: the first strategy whose query
/// returns a non-empty element list wins and its whole list is returned.
/// `None` when every strategy misses.
pub fn resolve_list<E: DomElement>(
    scope: &E,
    strategies: &[Locator],
) -> Result<Option<Vec<E>>, DomError> {
    for locator in strategies {
        match scope.find_all(locator) {
            Ok(matches) if !matches.is_empty() => return Ok(Some(matches)),
            Ok(_) => continue,
            Err(DomError::NotFound(_)) => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(None)
}
