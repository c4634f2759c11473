//! Post record extraction: scan rendered post containers and resolve each
//! field through its locator chain, isolating per-post failures.

use log::{error, info};

use crate::dom::{DomElement, DomError, DomSession};
use crate::extract::resolver::{resolve_list, resolve_text};
use crate::extract::selectors;
use crate::models::PostRecord;

/// Placeholder for an engagement counter slot the matched list did not
/// cover.
const UNAVAILABLE: &str = "N/A";

/// Scan the page for post containers and extract up to `max_posts` records
/// in encounter order.
///
/// A failure while processing one container (typically the reference going
/// stale mid-extraction) drops that single post and the batch continues;
/// only a failure of the initial container query surfaces as `Err`.
pub fn extract<S: DomSession>(
    session: &S,
    max_posts: usize,
) -> Result<Vec<PostRecord>, DomError> {
    let containers = session.find_all(&selectors::POST_CONTAINER)?;
    let total = containers.len().min(max_posts);
    info!(
        "found {} post containers, extracting {}",
        containers.len(),
        total
    );

    let mut records = Vec::with_capacity(total);
    for (index, container) in containers.into_iter().take(max_posts).enumerate() {
        match extract_record(&container) {
            Ok(record) => {
                info!("extracted post {}/{} by {}", index + 1, total, record.author);
                records.push(record);
            }
            Err(e) => error!("skipping post {}: {e}", index + 1),
        }
    }
    Ok(records)
}

/// Resolve every field of one post container.
fn extract_record<E: DomElement>(container: &E) -> Result<PostRecord, DomError> {
    let author = resolve_text(container, selectors::AUTHOR, "Author")?.into_value();
    let content = resolve_text(container, selectors::CONTENT, "Content")?.into_value();
    let timestamp = resolve_text(container, selectors::TIMESTAMP, "Timestamp")?.into_value();
    let (likes, comments, shares) = engagement_triple(container)?;

    Ok(PostRecord {
        author,
        content,
        timestamp,
        likes,
        comments,
        shares,
    })
}

/// Resolve the engagement counters positionally from one matched list.
///
/// The first strategy whose query returns a non-empty list is the sole
/// source for all three slots: position 0 is likes, 1 comments, 2 shares.
/// A position the list does not cover stays `"N/A"`; lists matched by
/// other strategies are never merged in.
fn engagement_triple<E: DomElement>(container: &E) -> Result<(String, String, String), DomError> {
    let mut slots = [
        UNAVAILABLE.to_string(),
        UNAVAILABLE.to_string(),
        UNAVAILABLE.to_string(),
    ];

    if let Some(counters) = resolve_list(container, selectors::ENGAGEMENT)? {
        for (slot, counter) in slots.iter_mut().zip(counters.iter()) {
            *slot = counter.text()?.trim().to_string();
        }
    }

    let [likes, comments, shares] = slots;
    Ok((likes, comments, shares))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::fixtures::FakePage;

    fn full_post(id: &str, author: &str, counters: &[&str]) -> String {
        let counter_spans: String = counters
            .iter()
            .map(|c| format!(r#"<span class="x193iq5w">{c}</span>"#))
            .collect();
        format!(
            r#"<div role="article" id="{id}">
                <h3><span><a>{author}</a></span></h3>
                <div data-ad-preview="message">Post body from {author}.</div>
                <span class="x4k7w5x">2 hrs ago</span>
                {counter_spans}
            </div>"#
        )
    }

    fn feed(posts: &[String]) -> FakePage {
        FakePage::new(&format!(
            r#"<div role="main">{}</div>"#,
            posts.join("\n")
        ))
    }

    #[test]
    fn test_fully_resolvable_feed_has_no_placeholders() {
        let page = feed(&[
            full_post("p1", "Ada", &["12", "3", "1"]),
            full_post("p2", "Grace", &["7", "0", "2"]),
            full_post("p3", "Edsger", &["99", "40", "8"]),
        ]);

        let records = extract(&page, 10).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].author, "Ada");
        assert_eq!(records[1].content, "Post body from Grace.");
        assert_eq!(records[2].likes, "99");
        for record in &records {
            assert!(!record.author.starts_with("Unknown"));
            assert!(!record.content.starts_with("Unknown"));
            assert!(!record.timestamp.starts_with("Unknown"));
            assert_ne!(record.likes, "N/A");
            assert_ne!(record.comments, "N/A");
            assert_ne!(record.shares, "N/A");
        }
    }

    #[test]
    fn test_missing_author_chain_yields_placeholder_only_there() {
        let anonymous = r#"<div role="article" id="p1">
            <div data-ad-preview="message">Who wrote this?</div>
            <span class="x4k7w5x">Yesterday</span>
        </div>"#
            .to_string();
        let page = feed(&[anonymous]);

        let records = extract(&page, 10).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].author, "Unknown Author");
        assert_eq!(records[0].content, "Who wrote this?");
        assert_eq!(records[0].timestamp, "Yesterday");
    }

    #[test]
    fn test_max_posts_truncates_in_encounter_order() {
        let page = feed(&[
            full_post("p1", "First", &[]),
            full_post("p2", "Second", &[]),
            full_post("p3", "Third", &[]),
            full_post("p4", "Fourth", &[]),
            full_post("p5", "Fifth", &[]),
        ]);

        let records = extract(&page, 2).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].author, "First");
        assert_eq!(records[1].author, "Second");
    }

    #[test]
    fn test_engagement_comes_from_first_matching_strategy_only() {
        // No span matches the primary engagement selector; the secondary
        // one matches a 2-element list, which must supply likes and
        // comments and leave shares unavailable.
        let post = r#"<div role="article" id="p1">
            <h3><span><a>Ada</a></span></h3>
            <span class="x1lliihq">12</span>
            <span class="x1lliihq">3</span>
        </div>"#
            .to_string();
        let page = feed(&[post]);

        let records = extract(&page, 10).unwrap();
        assert_eq!(records[0].likes, "12");
        assert_eq!(records[0].comments, "3");
        assert_eq!(records[0].shares, "N/A");
    }

    #[test]
    fn test_no_engagement_match_leaves_all_slots_unavailable() {
        let post = r#"<div role="article" id="p1">
            <h3><span><a>Ada</a></span></h3>
        </div>"#
            .to_string();
        let page = feed(&[post]);

        let records = extract(&page, 10).unwrap();
        assert_eq!(records[0].likes, "N/A");
        assert_eq!(records[0].comments, "N/A");
        assert_eq!(records[0].shares, "N/A");
    }

    #[test]
    fn test_stale_container_is_skipped_not_fatal() {
        let page = feed(&[
            full_post("p1", "Ada", &["1"]),
            full_post("p2", "Grace", &["2"]),
            full_post("p3", "Edsger", &["3"]),
        ]);
        page.mark_stale("p2");

        let records = extract(&page, 10).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].author, "Ada");
        assert_eq!(records[1].author, "Edsger");
    }

    #[test]
    fn test_empty_feed_yields_empty_batch() {
        let page = FakePage::new(r#"<div role="main"></div>"#);
        assert!(extract(&page, 10).unwrap().is_empty());
    }

    #[test]
    fn test_zero_max_posts_extracts_nothing() {
        let page = feed(&[full_post("p1", "Ada", &[])]);
        assert!(extract(&page, 0).unwrap().is_empty());
    }
}
