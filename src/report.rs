//! Output sinks for a finished scrape: console summary and JSON export.

use std::fs;
use std::path::Path;

use crate::models::PostRecord;

const CONTENT_PREVIEW_CHARS: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("could not serialize posts: {0}")]
    Serialize(String),

    #[error("could not write {0}: {1}")]
    Write(String, String),
}

/// Print a human-readable summary of the batch to stdout.
pub fn print_summary(posts: &[PostRecord]) {
    println!("Scraped {} posts from the group feed.", posts.len());
    for post in posts {
        println!("Author: {}", post.author);
        println!("Content: {}...", preview(&post.content, CONTENT_PREVIEW_CHARS));
        println!("Timestamp: {}", post.timestamp);
        println!(
            "Likes: {}, Comments: {}, Shares: {}",
            post.likes, post.comments, post.shares
        );
        println!("{}", "-".repeat(50));
    }
}

/// Write the batch as pretty-printed JSON.
pub fn write_json(posts: &[PostRecord], path: &Path) -> Result<(), ReportError> {
    let json =
        serde_json::to_string_pretty(posts).map_err(|e| ReportError::Serialize(e.to_string()))?;
    fs::write(path, json)
        .map_err(|e| ReportError::Write(path.display().to_string(), e.to_string()))
}

/// At most `max` characters of `text`, cut on a character boundary.
fn preview(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_is_untouched() {
        assert_eq!(preview("short post", 100), "short post");
    }

    #[test]
    fn test_preview_cuts_at_character_boundary() {
        // multibyte content must not be split mid-character
        let text = "日本語のテキスト";
        assert_eq!(preview(text, 3), "日本語");
    }

    #[test]
    fn test_posts_serialize_with_all_fields() {
        let posts = vec![PostRecord {
            author: "Ada".to_string(),
            content: "Hello".to_string(),
            timestamp: "2 hrs".to_string(),
            likes: "1".to_string(),
            comments: "N/A".to_string(),
            shares: "N/A".to_string(),
        }];
        let json = serde_json::to_string_pretty(&posts).unwrap();
        assert!(json.contains("\"author\": \"Ada\""));
        assert!(json.contains("\"comments\": \"N/A\""));
    }
}
