use serde::{Deserialize, Serialize};

/// One extracted feed post.
///
/// Every field is always populated: a field whose locator chain came up
/// empty carries a readable placeholder (`"Unknown Author"`, `"N/A"`)
/// instead of being absent, so consumers never need null handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub author: String,
    pub content: String,
    pub timestamp: String,
    pub likes: String,
    pub comments: String,
    pub shares: String,
}
