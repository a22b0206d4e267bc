//! Articles fetched from the encyclopedia.
//!
//! An article is never stored by truepedia itself; it is fetched on demand
//! and held in memory. Only highlights referring to it are persisted.

use serde::{Deserialize, Serialize};

/// Placeholder used when the API returns a page without an intro extract
pub const NO_SUMMARY: &str = "No summary available";

/// Placeholder used when the API returns a page without a body extract
pub const NO_CONTENT: &str = "No content available";

/// A fetched encyclopedia article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Article title as requested
    pub title: String,

    /// Language code of the wiki the article came from
    pub language: String,

    /// Plain-text intro section
    pub summary: String,

    /// Full plain-text body, including `== Heading ==` markers
    pub content: String,

    /// Canonical article URL
    pub url: String,
}

impl Article {
    /// Identifier used to key highlights for this article
    pub fn id(&self) -> ArticleId {
        ArticleId::new(&self.title, &self.language)
    }
}

/// Highlight key for an article: `"{title}_{language}"`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(String);

impl ArticleId {
    /// Build the identifier for a title in a given language
    pub fn new(title: &str, language: &str) -> Self {
        Self(format!("{}_{}", title, language))
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArticleId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for ArticleId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for ArticleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Build the canonical article URL for a title.
///
/// Spaces become underscores and the remaining title is percent-encoded
/// as a single path segment.
pub fn article_url(title: &str, language: &str) -> String {
    let base = format!("https://{}.wikipedia.org/wiki/", language);
    let segment = title.replace(' ', "_");

    match reqwest::Url::parse(&base) {
        Ok(mut url) => {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty().push(&segment);
            }
            url.to_string()
        }
        Err(_) => format!("{}{}", base, segment),
    }
}
