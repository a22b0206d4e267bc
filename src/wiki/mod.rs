//! Encyclopedia access.
//!
//! The `Encyclopedia` trait is the seam between the CLI and the remote
//! content source. `MediaWikiClient` talks to the Wikipedia API and
//! `CachedEncyclopedia` memoises any implementation for a fixed TTL.

pub mod cache;
pub mod mediawiki;

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Article;

pub use cache::CachedEncyclopedia;
pub use mediawiki::MediaWikiClient;

/// Language code -> article title in that language
pub type LanguageLinks = BTreeMap<String, String>;

/// Lookup failures
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("No article found for '{0}'")]
    NotFound(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("HTTP error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response from encyclopedia: {0}")]
    InvalidResponse(String),
}

/// A searchable source of articles
#[async_trait]
pub trait Encyclopedia: Send + Sync {
    /// Human-readable source name
    fn name(&self) -> &str;

    /// Titles of articles matching `query`, best first
    async fn search(&self, query: &str, language: &str) -> Result<Vec<String>, LookupError>;

    /// Summary and full text of the article with this exact title
    async fn fetch_article(&self, title: &str, language: &str) -> Result<Article, LookupError>;

    /// Canonical title for `title`, following redirects and normalisation
    async fn canonical_title(&self, title: &str, language: &str) -> Result<String, LookupError> {
        Ok(self.fetch_article(title, language).await?.title)
    }

    /// Titles of this article in other languages, including `language` itself
    async fn language_links(
        &self,
        title: &str,
        language: &str,
    ) -> Result<LanguageLinks, LookupError>;

    /// Fetch the best-matching article for a free-text query
    async fn fetch_best_match(&self, query: &str, language: &str) -> Result<Article, LookupError> {
        let hits = self.search(query, language).await?;
        let best = hits
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::NotFound(query.to_string()))?;

        self.fetch_article(&best, language).await
    }
}
