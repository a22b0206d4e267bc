//! Time-bounded memoisation of encyclopedia lookups.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::debug;

use super::{Encyclopedia, LanguageLinks, LookupError};
use crate::domain::Article;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    Search { language: String, query: String },
    Article { language: String, title: String },
    Links { language: String, title: String },
    Canonical { language: String, title: String },
}

#[derive(Debug, Clone)]
enum CachedValue {
    Titles(Vec<String>),
    Article(Article),
    Links(LanguageLinks),
    Title(String),
}

/// Wraps an `Encyclopedia`, reusing successful results for `ttl`.
///
/// Failures are never cached. A zero TTL disables caching.
pub struct CachedEncyclopedia<E> {
    inner: E,
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, (Instant, CachedValue)>>,
}

impl<E: Encyclopedia> CachedEncyclopedia<E> {
    /// Wrap `inner` with a cache of the given lifetime
    pub fn new(inner: E, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The wrapped encyclopedia
    pub fn inner(&self) -> &E {
        &self.inner
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .map(|entries| {
                entries
                    .values()
                    .filter(|(stored, _)| now.duration_since(*stored) < self.ttl)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Whether the cache holds no live entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &CacheKey) -> Option<CachedValue> {
        if self.ttl.is_zero() {
            return None;
        }

        let mut entries = self.entries.lock().ok()?;
        match entries.get(key) {
            Some((stored, value)) if stored.elapsed() < self.ttl => {
                debug!(?key, "Cache hit");
                Some(value.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn put(&self, key: CacheKey, value: CachedValue) {
        if self.ttl.is_zero() {
            return;
        }

        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key, (Instant::now(), value));
        }
    }
}

#[async_trait]
impl<E: Encyclopedia> Encyclopedia for CachedEncyclopedia<E> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn search(&self, query: &str, language: &str) -> Result<Vec<String>, LookupError> {
        let key = CacheKey::Search {
            language: language.to_string(),
            query: query.to_string(),
        };
        if let Some(CachedValue::Titles(titles)) = self.get(&key) {
            return Ok(titles);
        }

        let titles = self.inner.search(query, language).await?;
        self.put(key, CachedValue::Titles(titles.clone()));
        Ok(titles)
    }

    async fn fetch_article(&self, title: &str, language: &str) -> Result<Article, LookupError> {
        let key = CacheKey::Article {
            language: language.to_string(),
            title: title.to_string(),
        };
        if let Some(CachedValue::Article(article)) = self.get(&key) {
            return Ok(article);
        }

        let article = self.inner.fetch_article(title, language).await?;
        self.put(key, CachedValue::Article(article.clone()));
        Ok(article)
    }

    async fn canonical_title(&self, title: &str, language: &str) -> Result<String, LookupError> {
        let key = CacheKey::Canonical {
            language: language.to_string(),
            title: title.to_string(),
        };
        if let Some(CachedValue::Title(canonical)) = self.get(&key) {
            return Ok(canonical);
        }

        let canonical = self.inner.canonical_title(title, language).await?;
        self.put(key, CachedValue::Title(canonical.clone()));
        Ok(canonical)
    }

    async fn language_links(
        &self,
        title: &str,
        language: &str,
    ) -> Result<LanguageLinks, LookupError> {
        let key = CacheKey::Links {
            language: language.to_string(),
            title: title.to_string(),
        };
        if let Some(CachedValue::Links(links)) = self.get(&key) {
            return Ok(links);
        }

        let links = self.inner.language_links(title, language).await?;
        self.put(key, CachedValue::Links(links.clone()));
        Ok(links)
    }
}
