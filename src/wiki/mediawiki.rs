//! MediaWiki API client.
//!
//! Uses the `action=query` endpoint of `https://{lang}.wikipedia.org/w/api.php`
//! for full-text search, plain-text extracts and language links.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use tracing::debug;

use super::{Encyclopedia, LanguageLinks, LookupError};
use crate::config::WikiSettings;
use crate::domain::article::{article_url, NO_CONTENT, NO_SUMMARY};
use crate::domain::{language, Article};

/// MediaWiki reports missing and invalid titles under negative page ids
fn is_missing(page_id: &str) -> bool {
    page_id.starts_with('-')
}

/// Envelope shared by every `action=query` response
#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    query: Option<T>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    info: String,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PagesQuery {
    #[serde(default)]
    pages: BTreeMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    /// Canonical title after normalisation and redirects
    title: Option<String>,
    extract: Option<String>,
    /// Present on pages that are themselves unresolved redirects
    redirect: Option<IgnoredAny>,
    #[serde(default)]
    langlinks: Vec<LangLink>,
}

/// A page resolved from a `prop=extracts` response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extract {
    /// Canonical page title
    pub title: String,
    /// Plain text, `None` when the page has none
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LangLink {
    lang: String,
    #[serde(rename = "*")]
    title: String,
}

/// Wikipedia client over the MediaWiki HTTP API
pub struct MediaWikiClient {
    /// HTTP client
    client: reqwest::Client,
    /// API URL template with a `{lang}` placeholder
    api_url: String,
    /// Maximum number of search hits
    search_limit: usize,
}

impl MediaWikiClient {
    /// Create a client from resolved settings
    pub fn new(settings: &WikiSettings) -> Result<Self, LookupError> {
        Self::with_api_url(&settings.api_url, settings.search_limit, settings.timeout())
    }

    /// Create a client against a custom API URL template
    pub fn with_api_url(
        api_url: impl Into<String>,
        search_limit: usize,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("truepedia/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            search_limit,
        })
    }

    /// Build the API endpoint for a language
    fn endpoint(&self, lang: &str) -> Result<String, LookupError> {
        if !language::is_supported(lang) {
            return Err(LookupError::UnsupportedLanguage(lang.to_string()));
        }
        Ok(self.api_url.replace("{lang}", lang))
    }

    /// Run an `action=query` request and return the raw body
    async fn query(&self, lang: &str, params: &[(&str, String)]) -> Result<String, LookupError> {
        let url = self.endpoint(lang)?;
        debug!(%url, ?params, "MediaWiki query");

        let response = self
            .client
            .get(&url)
            .query(&[("action", "query"), ("format", "json")])
            .query(params)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }

    /// Plain-text extract of a page; `intro_only` limits it to the lead section
    async fn extract(
        &self,
        title: &str,
        lang: &str,
        intro_only: bool,
    ) -> Result<Extract, LookupError> {
        let mut params = vec![
            ("titles", title.to_string()),
            ("redirects", "1".to_string()),
            ("prop", "extracts".to_string()),
            ("explaintext", "1".to_string()),
        ];
        if intro_only {
            params.push(("exintro", "1".to_string()));
        }

        let body = self.query(lang, &params).await?;
        parse_extract(&body, title)?.ok_or_else(|| LookupError::NotFound(title.to_string()))
    }
}

#[async_trait]
impl Encyclopedia for MediaWikiClient {
    fn name(&self) -> &str {
        "wikipedia"
    }

    async fn search(&self, query: &str, lang: &str) -> Result<Vec<String>, LookupError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let params = [
            ("list", "search".to_string()),
            ("srsearch", query.to_string()),
            ("srlimit", self.search_limit.to_string()),
        ];

        let body = self.query(lang, &params).await?;
        parse_search(&body)
    }

    async fn fetch_article(&self, title: &str, lang: &str) -> Result<Article, LookupError> {
        if title.trim().is_empty() {
            return Err(LookupError::NotFound(title.to_string()));
        }

        let summary = self.extract(title, lang, true).await?;
        if summary.title != title {
            debug!(requested = title, resolved = %summary.title, "Title resolved");
        }
        let content = self.extract(&summary.title, lang, false).await?;

        Ok(Article {
            url: article_url(&summary.title, lang),
            title: summary.title,
            language: lang.to_string(),
            summary: summary.text.unwrap_or_else(|| NO_SUMMARY.to_string()),
            content: content.text.unwrap_or_else(|| NO_CONTENT.to_string()),
        })
    }

    async fn canonical_title(&self, title: &str, lang: &str) -> Result<String, LookupError> {
        if title.trim().is_empty() {
            return Err(LookupError::NotFound(title.to_string()));
        }

        let params = [("titles", title.to_string()), ("redirects", "1".to_string())];
        let body = self.query(lang, &params).await?;
        parse_canonical_title(&body)?.ok_or_else(|| LookupError::NotFound(title.to_string()))
    }

    async fn language_links(&self, title: &str, lang: &str) -> Result<LanguageLinks, LookupError> {
        let params = [
            ("titles", title.to_string()),
            ("redirects", "1".to_string()),
            ("prop", "langlinks".to_string()),
            ("lllimit", "500".to_string()),
        ];

        let body = self.query(lang, &params).await?;
        parse_language_links(&body, title, lang)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, LookupError> {
    let response: QueryResponse<T> = serde_json::from_str(body)
        .map_err(|e| LookupError::InvalidResponse(format!("malformed JSON: {}", e)))?;

    if let Some(error) = response.error {
        return Err(LookupError::InvalidResponse(format!(
            "{}: {}",
            error.code, error.info
        )));
    }

    response
        .query
        .ok_or_else(|| LookupError::InvalidResponse("missing 'query' object".to_string()))
}

/// Titles from a `list=search` response
pub fn parse_search(body: &str) -> Result<Vec<String>, LookupError> {
    let query: SearchQuery = decode(body)?;
    Ok(query.search.into_iter().map(|item| item.title).collect())
}

/// First existing page of a `prop=...` response
fn first_page(body: &str) -> Result<Option<Page>, LookupError> {
    let query: PagesQuery = decode(body)?;
    Ok(query
        .pages
        .into_iter()
        .next()
        .filter(|(id, _)| !is_missing(id))
        .map(|(_, page)| page))
}

/// Extract from a `prop=extracts` response.
///
/// Returns `None` when the page does not exist, or when it is a redirect
/// that was not followed and so has no text of its own.
pub fn parse_extract(body: &str, requested_title: &str) -> Result<Option<Extract>, LookupError> {
    let Some(page) = first_page(body)? else {
        return Ok(None);
    };

    let text = page.extract.filter(|t| !t.trim().is_empty());
    if page.redirect.is_some() && text.is_none() {
        return Ok(None);
    }

    Ok(Some(Extract {
        title: page.title.unwrap_or_else(|| requested_title.to_string()),
        text,
    }))
}

/// Canonical title from a plain `titles=...&redirects=1` query
pub fn parse_canonical_title(body: &str) -> Result<Option<String>, LookupError> {
    Ok(first_page(body)?.and_then(|page| page.title))
}

/// Language links from a `prop=langlinks` response, always including the
/// source language itself (under its canonical title when known)
pub fn parse_language_links(
    body: &str,
    title: &str,
    lang: &str,
) -> Result<LanguageLinks, LookupError> {
    let mut links = LanguageLinks::new();
    links.insert(lang.to_string(), title.to_string());

    if let Some(page) = first_page(body)? {
        if let Some(canonical) = page.title {
            links.insert(lang.to_string(), canonical);
        }
        for link in page.langlinks {
            links.insert(link.lang, link.title);
        }
    }

    Ok(links)
}
