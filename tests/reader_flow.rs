//! Reader Flow Integration Tests
//!
//! Drives the library the way the CLI does, against an in-memory
//! encyclopedia and translator: fetch, mark for review, render highlights,
//! translate and export.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use truepedia::domain::article_url;
use truepedia::export::{download_filename, render_markdown, ExportOptions};
use truepedia::highlights::{apply_highlights, mark_for_review, HighlightStore, ReviewError};
use truepedia::text::split_sections;
use truepedia::translate::{translate_article, TranslateError, TranslateOptions, Translator};
use truepedia::wiki::{CachedEncyclopedia, Encyclopedia, LanguageLinks, LookupError};
use truepedia::Article;

/// Fixed set of articles keyed by (language, title)
struct FakeWiki {
    articles: HashMap<(String, String), Article>,
}

impl FakeWiki {
    fn new() -> Self {
        let mut articles = HashMap::new();
        let cat = Article {
            title: "Cat".to_string(),
            language: "en".to_string(),
            summary: "The cat is a small carnivorous mammal. Cats are popular pets.".to_string(),
            content: "The cat is a small carnivorous mammal.\n\n\
                      == Etymology ==\nThe word cat comes from Old English catt.\n\n\
                      == Behavior ==\nCats sleep a lot. A caterpillar is not a cat."
                .to_string(),
            url: article_url("Cat", "en"),
        };
        articles.insert(("en".to_string(), "Cat".to_string()), cat);
        Self { articles }
    }
}

#[async_trait]
impl Encyclopedia for FakeWiki {
    fn name(&self) -> &str {
        "fake"
    }

    async fn search(&self, query: &str, language: &str) -> Result<Vec<String>, LookupError> {
        let query = query.to_lowercase();
        Ok(self
            .articles
            .keys()
            .filter(|(lang, title)| lang == language && query.contains(&title.to_lowercase()))
            .map(|(_, title)| title.clone())
            .collect())
    }

    async fn fetch_article(&self, title: &str, language: &str) -> Result<Article, LookupError> {
        self.articles
            .get(&(language.to_string(), title.to_string()))
            .cloned()
            .ok_or_else(|| LookupError::NotFound(title.to_string()))
    }

    async fn language_links(
        &self,
        title: &str,
        language: &str,
    ) -> Result<LanguageLinks, LookupError> {
        let mut links = LanguageLinks::new();
        links.insert(language.to_string(), title.to_string());
        links.insert("fr".to_string(), "Chat".to_string());
        Ok(links)
    }
}

/// Wraps every piece of text in brackets and tags the target language
struct BracketTranslator;

#[async_trait]
impl Translator for BracketTranslator {
    async fn translate(&self, text: &str, to: &str, _from: &str) -> Result<String, TranslateError> {
        Ok(format!("[{}] {}", to, text))
    }
}

#[tokio::test]
async fn test_best_match_then_highlight_round_trip() {
    let temp = TempDir::new().unwrap();
    let store = HighlightStore::new(temp.path().join("highlights.json"));
    let wiki = CachedEncyclopedia::new(FakeWiki::new(), Duration::from_secs(60));

    let article = wiki.fetch_best_match("domestic cat", "en").await.unwrap();
    assert_eq!(article.title, "Cat");
    let id = article.id();
    assert_eq!(id.as_str(), "Cat_en");

    mark_for_review(&store, &id, &article.summary, "small carnivorous mammal", "summary").unwrap();
    mark_for_review(&store, &id, &article.summary, "cat", "summary").unwrap();

    let highlights = store.get(&id).unwrap();
    assert_eq!(highlights.len(), 2);

    let marked = apply_highlights(&article.summary, &highlights);
    assert_eq!(
        marked,
        "The <mark>cat</mark> is a <mark>small carnivorous mammal</mark>. Cats are popular pets."
    );

    // Word boundaries apply in section text too
    let behavior = &split_sections(&article.content)[2];
    let marked = apply_highlights(&behavior.content, &highlights);
    assert!(marked.contains("A caterpillar is not a <mark>cat</mark>."));
}

#[tokio::test]
async fn test_review_rejects_text_outside_passage() {
    let temp = TempDir::new().unwrap();
    let store = HighlightStore::new(temp.path().join("highlights.json"));
    let wiki = FakeWiki::new();

    let article = wiki.fetch_article("Cat", "en").await.unwrap();
    let err = mark_for_review(&store, &article.id(), &article.summary, "Old English", "summary")
        .unwrap_err();

    assert!(matches!(err, ReviewError::NotInPassage));
    assert!(!store.path().exists());
}

#[tokio::test]
async fn test_unknown_article_is_not_found() {
    let wiki = FakeWiki::new();
    assert!(matches!(
        wiki.fetch_best_match("quantum chromodynamics", "en").await,
        Err(LookupError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_translated_export() {
    let wiki = FakeWiki::new();
    let article = wiki.fetch_article("Cat", "en").await.unwrap();

    let translated = translate_article(
        Arc::new(BracketTranslator),
        &article,
        "fr",
        TranslateOptions::default(),
    )
    .await;

    let options = ExportOptions {
        translated_to: Some("fr".to_string()),
    };
    let markdown = render_markdown(&translated, &options);

    assert!(markdown.starts_with("# Cat\n"));
    assert!(markdown.contains("*Original: English | Translated to: French*"));
    assert!(markdown.contains("### [fr] Etymology"));
    assert!(markdown.contains("[fr] The word cat comes from Old English catt."));
    assert_eq!(
        download_filename(&translated.title, Some("fr")),
        "Wikipedia-Cat-translated_to_fr.md"
    );
}
