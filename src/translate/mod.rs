//! Machine translation of article text.
//!
//! Short text goes to the translator in one request. Longer text is split
//! into sentence-aligned chunks which are translated concurrently (bounded
//! by `max_workers`) and joined back in their original order. Translation
//! degrades instead of failing: any piece that cannot be translated is
//! returned in the source language.

pub mod google;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::domain::Article;
use crate::text::{split_into_chunks, split_sections};

pub use google::GoogleTranslator;

/// Text shorter than this (in bytes) is translated without chunking
pub const CHUNKING_THRESHOLD: usize = 200;

/// Translation failures
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("HTTP error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Translation service returned status {0}")]
    Status(u16),

    #[error("Unexpected translation response: {0}")]
    InvalidResponse(String),
}

/// A text translation backend
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `from` (or `"auto"`) into `to`
    async fn translate(&self, text: &str, to: &str, from: &str) -> Result<String, TranslateError>;
}

/// Options for `translate_text`
#[derive(Debug, Clone, Copy)]
pub struct TranslateOptions {
    /// Maximum chunks in flight at once
    pub max_workers: usize,
    /// Maximum chunk size in bytes
    pub chunk_size: usize,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            max_workers: 12,
            chunk_size: crate::text::DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Translate arbitrary-length text.
///
/// Chunks that fail keep their original text so a partial outage still
/// yields readable output.
pub async fn translate_text(
    translator: Arc<dyn Translator>,
    text: &str,
    to: &str,
    from: &str,
    options: TranslateOptions,
) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    if text.len() < CHUNKING_THRESHOLD {
        return match translator.translate(text, to, from).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!(error = %e, "Translation failed, keeping original");
                text.to_string()
            }
        };
    }

    let chunks = split_into_chunks(text, options.chunk_size);
    if chunks.is_empty() {
        return String::new();
    }

    let workers = options.max_workers.clamp(1, chunks.len());
    debug!(chunks = chunks.len(), workers, to, from, "Translating in chunks");

    let permits = Arc::new(Semaphore::new(workers));
    let mut tasks = JoinSet::new();

    for (index, chunk) in chunks.iter().cloned().enumerate() {
        let translator = Arc::clone(&translator);
        let permits = Arc::clone(&permits);
        let to = to.to_string();
        let from = from.to_string();

        tasks.spawn(async move {
            // The semaphore is never closed, so acquire only fails on shutdown
            let _permit = permits.acquire_owned().await;
            let result = translator.translate(&chunk, &to, &from).await;
            (index, result)
        });
    }

    let mut translated: Vec<Option<String>> = vec![None; chunks.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, Ok(text))) => translated[index] = Some(text),
            Ok((index, Err(e))) => {
                warn!(chunk = index, error = %e, "Chunk translation failed, keeping original")
            }
            Err(e) => warn!(error = %e, "Translation task aborted"),
        }
    }

    let parts: Vec<String> = translated
        .into_iter()
        .zip(chunks)
        .map(|(done, original)| done.unwrap_or(original))
        .collect();

    parts.join(" ")
}

/// Translate an article's summary and body into `to`.
///
/// The body is translated section by section so heading markers survive;
/// titles, language and URL are kept so highlights and links still refer to
/// the source article. Translating into the article's own language is a
/// no-op.
pub async fn translate_article(
    translator: Arc<dyn Translator>,
    article: &Article,
    to: &str,
    options: TranslateOptions,
) -> Article {
    if to == article.language {
        return article.clone();
    }

    let from = article.language.as_str();
    let summary = translate_text(Arc::clone(&translator), &article.summary, to, from, options).await;

    let mut parts = Vec::new();
    for section in split_sections(&article.content) {
        let body =
            translate_text(Arc::clone(&translator), &section.content, to, from, options).await;

        match &section.title {
            Some(title) => {
                let title = translate_text(Arc::clone(&translator), title, to, from, options).await;
                let marker = "=".repeat(section.level.max(1) * 2);
                parts.push(format!("{} {} {}\n{}", marker, title.trim(), marker, body));
            }
            None => parts.push(body),
        }
    }

    Article {
        summary,
        content: parts.join("\n\n"),
        ..article.clone()
    }
}
