//! truepedia - Wikipedia reader with translation and review highlights
//!
//! Searches Wikipedia in any of the supported languages, shows and exports
//! articles, translates them through a public translation endpoint, and
//! keeps user highlights (text marked for review) in a JSON file.
//!
//! # Modules
//!
//! - `wiki`: Encyclopedia trait, MediaWiki client and TTL cache
//! - `highlights`: JSON-file highlight store, `<mark>` rendering, review marking
//! - `text`: Section and sentence-chunk splitting
//! - `translate`: Translator trait, Google client, concurrent chunked translation
//! - `export`: Markdown rendering of articles
//! - `domain`: Articles and supported languages
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! truepedia search "house cat" --lang en
//! truepedia show Cat --full --translate-to fr
//! truepedia highlight add Cat "small carnivorous mammal"
//! truepedia export Cat --translate-to de
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod export;
pub mod highlights;
pub mod text;
pub mod translate;
pub mod wiki;

// Re-export main types at crate root for convenience
pub use domain::{Article, ArticleId, Language};
pub use highlights::{Highlight, HighlightMap, HighlightStore, StoreError};
pub use translate::{GoogleTranslator, Translator};
pub use wiki::{CachedEncyclopedia, Encyclopedia, LookupError, MediaWikiClient};
