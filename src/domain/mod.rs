//! Domain types for truepedia.
//!
//! - Article: fetched encyclopedia content and its highlight key
//! - Language: the table of supported wiki languages

pub mod article;
pub mod language;

// Re-export commonly used types
pub use article::{article_url, Article, ArticleId};
pub use language::{language_name, native_name, Language, LANGUAGES};
