//! Marking passages of an article for community review.

use thiserror::Error;

use super::store::{Highlight, HighlightStore, StoreError};
use crate::domain::ArticleId;

/// Reasons a review mark is refused
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Enter some text to mark for review")]
    Empty,

    #[error("The text was not found in this passage; copy it exactly from the article")]
    NotInPassage,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Save `text` as a highlight if it appears verbatim in `passage`
pub fn mark_for_review(
    store: &HighlightStore,
    article_id: &ArticleId,
    passage: &str,
    text: &str,
    context: &str,
) -> Result<Highlight, ReviewError> {
    if text.trim().is_empty() {
        return Err(ReviewError::Empty);
    }

    if !passage.contains(text) {
        return Err(ReviewError::NotInPassage);
    }

    Ok(store.add_highlight(article_id, text, context)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PASSAGE: &str = "The cat is a small carnivorous mammal.";

    #[test]
    fn test_mark_text_in_passage() {
        let temp = TempDir::new().unwrap();
        let store = HighlightStore::new(temp.path().join("highlights.json"));
        let id = ArticleId::new("Cat", "en");

        let saved = mark_for_review(&store, &id, PASSAGE, "small carnivorous", "section_0").unwrap();
        assert_eq!(saved.text, "small carnivorous");
        assert_eq!(saved.context, "section_0");
        assert_eq!(store.get(&id).unwrap().len(), 1);
    }

    #[test]
    fn test_text_must_appear_verbatim() {
        let temp = TempDir::new().unwrap();
        let store = HighlightStore::new(temp.path().join("highlights.json"));
        let id = ArticleId::new("Cat", "en");

        let result = mark_for_review(&store, &id, PASSAGE, "Small Carnivorous", "summary");
        assert!(matches!(result, Err(ReviewError::NotInPassage)));

        let result = mark_for_review(&store, &id, PASSAGE, "  ", "summary");
        assert!(matches!(result, Err(ReviewError::Empty)));

        assert!(store.load().unwrap().is_empty());
    }
}
