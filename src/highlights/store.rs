//! JSON-file backed highlight store.
//!
//! The whole article -> highlights mapping is the unit of read and write.
//! Every mutation is a load-modify-save cycle performed under an exclusive
//! advisory lock on a sidecar `.lock` file, and every save replaces the
//! backing file atomically via a temp file in the same directory.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::ArticleId;

/// Full contents of the backing file
pub type HighlightMap = BTreeMap<ArticleId, Vec<Highlight>>;

/// Errors that can occur reading or writing highlights
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to parse highlights file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No highlight at index {index} for '{article_id}' ({len} stored)")]
    IndexOutOfRange {
        article_id: ArticleId,
        index: usize,
        len: usize,
    },

    #[error("Highlight text is empty")]
    EmptyHighlight,
}

/// A span of article text a user marked for review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    /// The highlighted text, trimmed
    pub text: String,

    /// Passage the text was taken from ("summary", "section_2", ...)
    #[serde(default)]
    pub context: String,

    /// Creation time, seconds since the Unix epoch
    #[serde(default)]
    pub timestamp: f64,
}

impl Highlight {
    /// Create a highlight stamped with the current time
    pub fn new(text: impl Into<String>, context: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            text: text.into(),
            context: context.into(),
            timestamp: now.timestamp_micros() as f64 / 1_000_000.0,
        }
    }

    /// Creation time as a UTC datetime, if the stored timestamp is valid
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let secs = self.timestamp.floor();
        let nanos = ((self.timestamp - secs) * 1_000_000_000.0) as u32;
        DateTime::from_timestamp(secs as i64, nanos)
    }
}

/// File-backed highlight store
#[derive(Debug, Clone)]
pub struct HighlightStore {
    /// Path to the highlights JSON file
    path: PathBuf,
}

impl HighlightStore {
    /// Create a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open the store at the configured location
    pub fn open_default() -> anyhow::Result<Self> {
        Ok(Self::new(crate::config::highlights_path()?))
    }

    /// Path to the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole mapping.
    ///
    /// A missing or empty file is an empty mapping, not an error.
    pub fn load(&self) -> Result<HighlightMap, StoreError> {
        let _guard = self.lock(false)?;
        self.read_unlocked()
    }

    /// Replace the backing file with the given mapping
    pub fn save(&self, highlights: &HighlightMap) -> Result<(), StoreError> {
        let _guard = self.lock(true)?;
        self.write_unlocked(highlights)
    }

    /// Highlights saved for one article, in insertion order
    pub fn get(&self, article_id: &ArticleId) -> Result<Vec<Highlight>, StoreError> {
        Ok(self.load()?.remove(article_id).unwrap_or_default())
    }

    /// Append a highlight to an article and persist.
    ///
    /// The text is trimmed; blank text is rejected without touching the file.
    pub fn add_highlight(
        &self,
        article_id: &ArticleId,
        text: &str,
        context: &str,
    ) -> Result<Highlight, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::EmptyHighlight);
        }

        let _guard = self.lock(true)?;
        let mut highlights = self.read_unlocked()?;

        let highlight = Highlight::new(text, context);
        highlights
            .entry(article_id.clone())
            .or_default()
            .push(highlight.clone());

        self.write_unlocked(&highlights)?;
        debug!(article = %article_id, context, "Saved highlight");

        Ok(highlight)
    }

    /// Remove the highlight at `index` for an article and persist.
    ///
    /// Articles left without highlights are dropped from the mapping.
    pub fn remove_highlight(
        &self,
        article_id: &ArticleId,
        index: usize,
    ) -> Result<Highlight, StoreError> {
        let _guard = self.lock(true)?;
        let mut highlights = self.read_unlocked()?;

        let list = highlights.get_mut(article_id);
        let len = list.as_ref().map(|l| l.len()).unwrap_or(0);
        let removed = match list {
            Some(list) if index < list.len() => list.remove(index),
            _ => {
                return Err(StoreError::IndexOutOfRange {
                    article_id: article_id.clone(),
                    index,
                    len,
                })
            }
        };

        if highlights.get(article_id).is_some_and(|l| l.is_empty()) {
            highlights.remove(article_id);
        }

        self.write_unlocked(&highlights)?;
        debug!(article = %article_id, index, "Removed highlight");

        Ok(removed)
    }

    /// Delete the backing file, dropping every highlight
    pub fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock(true)?;

        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Take the sidecar lock. Shared locks on a store whose directory does
    /// not exist yet are skipped: there is nothing to read.
    fn lock(&self, exclusive: bool) -> Result<Option<File>, StoreError> {
        let parent = self.path.parent().filter(|p| !p.as_os_str().is_empty());

        if let Some(parent) = parent {
            if !parent.exists() {
                if !exclusive {
                    return Ok(None);
                }
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let lock_path = self.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|source| StoreError::Io {
                path: lock_path.clone(),
                source,
            })?;

        let locked = if exclusive {
            file.lock_exclusive()
        } else {
            file.lock_shared()
        };
        locked.map_err(|source| StoreError::Io {
            path: lock_path,
            source,
        })?;

        // Lock is released when the file is dropped
        Ok(Some(file))
    }

    fn read_unlocked(&self) -> Result<HighlightMap, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HighlightMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(HighlightMap::new());
        }

        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn write_unlocked(&self, highlights: &HighlightMap) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(highlights)?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| self.io_error(e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.flush())
            .map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;

        Ok(())
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (HighlightStore, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = HighlightStore::new(temp.path().join("data").join("highlights.json"));
        (store, temp)
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let (store, _temp) = create_test_store();
        let highlights = store.load().unwrap();
        assert!(highlights.is_empty());
        // Reading must not create the data directory
        assert!(!store.path().parent().unwrap().exists());
    }

    #[test]
    fn test_load_empty_file_is_empty() {
        let (store, _temp) = create_test_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "").unwrap();

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_parse_error() {
        let (store, _temp) = create_test_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(store.load(), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn test_load_wrong_shape_is_parse_error() {
        let (store, _temp) = create_test_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"["a", "b"]"#).unwrap();

        assert!(matches!(store.load(), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn test_add_trims_and_records_context() {
        let (store, _temp) = create_test_store();
        let id = ArticleId::new("Cat", "en");

        let saved = store.add_highlight(&id, "  Cats are mammals \n", "summary").unwrap();
        assert_eq!(saved.text, "Cats are mammals");
        assert_eq!(saved.context, "summary");
        assert!(saved.timestamp > 0.0);

        let stored = store.get(&id).unwrap();
        assert_eq!(stored, vec![saved]);
    }

    #[test]
    fn test_add_blank_text_rejected() {
        let (store, _temp) = create_test_store();
        let id = ArticleId::new("Cat", "en");

        let result = store.add_highlight(&id, "   ", "summary");
        assert!(matches!(result, Err(StoreError::EmptyHighlight)));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_remove_drops_empty_article() {
        let (store, _temp) = create_test_store();
        let id = ArticleId::new("Cat", "en");

        store.add_highlight(&id, "Cats are mammals", "summary").unwrap();
        let removed = store.remove_highlight(&id, 0).unwrap();
        assert_eq!(removed.text, "Cats are mammals");

        assert!(!store.load().unwrap().contains_key(&id));
    }

    #[test]
    fn test_remove_out_of_range() {
        let (store, _temp) = create_test_store();
        let id = ArticleId::new("Cat", "en");
        store.add_highlight(&id, "one", "summary").unwrap();

        match store.remove_highlight(&id, 3) {
            Err(StoreError::IndexOutOfRange { index, len, .. }) => {
                assert_eq!(index, 3);
                assert_eq!(len, 1);
            }
            other => panic!("Expected IndexOutOfRange, got {:?}", other),
        }

        let missing = ArticleId::new("Dog", "en");
        assert!(matches!(
            store.remove_highlight(&missing, 0),
            Err(StoreError::IndexOutOfRange { len: 0, .. })
        ));

        // Failed removal leaves the file untouched
        assert_eq!(store.get(&id).unwrap().len(), 1);
    }

    #[test]
    fn test_clear_removes_file() {
        let (store, _temp) = create_test_store();
        let id = ArticleId::new("Cat", "en");
        store.add_highlight(&id, "one", "summary").unwrap();
        assert!(store.path().exists());

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert!(store.load().unwrap().is_empty());

        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_file_is_pretty_printed_object() {
        let (store, _temp) = create_test_store();
        store
            .add_highlight(&ArticleId::new("Cat", "en"), "Cats are mammals", "summary")
            .unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.starts_with("{\n  \"Cat_en\": ["));

        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["Cat_en"][0]["text"], "Cats are mammals");
        assert_eq!(value["Cat_en"][0]["context"], "summary");
    }

    #[test]
    fn test_reads_records_without_optional_fields() {
        let (store, _temp) = create_test_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"Cat_en": [{"text": "Cats"}]}"#).unwrap();

        let highlights = store.get(&ArticleId::new("Cat", "en")).unwrap();
        assert_eq!(highlights[0].text, "Cats");
        assert_eq!(highlights[0].context, "");
    }

    #[test]
    fn test_created_at_round_trips_timestamp() {
        let highlight = Highlight {
            text: "x".to_string(),
            context: String::new(),
            timestamp: 1_700_000_000.5,
        };
        let created = highlight.created_at().unwrap();
        assert_eq!(created.timestamp(), 1_700_000_000);
        assert_eq!(created.timestamp_subsec_millis(), 500);
    }
}
