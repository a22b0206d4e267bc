//! Highlight Store Integration Tests
//!
//! Exercises the public store API against real files: persistence
//! round-trips, ordering guarantees and concurrent writers.

use std::sync::Arc;
use std::thread;

use tempfile::TempDir;
use truepedia::highlights::{HighlightMap, HighlightStore, StoreError};
use truepedia::ArticleId;

fn store_in(temp: &TempDir) -> HighlightStore {
    HighlightStore::new(temp.path().join("state").join("highlights.json"))
}

#[test]
fn test_missing_file_loads_empty() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);

    assert!(!store.path().exists());
    assert!(store.load().unwrap().is_empty());
    assert!(store.get(&ArticleId::from("Cat")).unwrap().is_empty());
}

#[test]
fn test_first_highlight_creates_file() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);

    store
        .add_highlight(&ArticleId::from("Cat"), "Cats are mammals", "summary")
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
    let list = raw["Cat"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["text"], "Cats are mammals");
    assert_eq!(list[0]["context"], "summary");
    assert!(list[0]["timestamp"].as_f64().unwrap() > 0.0);

    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[&ArticleId::from("Cat")][0].text, "Cats are mammals");
}

#[test]
fn test_save_of_load_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);
    let cat = ArticleId::new("Cat", "en");
    let dog = ArticleId::new("Dog", "fr");

    store.add_highlight(&cat, "small mammal", "summary").unwrap();
    store.add_highlight(&cat, "purr", "section_2").unwrap();
    store.add_highlight(&dog, "chien", "summary").unwrap();

    let before = std::fs::read_to_string(store.path()).unwrap();
    let loaded = store.load().unwrap();
    store.save(&loaded).unwrap();
    let after = std::fs::read_to_string(store.path()).unwrap();

    assert_eq!(before, after);
    assert_eq!(store.load().unwrap(), loaded);
}

#[test]
fn test_added_highlight_is_last() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);
    let id = ArticleId::new("Cat", "en");

    for text in ["first", "second", "third"] {
        store.add_highlight(&id, text, "summary").unwrap();
        let list = store.get(&id).unwrap();
        assert_eq!(list.last().unwrap().text, text);
    }
}

#[test]
fn test_remove_keeps_order_of_rest() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);
    let id = ArticleId::new("Cat", "en");

    for text in ["a", "b", "c", "d"] {
        store.add_highlight(&id, text, "summary").unwrap();
    }

    let removed = store.remove_highlight(&id, 1).unwrap();
    assert_eq!(removed.text, "b");

    let texts: Vec<String> = store.get(&id).unwrap().into_iter().map(|h| h.text).collect();
    assert_eq!(texts, vec!["a", "c", "d"]);

    match store.remove_highlight(&id, 3) {
        Err(StoreError::IndexOutOfRange { index, len, .. }) => {
            assert_eq!(index, 3);
            assert_eq!(len, 3);
        }
        other => panic!("Expected IndexOutOfRange, got {:?}", other),
    }
}

#[test]
fn test_save_replaces_whole_mapping() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);

    store
        .add_highlight(&ArticleId::from("Cat_en"), "mammal", "summary")
        .unwrap();
    store.save(&HighlightMap::new()).unwrap();

    assert!(store.load().unwrap().is_empty());
    assert_eq!(std::fs::read_to_string(store.path()).unwrap().trim(), "{}");
}

#[test]
fn test_concurrent_writers_do_not_lose_highlights() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(store_in(&temp));
    let id = ArticleId::new("Cat", "en");

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            let id = id.clone();
            thread::spawn(move || {
                for n in 0..5 {
                    store
                        .add_highlight(&id, &format!("w{}-n{}", worker, n), "summary")
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.get(&id).unwrap().len(), 40);
}
