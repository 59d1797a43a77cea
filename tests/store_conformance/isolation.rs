//! Independent store instances never share state

use factlog::{Event, JsonlStore, MemoryStore, Query, StateStore, StoreConfig};
use serde_json::json;
use tempfile::TempDir;

use crate::test_utils::props;

fn exercise_isolation(a: &dyn StateStore, b: &dyn StateStore) {
    a.append(vec![Event::set("a", "card:shared", "owner", "a")]).unwrap();
    a.upsert_card("only-a", props(json!({"x": 1}))).unwrap();
    b.append(vec![Event::set("b", "card:shared", "owner", "b")]).unwrap();

    assert_eq!(a.materialize("card:shared", None).unwrap()["owner"], "a");
    assert_eq!(b.materialize("card:shared", None).unwrap()["owner"], "b");

    assert!(b.read_card("only-a").unwrap().is_empty());
    assert!(b.list_cards().unwrap().is_empty());
    assert_eq!(a.query(&Query::new()).unwrap().len(), 2);
    assert_eq!(b.query(&Query::new()).unwrap().len(), 1);
    assert_eq!(b.tail(10).unwrap().len(), 1);
}

#[test]
fn test_jsonl_stores_in_distinct_directories() {
    let dir_a = TempDir::new().unwrap();
    let dir_b = TempDir::new().unwrap();
    let a = JsonlStore::open_dir(dir_a.path()).unwrap();
    let b = JsonlStore::open_dir(dir_b.path()).unwrap();

    exercise_isolation(&a, &b);
}

#[test]
fn test_jsonl_stores_with_distinct_file_names() {
    let dir = TempDir::new().unwrap();
    let a = JsonlStore::open(StoreConfig::new(dir.path())).unwrap();
    let b = JsonlStore::open(
        StoreConfig::new(dir.path())
            .events_file("other.jsonl")
            .cards_file("other.cards.json"),
    )
    .unwrap();

    exercise_isolation(&a, &b);
    assert!(dir.path().join("other.jsonl").exists());
    assert!(dir.path().join("other.cards.json").exists());
}

#[test]
fn test_memory_stores() {
    let a = MemoryStore::new();
    let b = MemoryStore::new();
    exercise_isolation(&a, &b);
}
