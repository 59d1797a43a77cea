//! On-disk behaviour of `JsonlStore`

use std::fs;
use std::io::Write;

use factlog::{Event, JsonlStore, Query, StateStore, StoreConfig};
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::test_utils::props;

#[test]
fn test_reopen_restores_everything() {
    let dir = TempDir::new().unwrap();

    // Phase 1: write
    {
        let store = JsonlStore::open_dir(dir.path()).unwrap();
        store
            .append(vec![
                Event::set("a", "card:x", "name", "X"),
                Event::set("a", "card:x", "status", "draft"),
            ])
            .unwrap();
        store.append(vec![Event::retract("a", "card:x", "status", "draft")]).unwrap();
        store.upsert_card("x", props(json!({"year": "1955"}))).unwrap();
    }

    // Phase 2: reopen, cold index
    {
        let store = JsonlStore::open_dir(dir.path()).unwrap();
        let state = store.materialize("card:x", None).unwrap();
        assert_eq!(state.get("name").map(String::as_str), Some("X"));
        assert_eq!(state.get("year").map(String::as_str), Some("1955"));
        assert!(!state.contains_key("status"));

        assert_eq!(Value::Object(store.read_card("x").unwrap()), json!({"year": "1955"}));
        assert_eq!(store.tail(10).unwrap().len(), 4);
    }
}

#[test]
fn test_log_is_one_record_per_line() {
    let dir = TempDir::new().unwrap();
    let store = JsonlStore::open_dir(dir.path()).unwrap();
    let ids = store
        .append(vec![
            Event::set("a", "s", "p", "line\nbreak"),
            Event::set("a", "s", "p", "plain").with_tags(["t"]),
        ])
        .unwrap();

    let raw = fs::read_to_string(dir.path().join("events.jsonl")).unwrap();
    let lines: Vec<&str> = raw.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(raw.ends_with('\n'));

    let first: Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["id"], json!(ids[0]));
    assert_eq!(first["op"], "set");
    assert_eq!(first["triple"], json!(["s", "p", "line\nbreak"]));
    let second: Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second["meta"], json!({"tags": ["t"]}));
}

#[test]
fn test_corrupt_lines_are_skipped_everywhere() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.jsonl");
    let good: Vec<Event> = (0..4)
        .map(|i| Event::set("a", "s", format!("p{}", i), i.to_string()))
        .collect();
    {
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "{}", good[0].to_json_line().unwrap()).unwrap();
        writeln!(file, "{{not json").unwrap();
        writeln!(file, "{}", good[1].to_json_line().unwrap()).unwrap();
        writeln!(file, r#"{{"id":"x","ts":"2024-01-01T00:00:00Z","actor":"a","op":"set","triple":["s","p"],"meta":{{}}}}"#).unwrap();
        writeln!(file, "{}", good[2].to_json_line().unwrap()).unwrap();
        writeln!(file, r#"{{"id":"y","ts":"2024-01-01T00:00:00Z","actor":"a","op":"upsert","triple":["s","p","o"],"meta":{{}}}}"#).unwrap();
        writeln!(file, "{}", good[3].to_json_line().unwrap()).unwrap();
    }

    let store = JsonlStore::open_dir(dir.path()).unwrap();
    assert_eq!(store.materialize("s", None).unwrap().len(), 4);
    assert_eq!(store.query(&Query::new()).unwrap().len(), 4);
    assert_eq!(store.tail(3).unwrap(), good[1..].to_vec());
    assert_eq!(store.tail(10).unwrap(), good);

    let stats = store.scan_stats().unwrap();
    assert_eq!(stats.decoded, 4);
    assert_eq!(stats.skipped, 3);
}

#[test]
fn test_torn_final_record_is_repaired_on_append() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.jsonl");
    {
        let store = JsonlStore::open_dir(dir.path()).unwrap();
        store.append(vec![Event::set("a", "s", "p", "1")]).unwrap();
    }
    fs::OpenOptions::new()
        .append(true)
        .open(&path)
        .unwrap()
        .write_all(br#"{"id":"torn","ts":"2024"#)
        .unwrap();

    let store = JsonlStore::open_dir(dir.path()).unwrap();
    store.append(vec![Event::set("a", "s", "p", "2")]).unwrap();

    let tail = store.tail(10).unwrap();
    assert_eq!(tail.len(), 2);
    assert_eq!(store.materialize("s", None).unwrap()["p"], "2");
    assert_eq!(store.scan_stats().unwrap().skipped, 1);
}

#[test]
fn test_tail_with_tiny_blocks() {
    let dir = TempDir::new().unwrap();
    let store = JsonlStore::open(StoreConfig::new(dir.path()).tail_block_size(5)).unwrap();
    let events: Vec<Event> = (0..30)
        .map(|i| Event::set("a", "s", "p", i.to_string()))
        .collect();
    store.append(events.clone()).unwrap();

    assert_eq!(store.tail(12).unwrap(), events[18..].to_vec());
}

#[test]
fn test_projection_document_format() {
    let dir = TempDir::new().unwrap();
    let store = JsonlStore::open_dir(dir.path()).unwrap();
    store.upsert_card("area51", props(json!({"name": "Area 51"}))).unwrap();

    let raw = fs::read_to_string(dir.path().join("cards.index.json")).unwrap();
    let doc: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc, json!({"card:area51": {"name": "Area 51"}}));
    assert!(raw.contains("\n  \"card:area51\""));
    assert!(!dir.path().join("cards.index.json.tmp").exists());
}

#[test]
fn test_stale_projection_temp_file_is_ignored() {
    let dir = TempDir::new().unwrap();
    {
        let store = JsonlStore::open_dir(dir.path()).unwrap();
        store.upsert_card("x", props(json!({"a": 1}))).unwrap();
    }
    fs::write(dir.path().join("cards.index.json.tmp"), b"{\"card:x\": {\"a\": 99, \"b").unwrap();

    let store = JsonlStore::open_dir(dir.path()).unwrap();
    assert_eq!(Value::Object(store.read_card("x").unwrap()), json!({"a": 1}));

    store.upsert_card("x", props(json!({"b": 2}))).unwrap();
    assert!(!dir.path().join("cards.index.json.tmp").exists());
    let reopened = JsonlStore::open_dir(dir.path()).unwrap();
    assert_eq!(Value::Object(reopened.read_card("x").unwrap()), json!({"a": 1, "b": 2}));
}

#[test]
fn test_corrupt_projection_degrades_to_empty() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("cards.index.json"), b"[1, 2").unwrap();

    let store = JsonlStore::open_dir(dir.path()).unwrap();
    assert!(store.list_cards().unwrap().is_empty());
    store.upsert_card("fresh", props(json!({"ok": true}))).unwrap();
    assert_eq!(store.list_cards().unwrap().len(), 1);
}

#[test]
fn test_null_meta_decodes_as_empty() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("events.jsonl"),
        "{\"id\":\"legacy\",\"ts\":\"2024-01-01T00:00:00Z\",\"actor\":\"a\",\"op\":\"assert\",\"triple\":[\"s\",\"p\",\"o\"],\"meta\":null}\n",
    )
    .unwrap();

    let store = JsonlStore::open_dir(dir.path()).unwrap();
    let tail = store.tail(1).unwrap();
    assert_eq!(tail[0].id, "legacy");
    assert!(tail[0].meta.is_empty());
}
