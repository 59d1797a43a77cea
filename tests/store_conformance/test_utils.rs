//! Shared helpers for the conformance suite

use chrono::{DateTime, TimeDelta, Utc};
use factlog::{Event, JsonlStore, MemoryStore, Properties, StateStore};
use serde_json::Value;
use tempfile::TempDir;

/// A store under test plus whatever keeps it alive
pub struct Backend {
    pub name: &'static str,
    pub store: Box<dyn StateStore>,
    _dir: Option<TempDir>,
}

impl Backend {
    pub fn jsonl() -> Self {
        let dir = TempDir::new().unwrap();
        let store = JsonlStore::open_dir(dir.path()).unwrap();
        Self {
            name: "jsonl",
            store: Box::new(store),
            _dir: Some(dir),
        }
    }

    pub fn memory() -> Self {
        Self {
            name: "memory",
            store: Box::new(MemoryStore::new()),
            _dir: None,
        }
    }
}

/// Run `scenario` once per backend, each time on a fresh store.
pub fn for_each_backend<F>(scenario: F)
where
    F: Fn(&str, &dyn StateStore),
{
    for backend in [Backend::jsonl(), Backend::memory()] {
        scenario(backend.name, backend.store.as_ref());
    }
}

/// Fixed base instant so timestamps are reproducible
pub fn base() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// `base() + minutes`, formatted the way events carry it
pub fn minutes_after_base(minutes: i64) -> String {
    factlog::format_instant(base() + TimeDelta::try_minutes(minutes).unwrap())
}

/// Set event with an explicit timestamp
pub fn set_at(s: &str, p: &str, o: &str, minutes: i64) -> Event {
    Event::set("TestAgent", s, p, o).with_ts(minutes_after_base(minutes))
}

/// Build a property map from a `json!({...})` literal
pub fn props(value: Value) -> Properties {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

/// Objects of `events`, in order
pub fn objects(events: &[Event]) -> Vec<String> {
    events.iter().map(|e| e.triple.object().to_string()).collect()
}
