//! In-memory store
//!
//! Keeps the event list, the latest-value index and the card map in
//! process memory. Nothing is persisted. Observable behaviour matches
//! [`JsonlStore`](crate::JsonlStore), which makes it a drop-in fake for
//! code written against [`StateStore`].

use std::collections::BTreeMap;

use factlog_core::{Event, FactlogResult, Query};
use factlog_storage::LatestIndex;
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};

use crate::cards::{
    card_events, card_listing, card_properties, merge_into, normalize_card_id, Properties,
};
use crate::query::run_query;
use crate::store::StateStore;

/// Volatile [`StateStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RwLock<Vec<Event>>,
    index: LatestIndex,
    cards: Mutex<Map<String, Value>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events appended so far
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// True when nothing has been appended
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

impl StateStore for MemoryStore {
    fn append(&self, events: Vec<Event>) -> FactlogResult<Vec<String>> {
        let mut log = self.events.write();
        let ids = events.iter().map(|e| e.id.clone()).collect();
        for event in &events {
            self.index.apply(event);
        }
        log.extend(events);
        Ok(ids)
    }

    fn query(&self, query: &Query) -> FactlogResult<Vec<Event>> {
        let events = self.events.read();
        Ok(run_query(events.iter().cloned(), query))
    }

    fn materialize(
        &self,
        subject: &str,
        predicate: Option<&str>,
    ) -> FactlogResult<BTreeMap<String, String>> {
        Ok(self.index.materialize(subject, predicate))
    }

    fn upsert_card(&self, id: &str, properties: Properties) -> FactlogResult<()> {
        let mut cards = self.cards.lock();
        merge_into(&mut cards, normalize_card_id(id), &properties);
        self.append(card_events(id, &properties))?;
        Ok(())
    }

    fn read_card(&self, id: &str) -> FactlogResult<Properties> {
        Ok(card_properties(&self.cards.lock(), &normalize_card_id(id)))
    }

    fn list_cards(&self) -> FactlogResult<Vec<Properties>> {
        Ok(card_listing(&self.cards.lock()))
    }

    fn tail(&self, n: usize) -> FactlogResult<Vec<Event>> {
        let events = self.events.read();
        let start = events.len().saturating_sub(n);
        Ok(events[start..].to_vec())
    }

    fn export_cards(&self) -> FactlogResult<Map<String, Value>> {
        Ok(self.cards.lock().clone())
    }
}
