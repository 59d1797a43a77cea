//! Durable store backed by a JSONL event log and a JSON card projection
//!
//! # Locking
//!
//! - `writer` serializes appends and the replay that warms the index, so a
//!   replay never races an append and a warm index never misses one
//! - `cards` is held across merge, persist and the follow-up append of an
//!   upsert; it is always taken before `writer`
//! - queries and tails read the file without either lock; a record being
//!   written concurrently is at worst skipped as incomplete
//!
//! A read error part way through the log fails the call instead of
//! answering from the records read so far.

use std::collections::BTreeMap;
use std::path::Path;

use factlog_core::{Event, FactlogResult, Query};
use factlog_durability::{EventLog, ScanStats};
use factlog_storage::{LatestIndex, Replay};
use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::cards::{CardProjection, Properties};
use crate::config::StoreConfig;
use crate::query::run_query;
use crate::store::StateStore;

/// Store over `events.jsonl` and `cards.index.json` in one directory
pub struct JsonlStore {
    config: StoreConfig,
    log: EventLog,
    writer: Mutex<()>,
    index: LatestIndex,
    cards: Mutex<CardProjection>,
}

impl JsonlStore {
    /// Open (or create) the store described by `config`.
    ///
    /// Creates the data directory, an empty log and an empty projection
    /// document as needed. The latest-value index stays cold until the
    /// first materialize.
    pub fn open(config: StoreConfig) -> FactlogResult<Self> {
        config.validate()?;
        let log = EventLog::open(config.events_path())?;
        let cards = CardProjection::load(config.cards_path())?;

        tracing::info!(
            target: "factlog::store",
            data_dir = %config.data_dir.display(),
            cards = cards.len(),
            "store opened"
        );

        Ok(Self {
            config,
            log,
            writer: Mutex::new(()),
            index: LatestIndex::new(),
            cards: Mutex::new(cards),
        })
    }

    /// Open a store in `dir` with default file names.
    pub fn open_dir(dir: impl AsRef<Path>) -> FactlogResult<Self> {
        Self::open(StoreConfig::new(dir.as_ref()))
    }

    /// Configuration this store was opened with
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The [`StoreConfig::default_tail`] most recent events.
    pub fn tail_default(&self) -> FactlogResult<Vec<Event>> {
        self.tail(self.config.default_tail)
    }

    /// Walk the whole log and report how many records decode.
    pub fn scan_stats(&self) -> FactlogResult<ScanStats> {
        let mut scan = self.log.scan()?;
        Ok(scan.finish()?)
    }

    /// Rebuild the latest-value index from the log unless already warm.
    fn ensure_warm(&self) -> FactlogResult<()> {
        if self.index.is_warm() {
            return Ok(());
        }
        let _writer = self.writer.lock();
        if self.index.is_warm() {
            return Ok(());
        }

        // A scan cut short by a read error must not leave a warm index that
        // silently lacks the rest of the log.
        let mut scan = self.log.scan()?;
        let replay: Replay = scan.by_ref().collect();
        let stats = scan.finish()?;
        let applied = self.index.install(replay);
        tracing::debug!(
            target: "factlog::store",
            applied,
            skipped = stats.skipped,
            "latest-value index warmed from log"
        );
        Ok(())
    }
}

impl StateStore for JsonlStore {
    fn append(&self, events: Vec<Event>) -> FactlogResult<Vec<String>> {
        if events.is_empty() {
            return Ok(Vec::new());
        }
        let _writer = self.writer.lock();
        let ids = self.log.append(&events)?;
        for event in &events {
            self.index.apply(event);
        }
        tracing::trace!(target: "factlog::store", count = ids.len(), "events appended");
        Ok(ids)
    }

    fn query(&self, query: &Query) -> FactlogResult<Vec<Event>> {
        if query.limit == 0 {
            return Ok(Vec::new());
        }
        let mut scan = self.log.scan()?;
        let events = run_query(&mut scan, query);
        scan.finish()?;
        Ok(events)
    }

    fn materialize(
        &self,
        subject: &str,
        predicate: Option<&str>,
    ) -> FactlogResult<BTreeMap<String, String>> {
        self.ensure_warm()?;
        Ok(self.index.materialize(subject, predicate))
    }

    fn upsert_card(&self, id: &str, properties: Properties) -> FactlogResult<()> {
        let mut cards = self.cards.lock();
        let events = cards.upsert(id, &properties)?;
        self.append(events)?;
        Ok(())
    }

    fn read_card(&self, id: &str) -> FactlogResult<Properties> {
        Ok(self.cards.lock().read(id))
    }

    fn list_cards(&self) -> FactlogResult<Vec<Properties>> {
        Ok(self.cards.lock().list())
    }

    fn tail(&self, n: usize) -> FactlogResult<Vec<Event>> {
        self.log.tail(n, self.config.tail_block_size)
    }

    fn export_cards(&self) -> FactlogResult<Map<String, Value>> {
        Ok(self.cards.lock().export())
    }
}

impl std::fmt::Debug for JsonlStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonlStore")
            .field("events", &self.log.path())
            .field("cards", &self.config.cards_path())
            .field("index", &self.index)
            .finish()
    }
}
