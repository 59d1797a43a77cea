//! Latest-value index
//!
//! Maps (subject, predicate) to the value of the most recent Set/Assert
//! event. Retract removes the pair.
//!
//! # Design
//!
//! - FxHashMap keyed by subject, then predicate: materializing a subject is
//!   one lookup instead of a scan over every pair
//! - RwLock: materialize takes a read lock, appends and installing a replay
//!   take the write lock
//! - `warmed` flag: set once the index reflects the whole log. Appends made
//!   before that are applied too; the replay clears and rebuilds anyway.
//!
//! Replay and incremental updates share the same apply rules, so a cold
//! rebuild honours Retract exactly like the append path does. A [`Replay`]
//! is built without holding the lock and swapped in whole.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use factlog_core::{Event, Op};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Value stored for one (subject, predicate) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestValue {
    /// Timestamp of the event that set the value
    pub ts: String,
    /// The object of that event
    pub value: String,
}

type PredicateMap = FxHashMap<String, LatestValue>;

/// (subject, predicate) → latest value
pub struct LatestIndex {
    subjects: RwLock<FxHashMap<String, PredicateMap>>,
    warmed: AtomicBool,
}

impl LatestIndex {
    /// Create an empty, cold index
    pub fn new() -> Self {
        Self {
            subjects: RwLock::new(FxHashMap::default()),
            warmed: AtomicBool::new(false),
        }
    }

    /// True once the index has been rebuilt from the full log
    #[inline]
    pub fn is_warm(&self) -> bool {
        self.warmed.load(Ordering::Acquire)
    }

    /// Apply one event.
    ///
    /// Set/Assert overwrite the pair, Retract removes it. Log order decides
    /// which write is latest; timestamps are carried but not compared.
    pub fn apply(&self, event: &Event) {
        let mut subjects = self.subjects.write();
        Self::apply_locked(&mut subjects, event);
    }

    fn apply_locked(subjects: &mut FxHashMap<String, PredicateMap>, event: &Event) {
        let subject = event.triple.subject();
        let predicate = event.triple.predicate();
        match event.op {
            Op::Set | Op::Assert => {
                subjects.entry(subject.to_string()).or_default().insert(
                    predicate.to_string(),
                    LatestValue {
                        ts: event.ts.clone(),
                        value: event.triple.object().to_string(),
                    },
                );
            }
            Op::Retract => {
                if let Some(predicates) = subjects.get_mut(subject) {
                    predicates.remove(predicate);
                    if predicates.is_empty() {
                        subjects.remove(subject);
                    }
                }
            }
        }
    }

    /// Replace the contents with a replay of `events` and mark the index warm.
    ///
    /// Returns the number of events applied.
    pub fn rebuild<I>(&self, events: I) -> usize
    where
        I: IntoIterator<Item = Event>,
    {
        self.install(events.into_iter().collect())
    }

    /// Swap in a finished [`Replay`] and mark the index warm.
    ///
    /// Returns the number of events the replay applied.
    pub fn install(&self, replay: Replay) -> usize {
        let mut subjects = self.subjects.write();
        *subjects = replay.subjects;
        self.warmed.store(true, Ordering::Release);
        tracing::debug!(
            target: "factlog::index",
            applied = replay.applied,
            subjects = subjects.len(),
            "latest-value index rebuilt"
        );
        replay.applied
    }

    /// Latest values for `subject`, optionally restricted to one predicate.
    ///
    /// Unknown subjects give an empty map.
    pub fn materialize(&self, subject: &str, predicate: Option<&str>) -> BTreeMap<String, String> {
        let subjects = self.subjects.read();
        let Some(predicates) = subjects.get(subject) else {
            return BTreeMap::new();
        };
        match predicate {
            Some(p) => predicates
                .get(p)
                .map(|v| BTreeMap::from([(p.to_string(), v.value.clone())]))
                .unwrap_or_default(),
            None => predicates
                .iter()
                .map(|(p, v)| (p.clone(), v.value.clone()))
                .collect(),
        }
    }

    /// Latest entry for one pair, with its timestamp
    pub fn get(&self, subject: &str, predicate: &str) -> Option<LatestValue> {
        self.subjects
            .read()
            .get(subject)
            .and_then(|predicates| predicates.get(predicate).cloned())
    }

    /// Number of (subject, predicate) pairs held
    pub fn len(&self) -> usize {
        self.subjects.read().values().map(|p| p.len()).sum()
    }

    /// True when no pair is held
    pub fn is_empty(&self) -> bool {
        self.subjects.read().is_empty()
    }

    /// Drop everything and mark the index cold
    pub fn clear(&self) {
        self.subjects.write().clear();
        self.warmed.store(false, Ordering::Release);
    }
}

/// Index contents built off to the side, installed only once complete
#[derive(Debug, Default)]
pub struct Replay {
    subjects: FxHashMap<String, PredicateMap>,
    applied: usize,
}

impl Replay {
    /// Empty replay
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event with the same rules as [`LatestIndex::apply`].
    pub fn apply(&mut self, event: &Event) {
        LatestIndex::apply_locked(&mut self.subjects, event);
        self.applied += 1;
    }

    /// Events applied so far
    pub fn applied(&self) -> usize {
        self.applied
    }
}

impl FromIterator<Event> for Replay {
    fn from_iter<I: IntoIterator<Item = Event>>(events: I) -> Self {
        let mut replay = Replay::new();
        for event in events {
            replay.apply(&event);
        }
        replay
    }
}

impl Default for LatestIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LatestIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LatestIndex")
            .field("pairs", &self.len())
            .field("warmed", &self.is_warm())
            .finish()
    }
}
