//! Card projection
//!
//! A card is a mutable property map keyed by `card:<id>`. The projection
//! document (`cards.index.json`) holds every card and is the system of
//! record for card reads; each upsert also emits one Set event per property
//! so the log carries the history.
//!
//! The document is rewritten whole on every upsert through
//! [`write_atomic_with`], so a crash mid-write leaves the previous version
//! in place.

use std::path::{Path, PathBuf};

use factlog_core::{Event, FactlogResult};
use factlog_durability::write_atomic_with;
use serde_json::{Map, Value};

/// Namespace prefix of card subjects
pub const CARD_PREFIX: &str = "card:";
/// Actor recorded on events emitted by card upserts
pub const CARD_ACTOR: &str = "CardTool";
/// Tag attached to events emitted by card upserts
pub const CARD_TAG: &str = "card";

/// Property map of one card, in insertion order
pub type Properties = Map<String, Value>;

/// `x` → `card:x`; already-prefixed ids pass through.
pub fn normalize_card_id(id: &str) -> String {
    if id.starts_with(CARD_PREFIX) {
        id.to_string()
    } else {
        format!("{}{}", CARD_PREFIX, id)
    }
}

/// Text form of a property value as it appears in a triple object.
///
/// Strings are taken verbatim; anything else is its compact JSON text.
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Set events recording an upsert of `properties` onto card `id`.
pub fn card_events(id: &str, properties: &Properties) -> Vec<Event> {
    let subject = normalize_card_id(id);
    properties
        .iter()
        .map(|(key, value)| {
            Event::set(CARD_ACTOR, subject.clone(), key.clone(), coerce_text(value))
                .with_tags([CARD_TAG])
                .with_meta_entry("card_id", id)
        })
        .collect()
}

/// Merge `properties` into the card map `cards[key]`, creating it if absent.
pub(crate) fn merge_into(cards: &mut Map<String, Value>, key: String, properties: &Properties) {
    let slot = cards
        .entry(key)
        .or_insert_with(|| Value::Object(Properties::new()));
    if !slot.is_object() {
        *slot = Value::Object(Properties::new());
    }
    if let Value::Object(existing) = slot {
        for (k, v) in properties {
            existing.insert(k.clone(), v.clone());
        }
    }
}

/// Merged properties of card `key`, empty when unknown.
pub(crate) fn card_properties(cards: &Map<String, Value>, key: &str) -> Properties {
    match cards.get(key) {
        Some(Value::Object(props)) => props.clone(),
        _ => Properties::new(),
    }
}

/// One map per card with `id` first; the key wins over a stored `id`.
pub(crate) fn card_listing(cards: &Map<String, Value>) -> Vec<Properties> {
    cards
        .iter()
        .map(|(key, value)| {
            let mut entry = Properties::new();
            entry.insert("id".to_string(), Value::String(key.clone()));
            if let Value::Object(props) = value {
                for (k, v) in props {
                    if k != "id" {
                        entry.insert(k.clone(), v.clone());
                    }
                }
            }
            entry
        })
        .collect()
}

/// The projection document and the file backing it
#[derive(Debug)]
pub struct CardProjection {
    path: PathBuf,
    cards: Map<String, Value>,
}

impl CardProjection {
    /// Load the projection at `path`.
    ///
    /// A missing document is created as `{}`. An unreadable or corrupt one
    /// is logged and treated as empty; it is replaced on the next upsert.
    pub fn load(path: impl AsRef<Path>) -> FactlogResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            write_atomic_with(&path, |w| w.write_all(b"{}"))?;
            return Ok(Self {
                path,
                cards: Map::new(),
            });
        }

        let cards = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<Value>(&bytes) {
                Ok(Value::Object(cards)) => cards,
                Ok(_) => {
                    tracing::warn!(
                        target: "factlog::cards",
                        path = %path.display(),
                        "card projection is not a JSON object, starting empty"
                    );
                    Map::new()
                }
                Err(e) => {
                    tracing::warn!(
                        target: "factlog::cards",
                        path = %path.display(),
                        error = %e,
                        "card projection is corrupt, starting empty"
                    );
                    Map::new()
                }
            },
            Err(e) => {
                tracing::warn!(
                    target: "factlog::cards",
                    path = %path.display(),
                    error = %e,
                    "card projection is unreadable, starting empty"
                );
                Map::new()
            }
        };

        tracing::debug!(target: "factlog::cards", cards = cards.len(), "card projection loaded");
        Ok(Self { path, cards })
    }

    /// Path of the projection document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Merge `properties` into card `id`, persist the document and return
    /// the Set events describing the change.
    ///
    /// The in-memory map only changes once the document is on disk.
    pub fn upsert(&mut self, id: &str, properties: &Properties) -> FactlogResult<Vec<Event>> {
        let key = normalize_card_id(id);
        let mut next = self.cards.clone();
        merge_into(&mut next, key.clone(), properties);
        self.save(&next)?;
        self.cards = next;

        tracing::debug!(
            target: "factlog::cards",
            card = %key,
            properties = properties.len(),
            "card upserted"
        );
        Ok(card_events(id, properties))
    }

    /// Merged properties of card `id`, empty when unknown.
    pub fn read(&self, id: &str) -> Properties {
        card_properties(&self.cards, &normalize_card_id(id))
    }

    /// Every card, in projection order, with `id` as its first entry
    pub fn list(&self) -> Vec<Properties> {
        card_listing(&self.cards)
    }

    /// The whole projection document
    pub fn export(&self) -> Map<String, Value> {
        self.cards.clone()
    }

    /// Number of cards
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// True when no card exists
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    fn save(&self, cards: &Map<String, Value>) -> FactlogResult<()> {
        write_atomic_with(&self.path, |w| {
            serde_json::to_writer_pretty(&mut *w, cards)?;
            Ok(())
        })
    }
}
