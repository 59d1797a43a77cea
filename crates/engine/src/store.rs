//! The store facade
//!
//! [`StateStore`] is the capability set every backend provides. Two
//! implementations ship with the crate:
//!
//! - [`JsonlStore`](crate::JsonlStore): the durable backend (event log plus
//!   card projection on disk)
//! - [`MemoryStore`](crate::MemoryStore): an in-process fake with the same
//!   observable semantics, for tests
//!
//! The trait is object safe, so callers can hold `Arc<dyn StateStore>`.

use std::collections::BTreeMap;

use factlog_core::{Event, FactlogResult, Query};
use serde_json::{Map, Value};

use crate::cards::Properties;

/// Event-sourced state store
pub trait StateStore: Send + Sync {
    /// Append events to the log
    ///
    /// ## Semantics
    ///
    /// - Events land in call order, one record each
    /// - The call returns once the records are durable
    /// - The latest-value index is updated for every event: Set/Assert
    ///   replace the pair, Retract removes it
    ///
    /// ## Return Value
    ///
    /// The event ids, in the order given.
    ///
    /// ## Errors
    ///
    /// - `Io`: the log could not be written
    fn append(&self, events: Vec<Event>) -> FactlogResult<Vec<String>>;

    /// Filter the log
    ///
    /// Scans every record. Matches are ordered by timestamp (see
    /// [`Query::newest_first`]) and then cut to [`Query::limit`], so the
    /// result is always the globally newest (or oldest) matches.
    /// Malformed records and unparsable time bounds never produce errors.
    fn query(&self, query: &Query) -> FactlogResult<Vec<Event>>;

    /// Latest value per predicate of `subject`
    ///
    /// With `predicate` set, only that predicate is returned. Unknown
    /// subjects give an empty map.
    fn materialize(
        &self,
        subject: &str,
        predicate: Option<&str>,
    ) -> FactlogResult<BTreeMap<String, String>>;

    /// Merge properties into a card and record them in the log
    ///
    /// ## Semantics
    ///
    /// - `id` is normalized to `card:<id>` unless already prefixed
    /// - Existing properties not in `properties` are kept
    /// - The projection document is replaced atomically
    /// - One Set event per given property is appended (actor `CardTool`,
    ///   tag `card`)
    fn upsert_card(&self, id: &str, properties: Properties) -> FactlogResult<()>;

    /// Merged properties of one card, empty when unknown
    fn read_card(&self, id: &str) -> FactlogResult<Properties>;

    /// Every card, each with `"id": "card:<id>"` as its first entry
    fn list_cards(&self) -> FactlogResult<Vec<Properties>>;

    /// The `n` most recent decodable events, oldest first
    fn tail(&self, n: usize) -> FactlogResult<Vec<Event>>;

    /// The whole card projection, keyed by `card:<id>`
    fn export_cards(&self) -> FactlogResult<Map<String, Value>>;
}
