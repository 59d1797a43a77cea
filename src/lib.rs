//! factlog: an embedded event-sourcing store for agent state
//!
//! Facts are recorded as immutable `(subject, predicate, object)` events in
//! an append-only JSONL log. Current state is derived from the log: a
//! latest-value index answers "what is true now" for a subject, and a card
//! projection keeps mutable property maps for named entities.
//!
//! # Quick Start
//!
//! ```no_run
//! use factlog::{Event, JsonlStore, Query, StateStore};
//!
//! # fn main() -> factlog::FactlogResult<()> {
//! let store = JsonlStore::open_dir("data")?;
//!
//! store.append(vec![
//!     Event::set("Researcher", "card:area51", "name", "Area 51"),
//!     Event::set("Researcher", "card:area51", "category", "military base"),
//! ])?;
//!
//! let state = store.materialize("card:area51", None)?;
//! assert_eq!(state["name"], "Area 51");
//!
//! let recent = store.query(&Query::new().subject("card:area51").since("-2h").limit(10))?;
//! # let _ = recent;
//! # Ok(())
//! # }
//! ```
//!
//! # Crates
//!
//! - `factlog-core`: events, queries, time parsing, errors
//! - `factlog-storage`: the latest-value index
//! - `factlog-durability`: the JSONL log and atomic document writes
//! - `factlog-engine`: config, query engine, cards and the store backends

#![warn(missing_docs)]

pub mod types;

pub use types::*;
