//! Store engine for factlog
//!
//! Ties the layers together behind the [`StateStore`] trait:
//! - `config`: [`StoreConfig`], the per-store paths and tuning knobs
//! - `query`: filter, order and truncate a log scan
//! - `cards`: the card projection document
//! - `jsonl`: [`JsonlStore`], the durable backend
//! - `memory`: [`MemoryStore`], the in-process fake
//!
//! ```ignore
//! use factlog_engine::{JsonlStore, StateStore};
//!
//! let store = JsonlStore::open_dir("data")?;
//! store.append(vec![Event::set("Agent", "card:area51", "name", "Area 51")])?;
//! let state = store.materialize("card:area51", None)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cards;
pub mod config;
pub mod jsonl;
pub mod memory;
pub mod query;
pub mod store;

pub use cards::{
    coerce_text, normalize_card_id, CardProjection, Properties, CARD_ACTOR, CARD_PREFIX, CARD_TAG,
};
pub use config::{StoreConfig, ENV_CARDS_FILE, ENV_DATA_DIR, ENV_EVENTS_FILE};
pub use jsonl::JsonlStore;
pub use memory::MemoryStore;
pub use query::{run_query, QueryFilter};
pub use store::StateStore;
