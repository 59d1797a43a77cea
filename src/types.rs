//! Public types for the factlog API.
//!
//! Re-exports the types callers need from the internal crates under one
//! path.

// ============================================================================
// Fact records
// ============================================================================

pub use factlog_core::{Event, Meta, Op, Triple, TAGS_KEY};

// ============================================================================
// Queries and time bounds
// ============================================================================

pub use factlog_core::time::{format_instant, now_iso};
pub use factlog_core::{
    parse_instant, parse_relative, parse_relative_at, Query, DEFAULT_QUERY_LIMIT,
};

// ============================================================================
// Errors
// ============================================================================

pub use factlog_core::{FactlogError, FactlogResult};

// ============================================================================
// Stores, configuration and cards
// ============================================================================

pub use factlog_engine::{
    normalize_card_id, JsonlStore, MemoryStore, Properties, StateStore, StoreConfig, CARD_ACTOR,
    CARD_PREFIX, CARD_TAG,
};

// ============================================================================
// Log inspection
// ============================================================================

pub use factlog_durability::ScanStats;
