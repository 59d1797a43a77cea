//! Core types for factlog
//!
//! This crate defines the pieces every other layer shares:
//! - [`Event`], [`Triple`], [`Op`]: the immutable fact record
//! - [`Query`]: the filter spec consumed by the query engine
//! - [`time`]: timestamp formatting and the relative-time parser
//! - [`FactlogError`]: the error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod event;
pub mod query;
pub mod time;

pub use error::{FactlogError, FactlogResult};
pub use event::{Event, Meta, Op, Triple, TAGS_KEY};
pub use query::{Query, DEFAULT_QUERY_LIMIT};
pub use time::{parse_instant, parse_relative, parse_relative_at};
