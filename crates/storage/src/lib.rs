//! In-memory indices for factlog
//!
//! - [`LatestIndex`]: (subject, predicate) → most recent value, fed by
//!   appends and rebuilt by replaying the log

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod latest;

pub use latest::{LatestIndex, LatestValue, Replay};
