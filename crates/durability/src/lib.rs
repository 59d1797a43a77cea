//! Durability layer for factlog
//!
//! - `log`: the append-only JSONL event log (writer, forward reader,
//!   backward tail reader)
//! - `atomic`: crash-safe whole-document writes (temp file + rename)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod atomic;
pub mod log;

pub use atomic::{write_atomic, write_atomic_with};
pub use log::{EventLog, LogScan, ScanStats, DEFAULT_TAIL_BLOCK_SIZE};
