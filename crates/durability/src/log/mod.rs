//! Append-only event log
//!
//! - `writer`: durable appends (one JSON record per line, fsync'd)
//! - `reader`: forward scan that skips malformed records
//! - `tail`: backward block scan for the most recent records
//!
//! # File Format
//!
//! ```text
//! {"id":…,"ts":…,"actor":…,"op":…,"triple":[s,p,o],"meta":{…}}\n
//! {"id":…}\n
//! ```
//!
//! The file is never rewritten in place. A record cut short by a crash is
//! left where it is; readers skip it and the next append terminates it.

pub mod reader;
pub mod tail;
pub mod writer;

use std::fs::{self, File, OpenOptions};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use factlog_core::{Event, FactlogResult};

pub use reader::{LogScan, ScanStats};
pub use tail::DEFAULT_TAIL_BLOCK_SIZE;

/// Handle on one log file
///
/// Holds only the path. Every append opens, writes, syncs and closes the
/// file; callers that share a log between threads must serialize appends.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    /// Open a log, creating its directory and an empty file if absent.
    pub fn open(path: impl AsRef<Path>) -> FactlogResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path })
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append events in order and return their ids.
    ///
    /// Returns only after the records are flushed and fsync'd.
    pub fn append(&self, events: &[Event]) -> FactlogResult<Vec<String>> {
        writer::append_events(&self.path, events)
    }

    /// Forward scan over every decodable record.
    pub fn scan(&self) -> FactlogResult<LogScan<BufReader<File>>> {
        let file = File::open(&self.path)?;
        Ok(LogScan::new(BufReader::new(file)))
    }

    /// The `n` most recent decodable records, oldest first.
    pub fn tail(&self, n: usize, block_size: usize) -> FactlogResult<Vec<Event>> {
        let mut file = File::open(&self.path)?;
        Ok(tail::read_tail(&mut file, n, block_size)?)
    }

    /// Current size of the log file in bytes
    pub fn size_bytes(&self) -> FactlogResult<u64> {
        Ok(fs::metadata(&self.path)?.len())
    }
}

/// Strip surrounding ASCII whitespace (including `\r`) from a raw line.
pub(crate) fn trim_record(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}
