//! Durable appends
//!
//! Each call is one open/write/sync/close cycle. All records of a call are
//! encoded before anything touches the file, so an encoding failure writes
//! nothing.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use factlog_core::{Event, FactlogError, FactlogResult};

/// Append `events` to the log at `path`, returning their ids in order.
pub(crate) fn append_events(path: &Path, events: &[Event]) -> FactlogResult<Vec<String>> {
    if events.is_empty() {
        return Ok(Vec::new());
    }

    let mut encoded = Vec::with_capacity(events.len() * 192);
    for event in events {
        let line = event
            .to_json_line()
            .map_err(|e| FactlogError::serialization(e.to_string()))?;
        encoded.extend_from_slice(line.as_bytes());
        encoded.push(b'\n');
    }

    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)?;

    let torn = ends_with_torn_record(&mut file)?;
    if torn {
        tracing::warn!(
            target: "factlog::log",
            path = %path.display(),
            "log ends with an unterminated record; terminating it before append"
        );
    }

    let mut writer = BufWriter::new(&file);
    if torn {
        writer.write_all(b"\n")?;
    }
    writer.write_all(&encoded)?;
    writer.flush()?;
    drop(writer);

    // Force fsync before reporting success
    file.sync_all()?;

    tracing::trace!(target: "factlog::log", count = events.len(), "events appended");
    Ok(events.iter().map(|e| e.id.clone()).collect())
}

/// True when the file is non-empty and its last byte is not `\n`.
fn ends_with_torn_record(file: &mut File) -> std::io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}
