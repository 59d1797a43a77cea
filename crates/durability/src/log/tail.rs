//! Backward tail reader
//!
//! Reads the log from its end in fixed-size blocks and decodes complete
//! lines newest-first until enough records have decoded or the start of the
//! file is reached. Cost depends on `n` and record size, not on the length
//! of the log.
//!
//! Undecodable lines are skipped and do not count toward `n`; the scan keeps
//! walking backward past them.

use std::io::{self, Read, Seek, SeekFrom};

use factlog_core::Event;

use super::trim_record;

/// Block size used when the caller has no preference
pub const DEFAULT_TAIL_BLOCK_SIZE: usize = 4096;

/// Return the `n` most recent decodable records, oldest first.
///
/// `block_size` is clamped to at least one byte.
pub fn read_tail<R: Read + Seek>(
    reader: &mut R,
    n: usize,
    block_size: usize,
) -> io::Result<Vec<Event>> {
    if n == 0 {
        return Ok(Vec::new());
    }
    let block_size = block_size.max(1);

    let mut pos = reader.seek(SeekFrom::End(0))?;
    let mut block = vec![0u8; block_size];
    // Bytes before the first newline seen so far: the head of a line whose
    // start has not been read yet.
    let mut carry: Vec<u8> = Vec::new();
    let mut newest_first: Vec<Event> = Vec::with_capacity(n);

    while pos > 0 && newest_first.len() < n {
        let step = pos.min(block_size as u64) as usize;
        pos -= step as u64;
        reader.seek(SeekFrom::Start(pos))?;
        reader.read_exact(&mut block[..step])?;

        let mut buf = Vec::with_capacity(step + carry.len());
        buf.extend_from_slice(&block[..step]);
        buf.extend_from_slice(&carry);

        match buf.iter().position(|&b| b == b'\n') {
            Some(first) => {
                for line in buf[first + 1..].rsplit(|&b| b == b'\n') {
                    if newest_first.len() >= n {
                        break;
                    }
                    decode_candidate(line, &mut newest_first);
                }
                buf.truncate(first);
                carry = buf;
            }
            None => carry = buf,
        }
    }

    // The first line of the file has no newline in front of it
    if pos == 0 && newest_first.len() < n {
        decode_candidate(&carry, &mut newest_first);
    }

    newest_first.reverse();
    Ok(newest_first)
}

fn decode_candidate(raw: &[u8], out: &mut Vec<Event>) {
    let line = trim_record(raw);
    if line.is_empty() {
        return;
    }
    match Event::from_json_line(line) {
        Ok(event) => out.push(event),
        Err(e) => {
            tracing::debug!(target: "factlog::log", error = %e, "tail skipping malformed record");
        }
    }
}
