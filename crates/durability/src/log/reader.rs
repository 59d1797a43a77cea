//! Forward log scan
//!
//! Yields every decodable record in file order. Blank lines are ignored;
//! lines that fail to decode (bad JSON, unknown op, triple of the wrong
//! length) are skipped and counted. A read error ends the iteration early;
//! [`LogScan::finish`] returns it.

use std::io::{self, BufRead};

use factlog_core::Event;

/// Counters collected while scanning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Non-blank lines seen
    pub lines: u64,
    /// Lines decoded into events
    pub decoded: u64,
    /// Lines skipped as malformed
    pub skipped: u64,
    /// True if the scan stopped on an I/O error
    pub truncated: bool,
}

/// Iterator over the decodable records of a log
pub struct LogScan<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: u64,
    stats: ScanStats,
    error: Option<io::Error>,
    done: bool,
}

impl<R: BufRead> LogScan<R> {
    /// Scan records from any buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(512),
            line_no: 0,
            stats: ScanStats::default(),
            error: None,
            done: false,
        }
    }

    /// Counters so far; final once the iterator is exhausted.
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Drain what is left and return the final counters, or the read error
    /// that cut the scan short.
    pub fn finish(&mut self) -> io::Result<ScanStats> {
        for _ in self.by_ref() {}
        if !self.stats.truncated {
            return Ok(self.stats);
        }
        Err(self.error.take().unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::Other, "log scan stopped on read error")
        }))
    }
}

impl<R: BufRead> Iterator for LogScan<R> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        while !self.done {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.done = true;
                }
                Ok(_) => {
                    self.line_no += 1;
                    let line = super::trim_record(&self.buf);
                    if line.is_empty() {
                        continue;
                    }
                    self.stats.lines += 1;
                    match Event::from_json_line(line) {
                        Ok(event) => {
                            self.stats.decoded += 1;
                            return Some(event);
                        }
                        Err(e) => {
                            self.stats.skipped += 1;
                            tracing::debug!(
                                target: "factlog::log",
                                line = self.line_no,
                                error = %e,
                                "skipping malformed record"
                            );
                        }
                    }
                }
                Err(e) => {
                    self.done = true;
                    self.stats.truncated = true;
                    tracing::warn!(
                        target: "factlog::log",
                        line = self.line_no,
                        error = %e,
                        "log scan stopped on read error"
                    );
                    self.error = Some(e);
                }
            }
        }
        None
    }
}
