//! Query execution over a forward log scan
//!
//! [`run_query`] consumes events in log order, keeps the ones that pass the
//! compiled [`QueryFilter`], orders them by timestamp and truncates to the
//! query limit. The candidate buffer is sorted and cut back to `limit`
//! whenever it grows past twice the limit, so memory stays proportional to
//! the limit rather than to the number of matches.
//!
//! Ordering is by parsed instant, descending for `newest_first` and
//! ascending otherwise. Events with equal instants keep log order in both
//! directions.
//!
//! A record whose `ts` does not parse has no instant. It still matches the
//! other filters and ranks older than every dated record, but it never
//! passes an active `since` or `until` bound.

use chrono::{DateTime, Utc};
use factlog_core::{parse_relative, Event, Query};

/// A [`Query`] with its time bounds resolved to instants
#[derive(Debug, Clone)]
pub struct QueryFilter<'q> {
    query: &'q Query,
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
}

impl<'q> QueryFilter<'q> {
    /// Resolve `since`/`until` against the current clock.
    ///
    /// A bound that does not parse is dropped with a warning; the rest of
    /// the filter still applies.
    pub fn compile(query: &'q Query) -> Self {
        Self {
            query,
            since: resolve_bound("since", query.since.as_deref()),
            until: resolve_bound("until", query.until.as_deref()),
        }
    }

    /// Resolved lower bound
    pub fn since(&self) -> Option<DateTime<Utc>> {
        self.since
    }

    /// Resolved upper bound
    pub fn until(&self) -> Option<DateTime<Utc>> {
        self.until
    }

    /// Does `event`, stamped at `instant`, pass every active filter?
    ///
    /// `None` is an undated record: it fails any resolved time bound.
    pub fn matches(&self, event: &Event, instant: Option<DateTime<Utc>>) -> bool {
        let q = self.query;
        if let Some(s) = &q.subject {
            if event.triple.subject() != s {
                return false;
            }
        }
        if let Some(p) = &q.predicate {
            if event.triple.predicate() != p {
                return false;
            }
        }
        if let Some(o) = &q.object {
            if event.triple.object() != o {
                return false;
            }
        }
        if let Some(tag) = &q.tag {
            if !event.has_tag(tag) {
                return false;
            }
        }
        match instant {
            Some(instant) => {
                !(self.since.map_or(false, |since| instant < since)
                    || self.until.map_or(false, |until| instant > until))
            }
            None => self.since.is_none() && self.until.is_none(),
        }
    }
}

fn resolve_bound(name: &str, text: Option<&str>) -> Option<DateTime<Utc>> {
    let text = text?;
    let resolved = parse_relative(text);
    if resolved.is_none() {
        tracing::warn!(
            target: "factlog::query",
            bound = name,
            value = text,
            "ignoring unparsable time bound"
        );
    }
    resolved
}

// `None < Some(_)`, so undated candidates sort as the oldest.
struct Candidate {
    instant: Option<DateTime<Utc>>,
    seq: u64,
    event: Event,
}

/// Bounded, ordered collection of matches
struct TopN {
    limit: usize,
    newest_first: bool,
    items: Vec<Candidate>,
}

impl TopN {
    fn new(limit: usize, newest_first: bool) -> Self {
        Self {
            limit,
            newest_first,
            items: Vec::with_capacity(limit.min(1024).saturating_mul(2)),
        }
    }

    fn push(&mut self, seq: u64, instant: Option<DateTime<Utc>>, event: Event) {
        self.items.push(Candidate { instant, seq, event });
        if self.items.len() > self.limit.saturating_mul(2) {
            self.compact();
        }
    }

    fn compact(&mut self) {
        if self.newest_first {
            self.items
                .sort_unstable_by(|a, b| b.instant.cmp(&a.instant).then(a.seq.cmp(&b.seq)));
        } else {
            self.items
                .sort_unstable_by(|a, b| a.instant.cmp(&b.instant).then(a.seq.cmp(&b.seq)));
        }
        self.items.truncate(self.limit);
    }

    fn finish(mut self) -> Vec<Event> {
        self.compact();
        self.items.into_iter().map(|c| c.event).collect()
    }
}

/// Filter, order and truncate `events` (given in log order) per `query`.
pub fn run_query<I>(events: I, query: &Query) -> Vec<Event>
where
    I: IntoIterator<Item = Event>,
{
    if query.limit == 0 {
        return Vec::new();
    }

    let filter = QueryFilter::compile(query);
    let mut top = TopN::new(query.limit, query.newest_first);
    let mut scanned = 0u64;
    let mut undated = 0u64;

    for event in events {
        let seq = scanned;
        scanned += 1;
        let instant = event.instant();
        if instant.is_none() {
            undated += 1;
        }
        if filter.matches(&event, instant) {
            top.push(seq, instant, event);
        }
    }

    let results = top.finish();
    tracing::debug!(
        target: "factlog::query",
        scanned,
        undated,
        returned = results.len(),
        "query complete"
    );
    results
}
