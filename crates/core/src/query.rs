//! Query specification
//!
//! A [`Query`] describes which events to pull out of the log. Every field is
//! optional: an absent triple component is a wildcard, absent time bounds
//! leave the window open. `since`/`until` are kept as text and resolved by
//! the query engine at execution time, so relative bounds such as `-2h` are
//! evaluated against the clock when the query runs.

use serde::{Deserialize, Serialize};

/// Default result cap.
pub const DEFAULT_QUERY_LIMIT: usize = 100;

/// Filter and ordering spec for a log scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    /// Exact subject match
    #[serde(alias = "s")]
    pub subject: Option<String>,
    /// Exact predicate match
    #[serde(alias = "p")]
    pub predicate: Option<String>,
    /// Exact object match
    #[serde(alias = "o")]
    pub object: Option<String>,
    /// Inclusive lower time bound (absolute or relative)
    pub since: Option<String>,
    /// Inclusive upper time bound (absolute or relative)
    pub until: Option<String>,
    /// Required entry in `meta.tags`
    pub tag: Option<String>,
    /// Maximum number of events returned
    pub limit: usize,
    /// Newest first when true, oldest first otherwise
    pub newest_first: bool,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            subject: None,
            predicate: None,
            object: None,
            since: None,
            until: None,
            tag: None,
            limit: DEFAULT_QUERY_LIMIT,
            newest_first: true,
        }
    }
}

impl Query {
    /// Match everything, newest first, up to the default limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on subject.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Filter on predicate.
    pub fn predicate(mut self, predicate: impl Into<String>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    /// Filter on object.
    pub fn object(mut self, object: impl Into<String>) -> Self {
        self.object = Some(object.into());
        self
    }

    /// Lower time bound.
    pub fn since(mut self, since: impl Into<String>) -> Self {
        self.since = Some(since.into());
        self
    }

    /// Upper time bound.
    pub fn until(mut self, until: impl Into<String>) -> Self {
        self.until = Some(until.into());
        self
    }

    /// Tag filter.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Result cap.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Ordering.
    pub fn newest_first(mut self, newest_first: bool) -> Self {
        self.newest_first = newest_first;
        self
    }

    /// True when no filter is set (only limit/ordering).
    pub fn is_unfiltered(&self) -> bool {
        self.subject.is_none()
            && self.predicate.is_none()
            && self.object.is_none()
            && self.since.is_none()
            && self.until.is_none()
            && self.tag.is_none()
    }
}
