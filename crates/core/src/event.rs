//! Event model
//!
//! An [`Event`] is one immutable fact about a triple: who changed it, when,
//! and whether the value was asserted, set or retracted. Events are the only
//! thing the log stores; every other view is derived from them.
//!
//! ## Wire format
//!
//! One JSON object per record:
//!
//! ```text
//! {"id":"…","ts":"2025-11-12T10:30:00Z","actor":"Scribe","op":"set",
//!  "triple":["card:roswell","year","1947"],"meta":{"tags":["card"]}}
//! ```
//!
//! A `triple` that is not exactly three strings fails to decode, which is
//! how readers recognise malformed records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::time;

/// Open metadata attached to an event.
pub type Meta = serde_json::Map<String, Value>;

/// Metadata key holding the event's tag list.
pub const TAGS_KEY: &str = "tags";

/// Operation carried by an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    /// Record a fact; materializes like `Set`.
    Assert,
    /// Overwrite the current value of (subject, predicate).
    Set,
    /// Withdraw the current value of (subject, predicate).
    Retract,
}

impl Op {
    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Assert => "assert",
            Op::Set => "set",
            Op::Retract => "retract",
        }
    }

    /// True for operations that establish a value.
    pub fn is_write(&self) -> bool {
        matches!(self, Op::Assert | Op::Set)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A (subject, predicate, object) fact.
///
/// Serializes as a three-element JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple(pub String, pub String, pub String);

impl Triple {
    /// Build a triple from anything string-like.
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Triple(subject.into(), predicate.into(), object.into())
    }

    /// The entity the fact is about.
    pub fn subject(&self) -> &str {
        &self.0
    }

    /// The property being described.
    pub fn predicate(&self) -> &str {
        &self.1
    }

    /// The value.
    pub fn object(&self) -> &str {
        &self.2
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} :: {} -> {}", self.0, self.1, self.2)
    }
}

/// Immutable record in the event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier (UUID v4 text)
    pub id: String,
    /// UTC timestamp as text
    pub ts: String,
    /// Agent or tool that produced the change
    pub actor: String,
    /// Operation
    pub op: Op,
    /// The fact
    pub triple: Triple,
    /// Free-form metadata; `null` on disk reads as empty
    #[serde(default, deserialize_with = "null_as_empty")]
    pub meta: Meta,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Meta, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Meta>::deserialize(deserializer)?.unwrap_or_default())
}

impl Event {
    /// Create an event with a fresh id and the current timestamp.
    pub fn new(actor: impl Into<String>, op: Op, triple: Triple) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            ts: time::now_iso(),
            actor: actor.into(),
            op,
            triple,
            meta: Meta::new(),
        }
    }

    /// Shorthand for a `Set` event.
    pub fn set(
        actor: impl Into<String>,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self::new(actor, Op::Set, Triple::new(subject, predicate, object))
    }

    /// Shorthand for an `Assert` event.
    pub fn assert(
        actor: impl Into<String>,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self::new(actor, Op::Assert, Triple::new(subject, predicate, object))
    }

    /// Shorthand for a `Retract` event.
    pub fn retract(
        actor: impl Into<String>,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self::new(actor, Op::Retract, Triple::new(subject, predicate, object))
    }

    /// Use an explicit timestamp (diegetic time) instead of the clock.
    pub fn with_ts(mut self, ts: impl Into<String>) -> Self {
        self.ts = ts.into();
        self
    }

    /// Replace the metadata map.
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Set a single metadata entry.
    pub fn with_meta_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Set `meta.tags`.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags = tags
            .into_iter()
            .map(|t| Value::String(t.into()))
            .collect::<Vec<_>>();
        self.meta.insert(TAGS_KEY.to_string(), Value::Array(tags));
        self
    }

    /// Tags in `meta.tags`, ignoring non-string entries.
    pub fn tags(&self) -> Vec<&str> {
        match self.meta.get(TAGS_KEY) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// True if `meta.tags` contains `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        match self.meta.get(TAGS_KEY) {
            Some(Value::Array(items)) => items.iter().any(|t| t.as_str() == Some(tag)),
            _ => false,
        }
    }

    /// The timestamp as an instant, if it parses.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        time::parse_instant(&self.ts)
    }

    /// Encode as one log line (no trailing newline).
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode one log line.
    pub fn from_json_line(line: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(line)
    }
}
