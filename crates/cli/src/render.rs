//! Output formats for `factlog-tail`

use factlog_core::Event;

/// `<ts>  <actor:12>  <op:7>  <s> :: <p> -> <o>  [<tags>]`
pub fn render_line(event: &Event) -> String {
    format!(
        "{}  {:12}  {:7}  {} :: {} -> {}  [{}]",
        event.ts,
        event.actor,
        event.op,
        event.triple.subject(),
        event.triple.predicate(),
        event.triple.object(),
        event.tags().join(","),
    )
}

/// Pretty-printed JSON array of full records
pub fn render_json(events: &[Event]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(events)
}
