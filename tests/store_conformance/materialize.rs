//! Latest-value materialization

use std::collections::BTreeMap;

use factlog::Event;

use crate::test_utils::for_each_backend;

#[test]
fn test_last_write_wins() {
    for_each_backend(|name, store| {
        store
            .append(vec![
                Event::set("a", "s", "p", "v1"),
                Event::set("a", "s", "p", "v2"),
            ])
            .unwrap();

        assert_eq!(
            store.materialize("s", None).unwrap(),
            BTreeMap::from([("p".to_string(), "v2".to_string())]),
            "{}",
            name
        );
    });
}

#[test]
fn test_retract_removes_pair() {
    for_each_backend(|name, store| {
        store
            .append(vec![
                Event::set("a", "card:x", "status", "active"),
                Event::set("a", "card:x", "name", "X"),
            ])
            .unwrap();
        store
            .append(vec![Event::retract("a", "card:x", "status", "active")])
            .unwrap();

        let state = store.materialize("card:x", None).unwrap();
        assert!(!state.contains_key("status"), "{}", name);
        assert_eq!(state.get("name").map(String::as_str), Some("X"), "{}", name);
    });
}

#[test]
fn test_retract_is_still_logged() {
    for_each_backend(|name, store| {
        store.append(vec![Event::set("a", "s", "p", "v")]).unwrap();
        store.append(vec![Event::retract("a", "s", "p", "v")]).unwrap();

        let tail = store.tail(10).unwrap();
        assert_eq!(tail.len(), 2, "{}", name);
        assert_eq!(tail[1].op, factlog::Op::Retract, "{}", name);
    });
}

#[test]
fn test_single_predicate() {
    for_each_backend(|name, store| {
        store
            .append(vec![
                Event::set("a", "s", "p", "1"),
                Event::set("a", "s", "q", "2"),
            ])
            .unwrap();

        let only_q = store.materialize("s", Some("q")).unwrap();
        assert_eq!(only_q.len(), 1, "{}", name);
        assert_eq!(only_q["q"], "2");
        assert!(store.materialize("s", Some("missing")).unwrap().is_empty());
    });
}

#[test]
fn test_unknown_subject_is_empty() {
    for_each_backend(|name, store| {
        assert!(store.materialize("card:nobody", None).unwrap().is_empty(), "{}", name);
    });
}

#[test]
fn test_assert_counts_as_write() {
    for_each_backend(|name, store| {
        store.append(vec![Event::assert("a", "s", "p", "v")]).unwrap();
        assert_eq!(store.materialize("s", None).unwrap()["p"], "v", "{}", name);
    });
}

#[test]
fn test_log_order_decides_not_timestamps() {
    for_each_backend(|name, store| {
        store
            .append(vec![
                Event::set("a", "s", "p", "later-ts").with_ts("2030-01-01T00:00:00Z"),
                Event::set("a", "s", "p", "earlier-ts").with_ts("2020-01-01T00:00:00Z"),
            ])
            .unwrap();
        assert_eq!(store.materialize("s", None).unwrap()["p"], "earlier-ts", "{}", name);
    });
}
