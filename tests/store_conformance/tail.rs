//! Tail reads

use factlog::Event;

use crate::test_utils::for_each_backend;

fn numbered(count: usize) -> Vec<Event> {
    (0..count)
        .map(|i| Event::set("TestAgent", format!("card:{}", i), "index", i.to_string()))
        .collect()
}

#[test]
fn test_tail_ascending() {
    for_each_backend(|name, store| {
        let events = numbered(10);
        store.append(events.clone()).unwrap();
        assert_eq!(store.tail(5).unwrap(), events[5..].to_vec(), "{}", name);
    });
}

#[test]
fn test_tail_more_than_available() {
    for_each_backend(|name, store| {
        let events = numbered(3);
        store.append(events.clone()).unwrap();
        assert_eq!(store.tail(50).unwrap(), events, "{}", name);
    });
}

#[test]
fn test_tail_empty_and_zero() {
    for_each_backend(|name, store| {
        assert!(store.tail(5).unwrap().is_empty(), "{}", name);
        store.append(numbered(2)).unwrap();
        assert!(store.tail(0).unwrap().is_empty(), "{}", name);
    });
}

#[test]
fn test_tail_ignores_timestamps() {
    for_each_backend(|name, store| {
        store
            .append(vec![
                Event::set("a", "s", "p", "first").with_ts("2030-01-01T00:00:00Z"),
                Event::set("a", "s", "p", "second").with_ts("2001-01-01T00:00:00Z"),
            ])
            .unwrap();
        let tail = store.tail(1).unwrap();
        assert_eq!(tail[0].triple.object(), "second", "{}", name);
    });
}

#[test]
fn test_tail_spans_many_appends() {
    for_each_backend(|name, store| {
        let events = numbered(200);
        for chunk in events.chunks(7) {
            store.append(chunk.to_vec()).unwrap();
        }
        assert_eq!(store.tail(120).unwrap(), events[80..].to_vec(), "{}", name);
    });
}
