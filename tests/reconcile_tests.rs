use serde_json::json;
use std::collections::HashSet;
use tablemirror::{ChangeEvent, ChangeKind, Record, apply_change};

fn rec(value: serde_json::Value) -> Record {
    Record::from_value(value).unwrap()
}

fn ids(rows: &[Record]) -> Vec<String> {
    rows.iter()
        .map(|row| row.get("client_id").unwrap().as_str().unwrap().to_string())
        .collect()
}

#[test]
fn insert_prepends_new_record() {
    let state = vec![rec(json!({"client_id": "C1", "company": "Acme"}))];
    let event = ChangeEvent::insert(rec(json!({"client_id": "C2", "company": "Beta"})));

    let state = apply_change(state, &event, "client_id");
    assert_eq!(ids(&state), vec!["C2", "C1"]);
}

#[test]
fn repeated_insert_is_idempotent() {
    let event = ChangeEvent::insert(rec(json!({"client_id": "C1", "company": "Acme"})));

    let once = apply_change(Vec::new(), &event, "client_id");
    let twice = apply_change(once.clone(), &event, "client_id");
    assert_eq!(once, twice);
    assert_eq!(twice.len(), 1);
}

#[test]
fn update_replaces_in_place() {
    let state = vec![
        rec(json!({"client_id": "C3"})),
        rec(json!({"client_id": "C1", "company": "Acme"})),
        rec(json!({"client_id": "C2"})),
    ];
    let event = ChangeEvent::update(rec(json!({"client_id": "C1", "company": "Acme GmbH"})));

    let state = apply_change(state, &event, "client_id");
    assert_eq!(ids(&state), vec!["C3", "C1", "C2"]);
    assert_eq!(state[1].get("company"), Some(&json!("Acme GmbH")));
}

#[test]
fn update_for_unknown_identity_prepends() {
    let state = vec![rec(json!({"client_id": "C1"}))];
    let event = ChangeEvent::update(rec(json!({"client_id": "C9", "company": "Late"})));

    let state = apply_change(state, &event, "client_id");
    assert_eq!(ids(&state), vec!["C9", "C1"]);
}

#[test]
fn delete_removes_matching_record_only() {
    let state = vec![
        rec(json!({"client_id": "C2", "company": "Beta"})),
        rec(json!({"client_id": "C1", "company": "Acme"})),
    ];
    let event = ChangeEvent::delete(rec(json!({"client_id": "C1", "company": "Acme"})));

    let state = apply_change(state, &event, "client_id");
    assert_eq!(ids(&state), vec!["C2"]);
}

#[test]
fn delete_on_absent_identity_is_noop() {
    let state = vec![rec(json!({"client_id": "C1"}))];
    let event = ChangeEvent::delete(rec(json!({"client_id": "C9"})));

    assert_eq!(apply_change(state.clone(), &event, "client_id"), state);
}

#[test]
fn unrecognized_kind_is_noop() {
    let state = vec![rec(json!({"client_id": "C1"}))];
    let event = ChangeEvent {
        kind: ChangeKind::Other("TRUNCATE".to_string()),
        new: None,
        old: Some(rec(json!({"client_id": "C1"}))),
    };

    assert_eq!(apply_change(state.clone(), &event, "client_id"), state);
}

#[test]
fn event_without_record_is_noop() {
    let state = vec![rec(json!({"client_id": "C1"}))];
    let event = ChangeEvent {
        kind: ChangeKind::Insert,
        new: None,
        old: None,
    };

    assert_eq!(apply_change(state.clone(), &event, "client_id"), state);
}

#[test]
fn event_missing_identity_field_is_noop() {
    let state = vec![rec(json!({"client_id": "C1"}))];
    let event = ChangeEvent::insert(rec(json!({"company": "Nameless"})));

    assert_eq!(apply_change(state.clone(), &event, "client_id"), state);
}

#[test]
fn identity_stays_unique_across_event_sequences() {
    let events = vec![
        ChangeEvent::insert(rec(json!({"client_id": "C1", "v": 1}))),
        ChangeEvent::insert(rec(json!({"client_id": "C2", "v": 1}))),
        ChangeEvent::update(rec(json!({"client_id": "C1", "v": 2}))),
        ChangeEvent::insert(rec(json!({"client_id": "C1", "v": 3}))),
        ChangeEvent::delete(rec(json!({"client_id": "C2"}))),
        ChangeEvent::insert(rec(json!({"client_id": "C2", "v": 4}))),
        ChangeEvent::update(rec(json!({"client_id": "C3", "v": 1}))),
    ];

    let mut state = Vec::new();
    for event in &events {
        state = apply_change(state, event, "client_id");
        let unique: HashSet<_> = ids(&state).into_iter().collect();
        assert_eq!(unique.len(), state.len());
    }
    assert_eq!(ids(&state).len(), 3);
}

#[test]
fn parse_maps_wire_kinds() {
    assert_eq!(ChangeKind::parse("INSERT"), ChangeKind::Insert);
    assert_eq!(ChangeKind::parse("UPDATE"), ChangeKind::Update);
    assert_eq!(ChangeKind::parse("DELETE"), ChangeKind::Delete);
    assert_eq!(
        ChangeKind::parse("TRUNCATE"),
        ChangeKind::Other("TRUNCATE".to_string())
    );
}
