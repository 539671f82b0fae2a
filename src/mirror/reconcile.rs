use crate::core::Record;
use crate::remote::{ChangeEvent, ChangeKind};
use tracing::warn;

/// Fold one change event into the previous rows, yielding the next rows.
///
/// - insert/update: replace the matching row in place, or prepend when no row
///   carries the event record's identity;
/// - delete: drop the matching row, a no-op when absent;
/// - anything else (unrecognized kind, missing record, missing identity):
///   return the input unchanged.
///
/// Pure in its inputs, so it is testable without a transport, and idempotent
/// under event replay: applying the same insert or update twice replaces
/// rather than duplicates.
pub fn apply_change(rows: Vec<Record>, event: &ChangeEvent, identity_field: &str) -> Vec<Record> {
    let Some(rec) = event.record() else {
        warn!(kind = ?event.kind, "ignoring change event with no record");
        return rows;
    };
    let Some(key) = rec.identity(identity_field) else {
        warn!(
            kind = ?event.kind,
            identity_field,
            "ignoring change event whose record has no identity"
        );
        return rows;
    };

    match &event.kind {
        ChangeKind::Insert | ChangeKind::Update => {
            let mut rows = rows;
            match rows
                .iter()
                .position(|row| row.identity(identity_field) == Some(key))
            {
                Some(pos) => {
                    rows[pos] = rec.clone();
                    rows
                }
                None => {
                    let mut next = Vec::with_capacity(rows.len() + 1);
                    next.push(rec.clone());
                    next.extend(rows);
                    next
                }
            }
        }
        ChangeKind::Delete => rows
            .into_iter()
            .filter(|row| row.identity(identity_field) != Some(key))
            .collect(),
        ChangeKind::Other(kind) => {
            warn!(kind = %kind, "ignoring unrecognized change event kind");
            rows
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(value: serde_json::Value) -> Record {
        Record::from_value(value).unwrap()
    }

    #[test]
    fn update_without_match_prepends() {
        let rows = vec![rec(json!({"id": 1}))];
        let next = apply_change(rows, &ChangeEvent::update(rec(json!({"id": 2}))), "id");
        assert_eq!(next[0].get("id"), Some(&json!(2)));
        assert_eq!(next.len(), 2);
    }

    #[test]
    fn delete_uses_old_side_of_event() {
        let rows = vec![rec(json!({"id": 1, "name": "a"}))];
        let event = ChangeEvent::delete(rec(json!({"id": 1})));
        assert!(apply_change(rows, &event, "id").is_empty());
    }

    #[test]
    fn event_with_null_identity_is_ignored() {
        let rows = vec![rec(json!({"id": 1}))];
        let event = ChangeEvent::insert(rec(json!({"id": null, "name": "x"})));
        assert_eq!(apply_change(rows.clone(), &event, "id"), rows);
    }
}
