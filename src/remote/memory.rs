use crate::core::{MirrorError, Record, Result};
use crate::remote::{ChangeEvent, ChangeStream, RemoteStore, SortDirection, SortSpec};
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::{Mutex, mpsc};

/// In-process [`RemoteStore`] backed by plain vectors.
///
/// Serves two roles: a transport for tests (no network, fully deterministic)
/// and a standalone backend for single-process deployments. Tables must be
/// registered up front with their identity field, mirroring a hosted store's
/// primary-key schema; operations against an unregistered table fail the same
/// way a backend rejects an unknown relation.
pub struct MemoryStore {
    tables: Mutex<HashMap<String, TableState>>,
}

struct TableState {
    identity_field: String,
    rows: Vec<Record>,
    subscribers: Vec<mpsc::UnboundedSender<ChangeEvent>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
        }
    }

    /// Register a table and the field serving as its unique identity.
    pub fn with_table(mut self, table: &str, identity_field: &str) -> Self {
        self.tables.get_mut().insert(
            table.to_string(),
            TableState {
                identity_field: identity_field.to_string(),
                rows: Vec::new(),
                subscribers: Vec::new(),
            },
        );
        self
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn bulk_read(&self, table: &str, sort: Option<&SortSpec>) -> Result<Vec<Record>> {
        let tables = self.tables.lock().await;
        let state = lookup(&tables, table)?;
        let mut rows = state.rows.clone();
        if let Some(spec) = sort {
            rows.sort_by(|a, b| {
                let ord = compare_fields(a.get(&spec.column), b.get(&spec.column));
                match spec.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
        Ok(rows)
    }

    async fn subscribe_changes(&self, table: &str) -> Result<ChangeStream> {
        let mut tables = self.tables.lock().await;
        let state = lookup_mut(&mut tables, table)?;
        let (tx, rx) = mpsc::unbounded_channel();
        state.subscribers.push(tx);
        Ok(ChangeStream::new(rx))
    }

    async fn upsert_record(&self, table: &str, record: Record) -> Result<()> {
        let mut tables = self.tables.lock().await;
        let state = lookup_mut(&mut tables, table)?;
        let key = record
            .identity(&state.identity_field)
            .ok_or_else(|| {
                MirrorError::MissingIdentity(table.to_string(), state.identity_field.clone())
            })?
            .clone();

        let existing = state
            .rows
            .iter()
            .position(|row| row.identity(&state.identity_field) == Some(&key));
        let event = match existing {
            Some(pos) => {
                state.rows[pos] = record.clone();
                ChangeEvent::update(record)
            }
            None => {
                state.rows.push(record.clone());
                ChangeEvent::insert(record)
            }
        };
        emit(state, event);
        Ok(())
    }

    async fn delete_record(
        &self,
        table: &str,
        identity_field: &str,
        identity: &Value,
    ) -> Result<()> {
        let mut tables = self.tables.lock().await;
        let state = lookup_mut(&mut tables, table)?;
        let existing = state
            .rows
            .iter()
            .position(|row| row.identity(identity_field) == Some(identity));
        if let Some(pos) = existing {
            let prior = state.rows.remove(pos);
            emit(state, ChangeEvent::delete(prior));
        }
        Ok(())
    }
}

fn lookup<'a>(tables: &'a HashMap<String, TableState>, table: &str) -> Result<&'a TableState> {
    tables
        .get(table)
        .ok_or_else(|| MirrorError::Remote(format!("table '{table}' does not exist")))
}

fn lookup_mut<'a>(
    tables: &'a mut HashMap<String, TableState>,
    table: &str,
) -> Result<&'a mut TableState> {
    tables
        .get_mut(table)
        .ok_or_else(|| MirrorError::Remote(format!("table '{table}' does not exist")))
}

fn emit(state: &mut TableState, event: ChangeEvent) {
    state
        .subscribers
        .retain(|tx| tx.send(event.clone()).is_ok());
}

/// Total order over optional JSON scalars for server-side sorting.
/// Missing and null values sort last regardless of direction, matching the
/// usual NULLS LAST behavior of hosted stores.
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (normalize(a), normalize(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => compare_values(a, b),
    }
}

fn normalize(value: Option<&Value>) -> Option<&Value> {
    match value {
        Some(Value::Null) | None => None,
        Some(v) => Some(v),
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or_default();
            let b = b.as_f64().unwrap_or_default();
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        // Mixed or structured types: order by type rank, then by rendering.
        _ => type_rank(a)
            .cmp(&type_rank(b))
            .then_with(|| a.to_string().cmp(&b.to_string())),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 5,
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Array(_) => 3,
        Value::Object(_) => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nulls_and_missing_sort_last() {
        assert_eq!(
            compare_fields(Some(&json!("a")), Some(&json!(null))),
            Ordering::Less
        );
        assert_eq!(compare_fields(None, Some(&json!(1))), Ordering::Greater);
        assert_eq!(compare_fields(None, Some(&json!(null))), Ordering::Equal);
    }

    #[test]
    fn numbers_compare_across_int_and_float() {
        assert_eq!(
            compare_fields(Some(&json!(2)), Some(&json!(10.5))),
            Ordering::Less
        );
    }
}
