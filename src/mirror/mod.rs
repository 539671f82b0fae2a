//! The table mirror: an in-memory ordered collection kept eventually
//! consistent with one remote table.
//!
//! A mirror starts empty, is populated by one bulk load, and from then on is
//! mutated exclusively by reconciling change events, in arrival order. Writes
//! go to the remote store and never touch local state directly; they become
//! visible only when their change event comes back through the subscription.

mod config;
mod reconcile;

pub use config::MirrorConfig;
pub use reconcile::apply_change;

use crate::core::{MirrorError, Record, Result};
use crate::entities::EntityKind;
use crate::remote::{ChangeEvent, ChangeStream, RemoteStore};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Client-side mirror of one remote table.
///
/// Owned by a single task; all mutation goes through `&mut self` in event
/// arrival order, so the row state needs no lock.
pub struct TableMirror {
    config: MirrorConfig,
    store: Arc<dyn RemoteStore>,
    rows: Vec<Record>,
    changes: Option<ChangeStream>,
    closed: bool,
}

impl TableMirror {
    pub fn new(store: Arc<dyn RemoteStore>, config: MirrorConfig) -> Self {
        Self {
            config,
            store,
            rows: Vec::new(),
            changes: None,
            closed: false,
        }
    }

    /// Mirror for one of the back-office entities, parameterized by its
    /// table, identity field, and sort column.
    pub fn for_entity(store: Arc<dyn RemoteStore>, kind: EntityKind) -> Self {
        Self::new(store, kind.config())
    }

    /// The current known rows, in mirror order.
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn table(&self) -> &str {
        &self.config.table
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Bulk-load the full table, optionally server-sorted.
    ///
    /// On success the snapshot replaces the mirrored rows; rows already known
    /// locally but absent from the snapshot are retained after it, so a
    /// change event that raced ahead of the load is never lost. On failure
    /// the previous rows (stale or empty) are kept and the error is returned
    /// as a non-fatal condition.
    pub async fn load(&mut self) -> Result<()> {
        if self.closed {
            return Err(MirrorError::Closed(self.config.table.clone()));
        }
        let snapshot = self
            .store
            .bulk_read(&self.config.table, self.config.sort.as_ref())
            .await?;
        if self.closed {
            // Settled after teardown; the state handle is stale.
            debug!(table = %self.config.table, "discarding bulk load that settled after close");
            return Ok(());
        }

        let prior = std::mem::take(&mut self.rows);
        let mut merged = snapshot;
        for row in prior {
            let duplicate = row.identity(&self.config.identity_field).is_some_and(|key| {
                merged
                    .iter()
                    .any(|r| r.identity(&self.config.identity_field) == Some(key))
            });
            if !duplicate {
                merged.push(row);
            }
        }
        self.rows = merged;
        info!(table = %self.config.table, rows = self.rows.len(), "bulk load complete");
        Ok(())
    }

    /// Open the change-event subscription. Events are not consumed until the
    /// owner drives [`TableMirror::poll_changes`] or
    /// [`TableMirror::next_change`].
    pub async fn subscribe(&mut self) -> Result<()> {
        if self.closed {
            return Err(MirrorError::Closed(self.config.table.clone()));
        }
        let stream = self.store.subscribe_changes(&self.config.table).await?;
        self.changes = Some(stream);
        Ok(())
    }

    /// Apply every event currently queued on the subscription, in arrival
    /// order, without waiting. Returns how many were applied.
    pub fn poll_changes(&mut self) -> usize {
        let mut applied = 0;
        loop {
            let Some(event) = self.changes.as_mut().and_then(ChangeStream::try_recv) else {
                return applied;
            };
            self.apply(event);
            applied += 1;
        }
    }

    /// Wait for and apply exactly one change event.
    ///
    /// Returns `Ok(false)` when the stream has ended (the store side went
    /// away, or the mirror was closed while waiting).
    pub async fn next_change(&mut self) -> Result<bool> {
        let event = match self.changes.as_mut() {
            Some(stream) => stream.recv().await,
            None => return Err(MirrorError::NotSubscribed(self.config.table.clone())),
        };
        match event {
            Some(event) if !self.closed => {
                self.apply(event);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Send an insert-or-replace to the remote store.
    ///
    /// Never mutates local state; the write becomes visible here only when
    /// its change event arrives. The identity field is validated before the
    /// record leaves the process.
    pub async fn upsert(&self, record: Record) -> Result<()> {
        if record.identity(&self.config.identity_field).is_none() {
            return Err(MirrorError::MissingIdentity(
                self.config.table.clone(),
                self.config.identity_field.clone(),
            ));
        }
        self.store.upsert_record(&self.config.table, record).await
    }

    /// Send a delete-by-identity to the remote store. Same eventual-visibility
    /// contract as [`TableMirror::upsert`].
    pub async fn remove(&self, identity: &Value) -> Result<()> {
        self.store
            .delete_record(&self.config.table, &self.config.identity_field, identity)
            .await
    }

    /// Release the subscription. No further reconciliation happens after
    /// this; safe to call before `load` ever ran or completed.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Some(mut stream) = self.changes.take() {
            stream.close();
        }
        info!(table = %self.config.table, "mirror closed");
    }

    fn apply(&mut self, event: ChangeEvent) {
        let prev = std::mem::take(&mut self.rows);
        self.rows = apply_change(prev, &event, &self.config.identity_field);
        debug!(table = %self.config.table, kind = ?event.kind, "change event applied");
    }
}
