//! The remote-store boundary: the contract a transport must satisfy for a
//! mirror to stay consistent with it.
//!
//! A hosted backend (or the in-process [`MemoryStore`]) provides four
//! operations: a bulk read of a full table, a change-event subscription,
//! insert-or-replace by identity, and delete by identity. Everything else the
//! remote store does (durability, SQL semantics, replication) is out of the
//! mirror's hands.

mod memory;

pub use memory::MemoryStore;

use crate::core::{Record, Result};
use async_trait::async_trait;
use futures::Stream;
use serde_json::Value;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Server-side ordering applied to a bulk read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(column: &str) -> Self {
        Self {
            column: column.to_string(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(column: &str) -> Self {
        Self {
            column: column.to_string(),
            direction: SortDirection::Descending,
        }
    }
}

/// Kind of a change notification.
///
/// Unrecognized kinds are carried through rather than dropped at the parse
/// boundary so reconciliation can ignore them explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
    Other(String),
}

impl ChangeKind {
    pub fn parse(kind: &str) -> Self {
        match kind {
            "INSERT" => Self::Insert,
            "UPDATE" => Self::Update,
            "DELETE" => Self::Delete,
            other => Self::Other(other.to_string()),
        }
    }
}

/// One discrete change to a remote table.
///
/// The transport populates `new` for inserts and updates and `old` for
/// deletes; [`ChangeEvent::record`] picks the side the event kind calls for,
/// falling back to the other when the preferred side is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub new: Option<Record>,
    pub old: Option<Record>,
}

impl ChangeEvent {
    pub fn insert(record: Record) -> Self {
        Self {
            kind: ChangeKind::Insert,
            new: Some(record),
            old: None,
        }
    }

    pub fn update(record: Record) -> Self {
        Self {
            kind: ChangeKind::Update,
            new: Some(record),
            old: None,
        }
    }

    pub fn delete(prior: Record) -> Self {
        Self {
            kind: ChangeKind::Delete,
            new: None,
            old: Some(prior),
        }
    }

    /// The record this event is about, or `None` for a malformed event.
    pub fn record(&self) -> Option<&Record> {
        match self.kind {
            ChangeKind::Delete => self.old.as_ref().or(self.new.as_ref()),
            _ => self.new.as_ref().or(self.old.as_ref()),
        }
    }
}

/// A live change-event subscription for one table.
///
/// Dropping the stream (or calling [`ChangeStream::close`]) unsubscribes;
/// the store prunes the dead sender on its next emit.
pub struct ChangeStream {
    rx: mpsc::UnboundedReceiver<ChangeEvent>,
}

impl ChangeStream {
    pub fn new(rx: mpsc::UnboundedReceiver<ChangeEvent>) -> Self {
        Self { rx }
    }

    /// Wait for the next event. `None` means the store side has gone away.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.rx.recv().await
    }

    /// Take one event if one is already queued, without waiting.
    pub fn try_recv(&mut self) -> Option<ChangeEvent> {
        self.rx.try_recv().ok()
    }

    pub fn close(&mut self) {
        self.rx.close();
    }
}

impl Stream for ChangeStream {
    type Item = ChangeEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Contract the mirror depends on. Injected as a capability into each
/// [`crate::mirror::TableMirror`] rather than reached for as a process-wide
/// singleton, so each mirror's lifetime and failure domain stands alone.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Read the full table, optionally server-sorted.
    async fn bulk_read(&self, table: &str, sort: Option<&SortSpec>) -> Result<Vec<Record>>;

    /// Open a change-event stream scoped to `table`.
    async fn subscribe_changes(&self, table: &str) -> Result<ChangeStream>;

    /// Insert-or-replace by the table's identity field.
    async fn upsert_record(&self, table: &str, record: Record) -> Result<()>;

    /// Delete the record whose `identity_field` equals `identity`.
    /// Deleting an absent identity is not an error.
    async fn delete_record(&self, table: &str, identity_field: &str, identity: &Value)
    -> Result<()>;
}
