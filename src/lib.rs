// ============================================================================
// TableMirror Library
// ============================================================================

//! Client-side mirrors of remote tables, kept eventually consistent through
//! an initial bulk load plus a stream of insert/update/delete change events.
//!
//! A [`TableMirror`] never applies its own writes optimistically: `upsert`
//! and `remove` go to the remote store, and the resulting change event —
//! delivered through the subscription like any other server-side change — is
//! the sole path by which a write becomes visible locally. This keeps the
//! mirror a plain function of what the server has actually accepted.
//!
//! # Examples
//!
//! ```
//! use tablemirror::{Backoffice, Record};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> tablemirror::Result<()> {
//! let (mut office, _store) = Backoffice::in_memory();
//! office.start().await?;
//!
//! let rec = Record::from_value(json!({"client_id": "C1", "company": "Acme"}))?;
//! office.clients().upsert(rec).await?;
//!
//! // The write is visible only once its change event is applied.
//! assert!(office.clients().rows().is_empty());
//! office.poll_changes();
//! assert_eq!(office.clients().rows().len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod entities;
pub mod facade;
pub mod mirror;
pub mod prelude;
pub mod remote;

// Re-export main types for convenience
pub use crate::core::{MirrorError, Record, Result};
pub use crate::entities::EntityKind;
pub use crate::facade::Backoffice;
pub use crate::mirror::{MirrorConfig, TableMirror, apply_change};
pub use crate::remote::{
    ChangeEvent, ChangeKind, ChangeStream, MemoryStore, RemoteStore, SortDirection, SortSpec,
};
