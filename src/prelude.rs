//! Convenience re-exports for application code.
//!
//! Most sessions need the facade, the record type, and the error alias;
//! transports implementing their own backend additionally need the
//! [`RemoteStore`] contract types.

pub use crate::core::{MirrorError, Record, Result};
pub use crate::entities::EntityKind;
pub use crate::facade::Backoffice;
pub use crate::mirror::{MirrorConfig, TableMirror};
pub use crate::remote::{
    ChangeEvent, ChangeKind, ChangeStream, MemoryStore, RemoteStore, SortDirection, SortSpec,
};
