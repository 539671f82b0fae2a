use crate::remote::{SortDirection, SortSpec};

/// Per-table mirror configuration.
///
/// Three knobs distinguish one mirror from another: the table it watches, the
/// field carrying each record's unique identity, and the optional server-side
/// sort applied to the initial bulk load. Incremental updates never re-sort.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    pub table: String,
    pub identity_field: String,
    pub sort: Option<SortSpec>,
}

impl MirrorConfig {
    pub fn new(table: &str, identity_field: &str) -> Self {
        Self {
            table: table.to_string(),
            identity_field: identity_field.to_string(),
            sort: None,
        }
    }

    /// Server-sort the bulk load by `column`.
    pub fn with_sort(mut self, column: &str, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec {
            column: column.to_string(),
            direction,
        });
        self
    }
}
