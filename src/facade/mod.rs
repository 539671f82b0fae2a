//! High-level entry point bundling one mirror per back-office entity.

use crate::core::Result;
use crate::entities::EntityKind;
use crate::mirror::TableMirror;
use crate::remote::{MemoryStore, RemoteStore};
use std::sync::Arc;

/// One mirror per entity, all over the same injected store handle.
///
/// The owning session drives the set: `start` once, then `poll_changes`
/// whenever queued events should become visible, `close` at the end.
pub struct Backoffice {
    clients: TableMirror,
    people: TableMirror,
    projects: TableMirror,
    vacancies: TableMirror,
    assignments: TableMirror,
    attendance: TableMirror,
}

impl Backoffice {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self {
            clients: TableMirror::for_entity(store.clone(), EntityKind::Client),
            people: TableMirror::for_entity(store.clone(), EntityKind::Person),
            projects: TableMirror::for_entity(store.clone(), EntityKind::Project),
            vacancies: TableMirror::for_entity(store.clone(), EntityKind::Vacancy),
            assignments: TableMirror::for_entity(store.clone(), EntityKind::Assignment),
            attendance: TableMirror::for_entity(store, EntityKind::Attendance),
        }
    }

    /// Back office over a fresh in-process store with all six tables
    /// registered. The store handle is returned too so callers (and tests)
    /// can reach the backend directly.
    pub fn in_memory() -> (Self, Arc<MemoryStore>) {
        let mut store = MemoryStore::new();
        for kind in EntityKind::ALL {
            store = store.with_table(kind.table(), kind.identity_field());
        }
        let store = Arc::new(store);
        (Self::new(store.clone()), store)
    }

    /// Subscribe every mirror, then bulk-load every mirror.
    ///
    /// Subscribing first means a change committed during the load window is
    /// queued rather than missed; reconciliation dedupes it against the
    /// snapshot by identity.
    pub async fn start(&mut self) -> Result<()> {
        for mirror in self.mirrors_mut() {
            mirror.subscribe().await?;
        }
        for mirror in self.mirrors_mut() {
            mirror.load().await?;
        }
        Ok(())
    }

    /// Apply every queued change event across all six mirrors. Returns how
    /// many were applied.
    pub fn poll_changes(&mut self) -> usize {
        self.mirrors_mut().into_iter().map(TableMirror::poll_changes).sum()
    }

    pub fn close(&mut self) {
        for mirror in self.mirrors_mut() {
            mirror.close();
        }
    }

    pub fn mirror(&self, kind: EntityKind) -> &TableMirror {
        match kind {
            EntityKind::Client => &self.clients,
            EntityKind::Person => &self.people,
            EntityKind::Project => &self.projects,
            EntityKind::Vacancy => &self.vacancies,
            EntityKind::Assignment => &self.assignments,
            EntityKind::Attendance => &self.attendance,
        }
    }

    pub fn mirror_mut(&mut self, kind: EntityKind) -> &mut TableMirror {
        match kind {
            EntityKind::Client => &mut self.clients,
            EntityKind::Person => &mut self.people,
            EntityKind::Project => &mut self.projects,
            EntityKind::Vacancy => &mut self.vacancies,
            EntityKind::Assignment => &mut self.assignments,
            EntityKind::Attendance => &mut self.attendance,
        }
    }

    pub fn clients(&self) -> &TableMirror {
        &self.clients
    }

    pub fn people(&self) -> &TableMirror {
        &self.people
    }

    pub fn projects(&self) -> &TableMirror {
        &self.projects
    }

    pub fn vacancies(&self) -> &TableMirror {
        &self.vacancies
    }

    pub fn assignments(&self) -> &TableMirror {
        &self.assignments
    }

    pub fn attendance(&self) -> &TableMirror {
        &self.attendance
    }

    fn mirrors_mut(&mut self) -> [&mut TableMirror; 6] {
        [
            &mut self.clients,
            &mut self.people,
            &mut self.projects,
            &mut self.vacancies,
            &mut self.assignments,
            &mut self.attendance,
        ]
    }
}
