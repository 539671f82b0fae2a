//! The six back-office entity kinds and their mirror parameterizations.

use crate::mirror::MirrorConfig;
use crate::remote::SortDirection;
use std::fmt;

/// One of the back-office entity kinds. Each kind differs only in its table
/// name, identity field, and bulk-load sort column; the payload beyond the
/// identity field is open and passes through the mirror unexamined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Client,
    Person,
    Project,
    Vacancy,
    Assignment,
    Attendance,
}

impl EntityKind {
    pub const ALL: [Self; 6] = [
        Self::Client,
        Self::Person,
        Self::Project,
        Self::Vacancy,
        Self::Assignment,
        Self::Attendance,
    ];

    pub const fn table(self) -> &'static str {
        match self {
            Self::Client => "clients",
            Self::Person => "people",
            Self::Project => "projects",
            Self::Vacancy => "vacancies",
            Self::Assignment => "assignments",
            Self::Attendance => "attendance",
        }
    }

    pub const fn identity_field(self) -> &'static str {
        match self {
            Self::Client => "client_id",
            Self::Person => "person_id",
            Self::Project => "project_id",
            Self::Vacancy => "vacancy_id",
            Self::Assignment => "assignment_id",
            Self::Attendance => "id",
        }
    }

    /// Sort column and direction for the bulk load, if the entity has one.
    pub const fn sort(self) -> Option<(&'static str, SortDirection)> {
        match self {
            Self::Client => Some(("company", SortDirection::Ascending)),
            Self::Person => Some(("name", SortDirection::Ascending)),
            Self::Project => Some(("name", SortDirection::Ascending)),
            Self::Vacancy => Some(("created_at", SortDirection::Descending)),
            Self::Assignment => None,
            Self::Attendance => Some(("date", SortDirection::Descending)),
        }
    }

    pub fn config(self) -> MirrorConfig {
        let config = MirrorConfig::new(self.table(), self.identity_field());
        match self.sort() {
            Some((column, direction)) => config.with_sort(column, direction),
            None => config,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}
