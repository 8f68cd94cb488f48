//! Record model shared by every store backend.
//!
//! The bootstrap layer only needs to know which kind of entity a row
//! belongs to and how to write it; business behaviour on top of these
//! rows lives in the request layer.

use std::fmt;

/// The entity tables a store exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Book,
}

impl EntityKind {
    /// Name of the table backing this kind.
    #[must_use]
    pub fn table(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Book => "books",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// A user account row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    pub password: String,
    pub admin: bool,
}

/// A book row, owned by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub title: String,
    pub secret: String,
    /// Username of the owning account.
    pub owner: String,
}

/// A single row of any entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedRecord {
    User(UserRecord),
    Book(BookRecord),
}

impl SeedRecord {
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::User(_) => EntityKind::User,
            Self::Book(_) => EntityKind::Book,
        }
    }
}

/// A complete set of rows to seed, grouped by kind.
///
/// Users are always written before books so that ownership references
/// resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSet {
    pub users: Vec<UserRecord>,
    pub books: Vec<BookRecord>,
}

impl SeedSet {
    /// The rows of one kind, wrapped as [`SeedRecord`]s.
    #[must_use]
    pub fn records(&self, kind: EntityKind) -> Vec<SeedRecord> {
        match kind {
            EntityKind::User => self.users.iter().cloned().map(SeedRecord::User).collect(),
            EntityKind::Book => self.books.iter().cloned().map(SeedRecord::Book).collect(),
        }
    }

    /// Number of rows of one kind.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::User => self.users.len(),
            EntityKind::Book => self.books.len(),
        }
    }

    /// Total number of rows across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len() + self.books.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
