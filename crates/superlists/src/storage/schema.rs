//! `SQLite` schema definitions for superlists.
//!
//! The items table is built up by the ordered steps in [`MIGRATIONS`]; only
//! the metadata table that records the schema version is created directly.

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Version 1: the bare items table.
///
/// `AUTOINCREMENT` keeps ids strictly increasing, so ordering by id is
/// insertion order even after rows are deleted.
pub const CREATE_ITEMS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS lists_item (
    id INTEGER PRIMARY KEY AUTOINCREMENT
)
";

/// Version 2: item text.
pub const ADD_ITEM_TEXT: &str = r"
ALTER TABLE lists_item ADD COLUMN text TEXT NOT NULL DEFAULT ''
";

/// Version 3: creation timestamp.
pub const ADD_ITEM_CREATED_AT: &str = r"
ALTER TABLE lists_item ADD COLUMN created_at TEXT NOT NULL DEFAULT ''
";

/// A single schema change.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Schema version after this migration has run.
    pub version: i32,
    /// Short name, logged when applied.
    pub name: &'static str,
    /// SQL to execute.
    pub sql: &'static str,
}

/// All migrations, ordered by version.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial",
        sql: CREATE_ITEMS_TABLE,
    },
    Migration {
        version: 2,
        name: "item_text",
        sql: ADD_ITEM_TEXT,
    },
    Migration {
        version: 3,
        name: "item_created_at",
        sql: ADD_ITEM_CREATED_AT,
    },
];
