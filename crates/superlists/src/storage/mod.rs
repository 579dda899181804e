//! Storage layer for superlists.
//!
//! This module provides `SQLite`-based persistent storage for list items.
//! Items come back in insertion order, which is the order of their ids.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::item::Item;

const SELECT_ITEM: &str = "SELECT id, text, created_at FROM lists_item";

/// Storage engine for list items.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist,
    /// and brings the schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let mut conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&mut conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&mut conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist an item.
    ///
    /// An unsaved item is inserted and gets its id assigned; a saved item has
    /// its text written back to the existing row.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text, [`Error::ItemNotFound`] if
    /// a saved item's row has been deleted, or an error if the database
    /// operation fails.
    pub fn save(&self, item: &mut Item) -> Result<()> {
        item.validate()?;

        if let Some(id) = item.id {
            let affected = self.conn.execute(
                "UPDATE lists_item SET text = ?1 WHERE id = ?2",
                params![item.text, id],
            )?;
            if affected == 0 {
                return Err(Error::ItemNotFound { id });
            }
            debug!("Updated item {}", id);
            return Ok(());
        }

        self.conn.execute(
            "INSERT INTO lists_item (text, created_at) VALUES (?1, ?2)",
            params![item.text, item.created_at.to_rfc3339()],
        )?;

        let id = self.conn.last_insert_rowid();
        item.id = Some(id);
        debug!("Inserted item with id {}", id);
        Ok(())
    }

    /// Create and save a new item with the given text.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text, or an error if the
    /// database operation fails.
    pub fn create(&self, text: impl Into<String>) -> Result<Item> {
        let mut item = Item::new(text);
        self.save(&mut item)?;
        Ok(item)
    }

    /// Get an item by its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: i64) -> Result<Option<Item>> {
        let item = self
            .conn
            .query_row(&format!("{SELECT_ITEM} WHERE id = ?1"), [id], Self::row_to_item)
            .optional()?;
        Ok(item)
    }

    /// Get every item in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn all(&self) -> Result<Vec<Item>> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_ITEM} ORDER BY id ASC"))?;
        let items = stmt
            .query_map([], Self::row_to_item)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Get the earliest saved item.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn first(&self) -> Result<Option<Item>> {
        let item = self
            .conn
            .query_row(
                &format!("{SELECT_ITEM} ORDER BY id ASC LIMIT 1"),
                [],
                Self::row_to_item,
            )
            .optional()?;
        Ok(item)
    }

    /// Count stored items.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM lists_item", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete every item.
    ///
    /// Returns the number of items deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn clear(&self) -> Result<usize> {
        let affected = self.conn.execute("DELETE FROM lists_item", [])?;
        if affected > 0 {
            info!("Cleared {} items", affected);
        }
        Ok(affected)
    }

    /// Convert a database row to an Item.
    fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<Item> {
        let id: i64 = row.get(0)?;
        let text: String = row.get(1)?;
        let created_at_str: String = row.get(2)?;

        // Rows migrated from before timestamps were recorded have an empty value
        let created_at = DateTime::parse_from_rfc3339(&created_at_str).map_or_else(
            |_| {
                if !created_at_str.is_empty() {
                    warn!("Unparsable created_at for item {}: {}", id, created_at_str);
                }
                DateTime::<Utc>::default()
            },
            |dt| dt.with_timezone(&Utc),
        );

        Ok(Item {
            id: Some(id),
            text,
            created_at,
        })
    }
}
