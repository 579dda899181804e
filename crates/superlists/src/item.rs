//! The list item record.
//!
//! An [`Item`] is a single line of text on the to-do list. Its identity and
//! position in the list are assigned by the storage layer when it is saved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single to-do list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Row identifier (assigned by storage layer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// The item text as entered by the user.
    pub text: String,

    /// When the item was created.
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Create a new, unsaved item with the given text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    /// Whether storage has assigned this item an id.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }

    /// Check that the item can be persisted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the text is empty or whitespace only.
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(Error::validation("item text cannot be blank"));
        }
        Ok(())
    }
}

impl Default for Item {
    fn default() -> Self {
        Self::new(String::new())
    }
}
