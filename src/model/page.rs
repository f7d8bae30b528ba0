// src/model/page.rs

use serde::{Deserialize, Serialize};

use crate::extract::ItemPage;

/// One batch of items plus the cursor that continues after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    /// Opaque position handed back to the server to get the next batch.
    pub cursor: u64,
}

impl<T> CursorPage<T> {
    pub fn new(items: Vec<T>, cursor: u64) -> Self {
        Self { items, cursor }
    }

    /// Builds a page whose cursor is the largest `key` among its items.
    ///
    /// Returns `None` for an empty batch: there is nothing to continue from.
    pub fn from_items<F>(items: Vec<T>, key: F) -> Option<Self>
    where
        F: Fn(&T) -> u64,
    {
        let cursor = items.iter().map(key).max()?;
        Some(Self::new(items, cursor))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> ItemPage for CursorPage<T> {
    type Item = T;

    fn items(&self) -> &[T] {
        &self.items
    }
}
