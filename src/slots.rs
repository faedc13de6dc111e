//! Image slot mapper.
//!
//! DESIGN
//! ======
//! `SlotMap` holds at most one `ImageRecord` per registry category. Storage
//! is a fixed array indexed by category id, so iteration is always in
//! registry order and the "one entry per category" rule holds by
//! construction. The map rewrites `ImageRecord::category` on insert to keep
//! every value's category equal to its key.
//!
//! Gallery loading assigns records positionally: each listed record goes
//! to the first empty category, whatever category the listing claims for
//! it. Records past the last empty slot are dropped.

use serde::{Deserialize, Serialize};

use crate::category::{self, CATEGORIES, CATEGORY_COUNT, Category};

// =============================================================================
// TYPES
// =============================================================================

/// An image hosted by the external file store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub url: String,
    pub key: String,
    pub category: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SlotError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

impl crate::error::ErrorCode for SlotError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCategory(_) => "E_UNKNOWN_CATEGORY",
        }
    }
}

/// Category name -> image record, at most one entry per category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotMap {
    slots: [Option<ImageRecord>; CATEGORY_COUNT],
}

// =============================================================================
// SLOT MAP
// =============================================================================

impl SlotMap {
    /// Set or overwrite the entry for `category`. Returns the displaced record.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCategory` if `category` is not in the registry.
    pub fn insert(&mut self, category: &str, mut record: ImageRecord) -> Result<Option<ImageRecord>, SlotError> {
        let cat = category::find(category).ok_or_else(|| SlotError::UnknownCategory(category.to_string()))?;
        record.category = cat.name.to_string();
        Ok(self.slots[cat.id].replace(record))
    }

    /// Remove the entry for `category`. Absent or unknown categories are a no-op.
    pub fn remove(&mut self, category: &str) -> Option<ImageRecord> {
        let cat = category::find(category)?;
        self.slots[cat.id].take()
    }

    #[must_use]
    pub fn get(&self, category: &str) -> Option<&ImageRecord> {
        category::find(category).and_then(|cat| self.slots[cat.id].as_ref())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.slots = Default::default();
    }

    /// Every category in registry order, paired with its record if filled.
    pub fn entries(&self) -> impl Iterator<Item = (&'static Category, Option<&ImageRecord>)> {
        CATEGORIES
            .iter()
            .zip(self.slots.iter())
            .map(|(cat, slot)| (cat, slot.as_ref()))
    }

    /// Filled slots in registry order.
    pub fn records(&self) -> impl Iterator<Item = (&'static Category, &ImageRecord)> {
        self.entries()
            .filter_map(|(cat, slot)| slot.map(|record| (cat, record)))
    }

    /// Place each record into the first empty category, in listing order.
    /// Returns how many records were placed; the rest are dropped.
    pub fn assign_first_available(&mut self, records: impl IntoIterator<Item = ImageRecord>) -> usize {
        let mut placed = 0;
        for mut record in records {
            let Some(id) = self.slots.iter().position(Option::is_none) else {
                break;
            };
            record.category = CATEGORIES[id].name.to_string();
            self.slots[id] = Some(record);
            placed += 1;
        }
        placed
    }
}

#[cfg(test)]
#[path = "slots_test.rs"]
mod tests;
