//! The recipe draft aggregate and its persisted form.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    core::errors::DraftError,
    domain::{
        common::{NamedEntity, Nutrition},
        item::NormalizedItem,
    },
};

/// Free-form descriptive fields edited alongside the item list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecipeMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portion: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RecipeMetadata {
    /// Copy of the metadata without empty text fields.
    pub fn non_empty(&self) -> Self {
        fn keep(value: &Option<String>) -> Option<String> {
            value.as_ref().filter(|text| !text.is_empty()).cloned()
        }
        Self {
            name: keep(&self.name),
            portion: self.portion,
            unit: keep(&self.unit),
            notes: keep(&self.notes),
        }
    }
}

/// Recipe as written through the persistence boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedRecipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub metadata: RecipeMetadata,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub categories: BTreeSet<String>,
    #[serde(default)]
    pub items: Vec<NormalizedItem>,
    #[serde(default)]
    pub archived: bool,
    pub date_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,
}

impl NamedEntity for PersistedRecipe {
    fn name(&self) -> Option<&str> {
        self.metadata.name.as_deref()
    }
}

/// In-memory recipe being edited.
///
/// `items` is the only list of entries; every structural edit goes through
/// the methods below so a failed edit never leaves a partial change behind.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecipeDraft {
    pub id: Option<Uuid>,
    pub metadata: RecipeMetadata,
    pub categories: BTreeSet<String>,
    items: Vec<NormalizedItem>,
    archived: Option<bool>,
}

impl RecipeDraft {
    /// Empty draft for a new recipe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft seeded from a stored recipe.
    pub fn from_record(record: &PersistedRecipe) -> Self {
        Self {
            id: record.id,
            metadata: record.metadata.clone(),
            categories: record.categories.clone(),
            items: record.items.clone(),
            archived: Some(record.archived),
        }
    }

    pub fn items(&self) -> &[NormalizedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn archived(&self) -> Option<bool> {
        self.archived
    }

    /// Un-archives the recipe.
    pub fn clear_archived(&mut self) {
        self.archived = Some(false);
    }

    pub fn append_item(&mut self, item: NormalizedItem) {
        self.items.push(item);
    }

    pub fn replace_item_at(
        &mut self,
        index: usize,
        item: NormalizedItem,
    ) -> Result<NormalizedItem, DraftError> {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(DraftError::IndexOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, item))
    }

    pub fn remove_item_at(&mut self, index: usize) -> Result<NormalizedItem, DraftError> {
        if index >= self.items.len() {
            return Err(DraftError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Rearranges items so that position `i` holds the item previously at
    /// `new_order[i]`. `new_order` must be a permutation of `0..len`.
    pub fn reorder(&mut self, new_order: &[usize]) -> Result<(), DraftError> {
        let len = self.items.len();
        if new_order.len() != len {
            return Err(DraftError::InvalidPermutation(format!(
                "expected {} indices, got {}",
                len,
                new_order.len()
            )));
        }
        let mut seen = vec![false; len];
        for &index in new_order {
            if index >= len {
                return Err(DraftError::InvalidPermutation(format!(
                    "index {index} out of range"
                )));
            }
            if seen[index] {
                return Err(DraftError::InvalidPermutation(format!(
                    "index {index} repeated"
                )));
            }
            seen[index] = true;
        }

        let reordered: Vec<NormalizedItem> = new_order
            .iter()
            .map(|&index| self.items[index].clone())
            .collect();
        self.items = reordered;
        Ok(())
    }

    /// Moves one item, shifting the items in between. Used for drag sorting.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), DraftError> {
        let len = self.items.len();
        for index in [from, to] {
            if index >= len {
                return Err(DraftError::IndexOutOfRange { index, len });
            }
        }
        let mut order: Vec<usize> = (0..len).collect();
        let moved = order.remove(from);
        order.insert(to, moved);
        self.reorder(&order)
    }
}
