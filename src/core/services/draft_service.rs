//! Business logic helpers for managing a draft's item list.

use tracing::debug;

use crate::{
    core::{
        errors::{DraftError, EditorError, IntakeError},
        services::normalizer::Normalizer,
    },
    domain::{IncomingItem, NormalizedItem, PersistedRecipe, RecipeDraft},
};

/// Creates a draft, empty or seeded from a stored recipe.
pub fn init_draft(seed: Option<&PersistedRecipe>) -> RecipeDraft {
    match seed {
        Some(record) => {
            debug!(id = ?record.id, items = record.items.len(), "seeding draft from record");
            RecipeDraft::from_record(record)
        }
        None => RecipeDraft::new(),
    }
}

/// Provides validated item operations on a [`RecipeDraft`].
pub struct DraftService;

impl DraftService {
    /// Normalizes `item` and puts it in place of the entry at `index`.
    pub fn replace<N>(
        draft: &mut RecipeDraft,
        index: usize,
        item: &IncomingItem,
        normalizer: &N,
    ) -> Result<NormalizedItem, EditorError>
    where
        N: Normalizer + ?Sized,
    {
        if index >= draft.len() {
            return Err(DraftError::IndexOutOfRange {
                index,
                len: draft.len(),
            }
            .into());
        }
        let normalized = normalizer.normalize(item).map_err(IntakeError::from)?;
        let previous = draft.replace_item_at(index, normalized)?;
        debug!(index, "replaced draft item");
        Ok(previous)
    }

    pub fn remove(draft: &mut RecipeDraft, index: usize) -> Result<NormalizedItem, DraftError> {
        let removed = draft.remove_item_at(index)?;
        debug!(index, remaining = draft.len(), "removed draft item");
        Ok(removed)
    }

    pub fn reorder(draft: &mut RecipeDraft, new_order: &[usize]) -> Result<(), DraftError> {
        draft.reorder(new_order)?;
        debug!(?new_order, "reordered draft items");
        Ok(())
    }

    pub fn move_item(draft: &mut RecipeDraft, from: usize, to: usize) -> Result<(), DraftError> {
        draft.move_item(from, to)?;
        debug!(from, to, "moved draft item");
        Ok(())
    }
}
