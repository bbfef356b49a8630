//! Converts a draft into a persisted recipe record.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::{
    core::{
        clock::Clock,
        errors::SaveError,
        services::nutrition_service::{recompute_nutrition, Aggregator},
    },
    domain::{PersistedRecipe, RecipeDraft, RECIPES_COLLECTION},
    storage::RecipeStore,
};

/// Builds the record `save` would write, without touching the store.
pub fn build_record<A>(
    draft: &RecipeDraft,
    aggregator: &A,
    now: DateTime<Utc>,
) -> Result<PersistedRecipe, SaveError>
where
    A: Aggregator + ?Sized,
{
    let has_name = draft
        .metadata
        .name
        .as_deref()
        .is_some_and(|name| !name.trim().is_empty());
    if !has_name {
        return Err(SaveError::Validation("recipe name is required".into()));
    }

    let nutrition = recompute_nutrition(draft, aggregator)?;
    Ok(PersistedRecipe {
        id: draft.id,
        metadata: draft.metadata.non_empty(),
        categories: draft.categories.clone(),
        items: draft.items().to_vec(),
        archived: draft.archived() == Some(true),
        date_time: now,
        nutrition: Some(nutrition),
    })
}

/// Saves the draft into the `recipes` collection and returns the stored
/// record. The draft is only read, so it is unchanged when saving fails.
pub fn save<S, A, C>(
    draft: &RecipeDraft,
    store: &S,
    aggregator: &A,
    clock: &C,
) -> Result<PersistedRecipe, SaveError>
where
    S: RecipeStore + ?Sized,
    A: Aggregator + ?Sized,
    C: Clock + ?Sized,
{
    let record = build_record(draft, aggregator, clock.now())?;
    let id = store.put(RECIPES_COLLECTION, &record).map_err(|err| {
        warn!(error = %err, "recipe save failed");
        SaveError::from(err)
    })?;
    info!(%id, items = record.items.len(), "recipe saved");
    Ok(PersistedRecipe {
        id: Some(id),
        ..record
    })
}
