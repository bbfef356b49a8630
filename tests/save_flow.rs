mod common;

use chrono::{TimeZone, Utc};
use common::{food, setup_test_env};
use recipe_editor::{
    core::{
        clock::FixedClock,
        errors::{SaveError, StorageError},
        services::{init_draft, intake, save, FlatteningNormalizer, IntakeOptions, NutrientTotals},
    },
    domain::{PersistedRecipe, RecipeDraft, RECIPES_COLLECTION},
    storage::{self, RecipeStore},
};
use uuid::Uuid;

struct FailingStore;

impl RecipeStore for FailingStore {
    fn put(&self, _: &str, _: &PersistedRecipe) -> storage::Result<Uuid> {
        Err(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )))
    }

    fn get(&self, _: &str, _: Uuid) -> storage::Result<Option<PersistedRecipe>> {
        Ok(None)
    }

    fn list(&self, _: &str) -> storage::Result<Vec<PersistedRecipe>> {
        Ok(Vec::new())
    }

    fn delete(&self, _: &str, id: Uuid) -> storage::Result<()> {
        Err(StorageError::NotFound(id.to_string()))
    }
}

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap())
}

fn soup_draft() -> RecipeDraft {
    let mut draft = RecipeDraft::new();
    draft.metadata.name = Some("Soup".into());
    draft.categories.insert("dinner".into());
    intake(
        &mut draft,
        vec![food("Leek", 100.0, 30.0), food("Potato", 200.0, 160.0)],
        IntakeOptions::new(false),
        &FlatteningNormalizer,
        |_| unreachable!(),
    )
    .unwrap();
    draft
}

#[test]
fn saved_record_round_trips_through_the_store() {
    let (store, _config) = setup_test_env();
    let saved = save(&soup_draft(), &store, &NutrientTotals, &clock()).unwrap();

    let id = saved.id.expect("store assigns an id");
    let loaded = store.get(RECIPES_COLLECTION, id).unwrap().unwrap();
    assert_eq!(loaded, saved);
    assert_eq!(loaded.date_time, clock().0);
    assert_eq!(loaded.nutrition.as_ref().unwrap()["calories"], 190.0);
    assert!(loaded.categories.contains("dinner"));
}

#[test]
fn saving_a_seeded_draft_updates_the_same_record() {
    let (store, _config) = setup_test_env();
    let first = save(&soup_draft(), &store, &NutrientTotals, &clock()).unwrap();

    let mut draft = init_draft(Some(&first));
    draft.metadata.notes = Some("serve hot".into());
    let second = save(&draft, &store, &NutrientTotals, &clock()).unwrap();

    assert_eq!(second.id, first.id);
    let all = store.list(RECIPES_COLLECTION).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].metadata.notes.as_deref(), Some("serve hot"));
}

#[test]
fn archived_flag_is_true_only_when_the_draft_says_so() {
    let (store, _config) = setup_test_env();

    let fresh = save(&soup_draft(), &store, &NutrientTotals, &clock()).unwrap();
    assert!(!fresh.archived);

    let archived_seed = PersistedRecipe {
        archived: true,
        ..fresh.clone()
    };
    let kept = save(&init_draft(Some(&archived_seed)), &store, &NutrientTotals, &clock()).unwrap();
    assert!(kept.archived);

    let mut restored = init_draft(Some(&archived_seed));
    restored.clear_archived();
    let unarchived = save(&restored, &store, &NutrientTotals, &clock()).unwrap();
    assert!(!unarchived.archived);
}

#[test]
fn failed_save_leaves_draft_untouched() {
    let draft = soup_draft();
    let before = draft.clone();

    let err = save(&draft, &FailingStore, &NutrientTotals, &clock()).unwrap_err();

    assert!(matches!(err, SaveError::Persist(StorageError::Io(_))));
    assert_eq!(draft, before);
}

#[test]
fn unnamed_drafts_are_not_written() {
    let (store, _config) = setup_test_env();
    let mut draft = soup_draft();
    draft.metadata.name = None;

    let err = save(&draft, &store, &NutrientTotals, &clock()).unwrap_err();
    assert!(matches!(err, SaveError::Validation(_)));
    assert!(store.list(RECIPES_COLLECTION).unwrap().is_empty());
}
