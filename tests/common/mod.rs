#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use once_cell::sync::Lazy;
use recipe_editor::{
    config::ConfigManager,
    domain::{IncomingItem, ItemRef},
    storage::JsonRecipeStore,
};
use tempfile::TempDir;
use uuid::Uuid;

/// Base directories handed out to tests; kept alive until the process ends.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique base directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates an isolated store and config manager backed by a unique directory.
pub fn setup_test_env() -> (JsonRecipeStore, ConfigManager) {
    let base = temp_base();
    let store = JsonRecipeStore::new(base.join("store")).expect("create json store");
    let config = ConfigManager::with_base_dir(&base).expect("create config manager");
    (store, config)
}

/// A food whose nutrition is given per `portion` units.
pub fn food(name: &str, portion: f64, calories: f64) -> IncomingItem {
    IncomingItem::food(ItemRef::Food(Uuid::new_v4()), name, "g", Some(portion))
        .with_nutrient("calories", calories)
}

pub fn meal(items: Vec<IncomingItem>) -> IncomingItem {
    IncomingItem::meal(ItemRef::Meal(Uuid::new_v4()), items)
}
