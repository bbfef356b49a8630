pub mod json_backend;

use uuid::Uuid;

use crate::{core::errors::StorageError, domain::PersistedRecipe};

pub type Result<T> = std::result::Result<T, StorageError>;

/// Key-value persistence for recipe records, keyed by id within a collection.
pub trait RecipeStore: Send + Sync {
    /// Upserts `record`. A record without an id is inserted under a fresh
    /// one; the id it was stored under is returned.
    fn put(&self, collection: &str, record: &PersistedRecipe) -> Result<Uuid>;
    fn get(&self, collection: &str, id: Uuid) -> Result<Option<PersistedRecipe>>;
    fn list(&self, collection: &str) -> Result<Vec<PersistedRecipe>>;
    fn delete(&self, collection: &str, id: Uuid) -> Result<()>;
}

pub use json_backend::JsonRecipeStore;
