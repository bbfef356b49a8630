//! Pure domain models for recipes and their items. No I/O.

pub mod common;
pub mod item;
pub mod recipe;

pub use common::{ItemRef, NamedEntity, NutrimentSpec, Nutrition, RECIPES_COLLECTION};
pub use item::{IncomingItem, NormalizedItem};
pub use recipe::{PersistedRecipe, RecipeDraft, RecipeMetadata};
