#![doc(test(attr(deny(warnings))))]

//! Editing core for diary recipes.
//!
//! A [`RecipeDraft`] collects items from the food picker through an
//! [`IntakeSession`], which can stop at each item to confirm its portion
//! and quantity. Nutrition totals follow the item list, and [`save`] turns
//! the draft into a [`PersistedRecipe`] in the `recipes` collection. The
//! `recipe_editor_cli` binary drives all of this against a JSON store.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use crate::core::{
    clock::{Clock, SystemClock},
    editor::{EditorContext, RecipeEditor},
    errors::{DraftError, EditorError, IntakeError, SaveError},
    services::{
        init_draft, intake, recompute_nutrition, save, IntakeEvent, IntakeSession,
        IntakeSummary, PromptDecision, PromptRequest,
    },
};
pub use crate::domain::{IncomingItem, ItemRef, NormalizedItem, PersistedRecipe, RecipeDraft};

static STARTUP: Once = Once::new();

/// Installs the log subscriber for the CLI. Later calls do nothing.
pub fn init() {
    STARTUP.call_once(|| {
        utils::init_tracing();
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "recipe editor starting");
    });
}
