//! Recipe editor session: seeds a draft, applies picker results and keeps
//! the nutrition summary current.

use std::collections::BTreeSet;

use tracing::info;

use crate::{
    config::{SettingsSource, EDIT_ITEMS, FOODLIST},
    core::{
        clock::Clock,
        errors::{EditorError, Result},
        services::{
            init_draft, intake, recompute_nutrition, save, Aggregator, DraftService,
            IntakeOptions, IntakeSummary, Normalizer, PromptDecision, PromptRequest,
        },
    },
    domain::{IncomingItem, NormalizedItem, Nutrition, PersistedRecipe, RecipeDraft, RecipeMetadata},
    storage::RecipeStore,
};

/// An item handed back by the food editor for the entry at `index`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnedItem {
    pub index: usize,
    pub item: IncomingItem,
}

/// What the editor was opened with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorContext {
    /// Stored recipe being edited; `None` for a new recipe.
    pub recipe: Option<PersistedRecipe>,
    /// Items chosen in the picker.
    pub items: Vec<IncomingItem>,
    pub returned: Option<ReturnedItem>,
}

impl EditorContext {
    pub fn new_recipe() -> Self {
        Self::default()
    }

    pub fn editing(recipe: PersistedRecipe) -> Self {
        Self {
            recipe: Some(recipe),
            ..Self::default()
        }
    }

    pub fn with_items(mut self, items: Vec<IncomingItem>) -> Self {
        self.items = items;
        self
    }

    pub fn with_returned(mut self, index: usize, item: IncomingItem) -> Self {
        self.returned = Some(ReturnedItem { index, item });
        self
    }
}

/// Owns a draft for the duration of an edit and keeps its nutrition
/// summary in step with the item list.
#[derive(Debug, Clone)]
pub struct RecipeEditor {
    draft: RecipeDraft,
    options: IntakeOptions,
    editing_enabled: bool,
    nutrition: Nutrition,
}

impl RecipeEditor {
    pub fn new<S>(draft: RecipeDraft, settings: &S) -> Self
    where
        S: SettingsSource + ?Sized,
    {
        Self {
            draft,
            options: IntakeOptions::from_settings(settings),
            editing_enabled: settings.flag(FOODLIST, EDIT_ITEMS),
            nutrition: Nutrition::new(),
        }
    }

    /// Opens the editor: seeds the draft, takes in the picker items, applies
    /// the item returned from the food editor and computes nutrition.
    ///
    /// The returned item's index may point at an item added by the picker
    /// batch, so the batch goes in first.
    pub fn open<S, N, A, F>(
        context: EditorContext,
        settings: &S,
        normalizer: &N,
        aggregator: &A,
        responder: F,
    ) -> Result<Self>
    where
        S: SettingsSource + ?Sized,
        N: Normalizer + ?Sized,
        A: Aggregator + ?Sized,
        F: FnMut(&PromptRequest) -> PromptDecision,
    {
        let EditorContext {
            recipe,
            items,
            returned,
        } = context;
        let mut editor = Self::new(init_draft(recipe.as_ref()), settings);

        if !items.is_empty() {
            intake(&mut editor.draft, items, editor.options, normalizer, responder)?;
        }
        if let Some(ReturnedItem { index, item }) = returned {
            DraftService::replace(&mut editor.draft, index, &item, normalizer)?;
        }
        editor.refresh(aggregator)?;
        info!(
            id = ?editor.draft.id,
            items = editor.draft.len(),
            "recipe editor opened"
        );
        Ok(editor)
    }

    pub fn draft(&self) -> &RecipeDraft {
        &self.draft
    }

    pub fn editing_enabled(&self) -> bool {
        self.editing_enabled
    }

    /// Nutrition totals as of the last item change.
    pub fn nutrition(&self) -> &Nutrition {
        &self.nutrition
    }

    pub fn metadata_mut(&mut self) -> &mut RecipeMetadata {
        &mut self.draft.metadata
    }

    pub fn categories_mut(&mut self) -> &mut BTreeSet<String> {
        &mut self.draft.categories
    }

    pub fn clear_archived(&mut self) {
        self.draft.clear_archived();
    }

    /// Runs an intake for more picker items. Items appended before a
    /// normalization failure are kept and counted in the nutrition.
    pub fn add_items<N, A, F>(
        &mut self,
        items: Vec<IncomingItem>,
        normalizer: &N,
        aggregator: &A,
        responder: F,
    ) -> Result<IntakeSummary>
    where
        N: Normalizer + ?Sized,
        A: Aggregator + ?Sized,
        F: FnMut(&PromptRequest) -> PromptDecision,
    {
        self.ensure_editable()?;
        let outcome = intake(&mut self.draft, items, self.options, normalizer, responder);
        self.refresh(aggregator)?;
        Ok(outcome?)
    }

    pub fn replace_item<N, A>(
        &mut self,
        index: usize,
        item: &IncomingItem,
        normalizer: &N,
        aggregator: &A,
    ) -> Result<NormalizedItem>
    where
        N: Normalizer + ?Sized,
        A: Aggregator + ?Sized,
    {
        self.ensure_editable()?;
        let previous = DraftService::replace(&mut self.draft, index, item, normalizer)?;
        self.refresh(aggregator)?;
        Ok(previous)
    }

    pub fn remove_item<A>(&mut self, index: usize, aggregator: &A) -> Result<NormalizedItem>
    where
        A: Aggregator + ?Sized,
    {
        self.ensure_editable()?;
        let removed = DraftService::remove(&mut self.draft, index)?;
        self.refresh(aggregator)?;
        Ok(removed)
    }

    pub fn reorder(&mut self, new_order: &[usize]) -> Result<()> {
        self.ensure_editable()?;
        DraftService::reorder(&mut self.draft, new_order)?;
        Ok(())
    }

    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        self.ensure_editable()?;
        DraftService::move_item(&mut self.draft, from, to)?;
        Ok(())
    }

    /// Saves the draft. On success the draft adopts the stored id so later
    /// saves update the same record.
    pub fn save<S, A, C>(&mut self, store: &S, aggregator: &A, clock: &C) -> Result<PersistedRecipe>
    where
        S: RecipeStore + ?Sized,
        A: Aggregator + ?Sized,
        C: Clock + ?Sized,
    {
        let record = save(&self.draft, store, aggregator, clock)?;
        self.draft.id = record.id;
        Ok(record)
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.editing_enabled {
            Ok(())
        } else {
            Err(EditorError::EditingDisabled)
        }
    }

    fn refresh<A>(&mut self, aggregator: &A) -> Result<()>
    where
        A: Aggregator + ?Sized,
    {
        self.nutrition = recompute_nutrition(&self.draft, aggregator)?;
        Ok(())
    }
}
