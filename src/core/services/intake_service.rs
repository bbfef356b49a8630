//! Sequential intake of picker items into a recipe draft.
//!
//! A session walks the incoming items in order. Items that need no
//! confirmation are normalized and appended straight away; when prompting
//! is enabled, every item with a name and unit suspends the session with a
//! [`PromptRequest`] until the caller answers with a [`PromptDecision`].
//!
//! ```
//! use recipe_editor::core::services::{
//!     FlatteningNormalizer, IntakeEvent, IntakeOptions, IntakeSession, PromptDecision,
//! };
//! use recipe_editor::domain::{IncomingItem, ItemRef, RecipeDraft};
//! use uuid::Uuid;
//!
//! let mut draft = RecipeDraft::new();
//! let oats = IncomingItem::food(ItemRef::Food(Uuid::new_v4()), "Oats", "g", Some(40.0));
//! let mut session = IntakeSession::new(
//!     &mut draft,
//!     &FlatteningNormalizer,
//!     vec![oats],
//!     IntakeOptions::new(true),
//! );
//!
//! while let Some(event) = session.next_event().unwrap() {
//!     match event {
//!         IntakeEvent::Prompt(_) => session.resolve(PromptDecision::accept("60", "1")).unwrap(),
//!         IntakeEvent::Completed(summary) => assert_eq!(summary.appended, 1),
//!     }
//! }
//! assert_eq!(draft.items()[0].portion, Some(60.0));
//! ```

use tracing::{debug, info, warn};

use crate::{
    config::{SettingsSource, DIARY, FOODLIST, PROMPT_ADD_ITEMS, SHOW_NOTES},
    core::{errors::IntakeError, services::normalizer::Normalizer},
    domain::{IncomingItem, RecipeDraft},
    utils::tidy_text,
};

/// Maximum length of prompt titles and notes.
pub const PROMPT_TEXT_LIMIT: usize = 50;

/// Settings that shape an intake session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntakeOptions {
    pub prompt_enabled: bool,
    pub show_notes: bool,
}

impl IntakeOptions {
    pub fn new(prompt_enabled: bool) -> Self {
        Self {
            prompt_enabled,
            show_notes: false,
        }
    }

    pub fn with_notes(mut self, show_notes: bool) -> Self {
        self.show_notes = show_notes;
        self
    }

    /// Reads `diary.prompt-add-items` and `foodlist.show-notes`.
    pub fn from_settings<S: SettingsSource + ?Sized>(settings: &S) -> Self {
        Self {
            prompt_enabled: settings.flag(DIARY, PROMPT_ADD_ITEMS),
            show_notes: settings.flag(FOODLIST, SHOW_NOTES),
        }
    }
}

/// Asks the user to confirm one item.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    /// Position of the item in the incoming batch.
    pub index: usize,
    pub title: String,
    pub unit: String,
    pub notes: Option<String>,
    pub default_portion: Option<f64>,
    pub default_quantity: f64,
}

/// The user's answer to a [`PromptRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptDecision {
    /// Add the item, applying whichever overrides are valid numbers `>= 0`.
    Accept {
        portion: Option<String>,
        quantity: Option<String>,
    },
    /// Add the item unchanged.
    Skip,
}

impl PromptDecision {
    pub fn accept(portion: impl Into<String>, quantity: impl Into<String>) -> Self {
        PromptDecision::Accept {
            portion: Some(portion.into()),
            quantity: Some(quantity.into()),
        }
    }
}

/// Counts reported when a session completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntakeSummary {
    pub appended: usize,
    pub prompted: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntakeEvent {
    Prompt(PromptRequest),
    /// Emitted once, after the last item.
    Completed(IntakeSummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeState {
    Idle,
    AwaitingDecision(usize),
    Done,
    Aborted,
}

/// Drives the intake of one batch of items into a draft.
///
/// The session keeps the draft's mutable borrow until it is dropped, so
/// nothing else can touch the item list while a prompt is pending.
pub struct IntakeSession<'a, N: Normalizer + ?Sized> {
    draft: &'a mut RecipeDraft,
    normalizer: &'a N,
    items: Vec<IncomingItem>,
    cursor: usize,
    options: IntakeOptions,
    state: IntakeState,
    summary: IntakeSummary,
}

impl<'a, N: Normalizer + ?Sized> IntakeSession<'a, N> {
    pub fn new(
        draft: &'a mut RecipeDraft,
        normalizer: &'a N,
        items: Vec<IncomingItem>,
        options: IntakeOptions,
    ) -> Self {
        debug!(
            items = items.len(),
            prompt = options.prompt_enabled,
            "starting item intake"
        );
        Self {
            draft,
            normalizer,
            items,
            cursor: 0,
            options,
            state: IntakeState::Idle,
            summary: IntakeSummary::default(),
        }
    }

    pub fn state(&self) -> IntakeState {
        self.state
    }

    pub fn summary(&self) -> IntakeSummary {
        self.summary
    }

    pub fn draft(&self) -> &RecipeDraft {
        self.draft
    }

    /// Processes items until a prompt is needed or the batch is exhausted.
    ///
    /// Returns `Ok(None)` once the session has completed or aborted.
    pub fn next_event(&mut self) -> Result<Option<IntakeEvent>, IntakeError> {
        match self.state {
            IntakeState::AwaitingDecision(index) => {
                return Err(IntakeError::DecisionPending(index))
            }
            IntakeState::Done | IntakeState::Aborted => return Ok(None),
            IntakeState::Idle => {}
        }

        while self.cursor < self.items.len() {
            let index = self.cursor;
            if self.options.prompt_enabled && self.items[index].is_promptable() {
                self.state = IntakeState::AwaitingDecision(index);
                self.summary.prompted += 1;
                return Ok(Some(IntakeEvent::Prompt(self.prompt_for(index))));
            }
            self.append(index)?;
            self.cursor += 1;
        }

        self.state = IntakeState::Done;
        info!(
            appended = self.summary.appended,
            prompted = self.summary.prompted,
            skipped = self.summary.skipped,
            "item intake completed"
        );
        Ok(Some(IntakeEvent::Completed(self.summary)))
    }

    /// Answers the pending prompt and appends the item.
    pub fn resolve(&mut self, decision: PromptDecision) -> Result<(), IntakeError> {
        let index = match self.state {
            IntakeState::AwaitingDecision(index) => index,
            _ => return Err(IntakeError::NoPendingDecision),
        };

        match decision {
            PromptDecision::Accept { portion, quantity } => {
                let item = &mut self.items[index];
                if let Some(value) = parse_override("portion", portion.as_deref()) {
                    item.portion = Some(value);
                }
                if let Some(value) = parse_override("quantity", quantity.as_deref()) {
                    item.quantity = Some(value);
                }
            }
            PromptDecision::Skip => self.summary.skipped += 1,
        }

        self.state = IntakeState::Idle;
        self.append(index)?;
        self.cursor = index + 1;
        Ok(())
    }

    fn prompt_for(&self, index: usize) -> PromptRequest {
        let item = &self.items[index];
        let notes = if self.options.show_notes {
            item.notes
                .as_deref()
                .map(|notes| tidy_text(notes, PROMPT_TEXT_LIMIT))
        } else {
            None
        };
        PromptRequest {
            index,
            title: tidy_text(item.name.as_deref().unwrap_or_default(), PROMPT_TEXT_LIMIT),
            unit: item.unit.clone().unwrap_or_default(),
            notes,
            default_portion: item.portion,
            default_quantity: 1.0,
        }
    }

    fn append(&mut self, index: usize) -> Result<(), IntakeError> {
        match self.normalizer.normalize(&self.items[index]) {
            Ok(normalized) => {
                debug!(index, reference = %normalized.reference, "appending item");
                self.draft.append_item(normalized);
                self.summary.appended += 1;
                Ok(())
            }
            Err(err) => {
                self.state = IntakeState::Aborted;
                warn!(
                    index,
                    remaining = self.items.len() - index - 1,
                    error = %err,
                    "aborting item intake"
                );
                Err(err.into())
            }
        }
    }
}

/// Parses a typed override. Anything that is not a finite number `>= 0` is
/// discarded. Surrounding whitespace is ignored, so a blank entry counts as
/// empty rather than zero; hex forms such as `0x10` are not accepted.
pub fn parse_override(field: &str, raw: Option<&str>) -> Option<f64> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        _ => {
            warn!(field, value = text, "discarding invalid override");
            None
        }
    }
}

/// Runs a whole intake, asking `responder` for every prompt.
pub fn intake<N, F>(
    draft: &mut RecipeDraft,
    items: Vec<IncomingItem>,
    options: IntakeOptions,
    normalizer: &N,
    mut responder: F,
) -> Result<IntakeSummary, IntakeError>
where
    N: Normalizer + ?Sized,
    F: FnMut(&PromptRequest) -> PromptDecision,
{
    let mut session = IntakeSession::new(draft, normalizer, items, options);
    while let Some(event) = session.next_event()? {
        match event {
            IntakeEvent::Prompt(request) => session.resolve(responder(&request))?,
            IntakeEvent::Completed(summary) => return Ok(summary),
        }
    }
    Ok(session.summary())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{errors::NormalizationError, services::normalizer::FlatteningNormalizer},
        domain::{ItemRef, NormalizedItem},
    };
    use uuid::Uuid;

    fn food(name: &str, portion: f64) -> IncomingItem {
        IncomingItem::food(ItemRef::Food(Uuid::new_v4()), name, "g", Some(portion))
    }

    fn meal() -> IncomingItem {
        IncomingItem::meal(ItemRef::Meal(Uuid::new_v4()), vec![food("Toast", 30.0)])
    }

    struct RejectNamed(&'static str);

    impl Normalizer for RejectNamed {
        fn normalize(&self, item: &IncomingItem) -> Result<NormalizedItem, NormalizationError> {
            if item.name.as_deref() == Some(self.0) {
                return Err(NormalizationError {
                    reference: item.reference.to_string(),
                    reason: "rejected".into(),
                });
            }
            FlatteningNormalizer.normalize(item)
        }
    }

    #[test]
    fn without_prompting_all_items_are_appended_in_order() {
        let mut draft = RecipeDraft::new();
        let items = vec![food("Flour", 500.0), meal(), food("Salt", 5.0)];
        let expected: Vec<NormalizedItem> = items
            .iter()
            .map(|item| FlatteningNormalizer.normalize(item).unwrap())
            .collect();

        let summary = intake(
            &mut draft,
            items,
            IntakeOptions::new(false),
            &FlatteningNormalizer,
            |_| panic!("no prompt expected"),
        )
        .unwrap();

        assert_eq!(draft.items(), expected.as_slice());
        assert_eq!(summary.appended, 3);
        assert_eq!(summary.prompted, 0);
    }

    #[test]
    fn prompts_only_for_named_items_in_order() {
        let mut draft = RecipeDraft::new();
        let items = vec![food("Flour", 500.0), meal(), food("Salt", 5.0)];
        let mut session =
            IntakeSession::new(&mut draft, &FlatteningNormalizer, items, IntakeOptions::new(true));

        let first = session.next_event().unwrap();
        assert!(matches!(first, Some(IntakeEvent::Prompt(ref req)) if req.index == 0));
        session.resolve(PromptDecision::Skip).unwrap();

        let second = session.next_event().unwrap();
        assert!(matches!(second, Some(IntakeEvent::Prompt(ref req)) if req.index == 2));
        assert_eq!(session.draft().len(), 2, "meal added without a prompt");
        session.resolve(PromptDecision::Skip).unwrap();

        let done = session.next_event().unwrap();
        assert!(matches!(done, Some(IntakeEvent::Completed(summary)) if summary.appended == 3));
        assert_eq!(session.next_event().unwrap(), None);
        assert_eq!(session.state(), IntakeState::Done);
    }

    #[test]
    fn prompt_carries_defaults() {
        let mut draft = RecipeDraft::new();
        let items = vec![food("Butter", 10.0).with_notes("unsalted")];
        let options = IntakeOptions::new(true).with_notes(true);
        let mut session = IntakeSession::new(&mut draft, &FlatteningNormalizer, items, options);

        match session.next_event().unwrap() {
            Some(IntakeEvent::Prompt(request)) => {
                assert_eq!(request.title, "Butter");
                assert_eq!(request.unit, "g");
                assert_eq!(request.notes.as_deref(), Some("unsalted"));
                assert_eq!(request.default_portion, Some(10.0));
                assert_eq!(request.default_quantity, 1.0);
            }
            other => panic!("expected prompt, got {other:?}"),
        }
    }

    #[test]
    fn notes_hidden_unless_enabled() {
        let mut draft = RecipeDraft::new();
        let items = vec![food("Butter", 10.0).with_notes("unsalted")];
        let mut session =
            IntakeSession::new(&mut draft, &FlatteningNormalizer, items, IntakeOptions::new(true));
        match session.next_event().unwrap() {
            Some(IntakeEvent::Prompt(request)) => assert!(request.notes.is_none()),
            other => panic!("expected prompt, got {other:?}"),
        }
    }

    #[test]
    fn skip_appends_item_unchanged() {
        let mut draft = RecipeDraft::new();
        intake(
            &mut draft,
            vec![food("Rice", 100.0)],
            IntakeOptions::new(true),
            &FlatteningNormalizer,
            |_| PromptDecision::Skip,
        )
        .unwrap();
        assert_eq!(draft.items()[0].portion, Some(100.0));
        assert_eq!(draft.items()[0].quantity, None);
    }

    #[test]
    fn accepted_overrides_are_applied() {
        let mut draft = RecipeDraft::new();
        intake(
            &mut draft,
            vec![food("Rice", 100.0)],
            IntakeOptions::new(true),
            &FlatteningNormalizer,
            |_| PromptDecision::accept("150", "2"),
        )
        .unwrap();
        assert_eq!(draft.items()[0].portion, Some(150.0));
        assert_eq!(draft.items()[0].quantity, Some(2.0));
    }

    #[test]
    fn invalid_overrides_are_ignored() {
        let mut draft = RecipeDraft::new();
        intake(
            &mut draft,
            vec![food("Rice", 100.0), food("Beans", 80.0)],
            IntakeOptions::new(true),
            &FlatteningNormalizer,
            |request| {
                if request.index == 0 {
                    PromptDecision::accept("-5", "abc")
                } else {
                    PromptDecision::Accept {
                        portion: Some(String::new()),
                        quantity: None,
                    }
                }
            },
        )
        .unwrap();
        assert_eq!(draft.items()[0].portion, Some(100.0));
        assert_eq!(draft.items()[0].quantity, None);
        assert_eq!(draft.items()[1].portion, Some(80.0));
    }

    #[test]
    fn zero_quantity_is_kept() {
        let mut draft = RecipeDraft::new();
        intake(
            &mut draft,
            vec![food("Rice", 100.0)],
            IntakeOptions::new(true),
            &FlatteningNormalizer,
            |_| PromptDecision::accept("100", "0"),
        )
        .unwrap();
        assert_eq!(draft.items()[0].quantity, Some(0.0));
    }

    #[test]
    fn normalization_failure_keeps_earlier_items() {
        let mut draft = RecipeDraft::new();
        let items = vec![food("Flour", 500.0), food("Broken", 1.0), food("Salt", 5.0)];
        let err = intake(
            &mut draft,
            items,
            IntakeOptions::new(false),
            &RejectNamed("Broken"),
            |_| PromptDecision::Skip,
        )
        .unwrap_err();

        assert!(matches!(err, IntakeError::Normalization(_)));
        assert_eq!(draft.len(), 1);
        assert_eq!(draft.items()[0].name.as_deref(), Some("Flour"));
    }

    #[test]
    fn aborted_session_yields_nothing_more() {
        let mut draft = RecipeDraft::new();
        let normalizer = RejectNamed("Broken");
        let items = vec![food("Broken", 1.0), food("Salt", 5.0)];
        let mut session =
            IntakeSession::new(&mut draft, &normalizer, items, IntakeOptions::new(true));

        assert!(matches!(session.next_event(), Ok(Some(IntakeEvent::Prompt(_)))));
        assert!(session.resolve(PromptDecision::Skip).is_err());
        assert_eq!(session.state(), IntakeState::Aborted);
        assert_eq!(session.next_event().unwrap(), None);
    }

    #[test]
    fn out_of_turn_calls_are_rejected() {
        let mut draft = RecipeDraft::new();
        let mut session = IntakeSession::new(
            &mut draft,
            &FlatteningNormalizer,
            vec![food("Rice", 100.0)],
            IntakeOptions::new(true),
        );

        assert_eq!(
            session.resolve(PromptDecision::Skip),
            Err(IntakeError::NoPendingDecision)
        );
        session.next_event().unwrap();
        assert_eq!(session.next_event(), Err(IntakeError::DecisionPending(0)));
    }

    #[test]
    fn empty_batch_completes_immediately() {
        let mut draft = RecipeDraft::new();
        let mut session =
            IntakeSession::new(&mut draft, &FlatteningNormalizer, Vec::new(), IntakeOptions::new(true));
        assert_eq!(
            session.next_event().unwrap(),
            Some(IntakeEvent::Completed(IntakeSummary::default()))
        );
    }

    #[test]
    fn parse_override_accepts_only_non_negative_numbers() {
        assert_eq!(parse_override("portion", Some(" 150 ")), Some(150.0));
        assert_eq!(parse_override("portion", Some("0")), Some(0.0));
        assert_eq!(parse_override("portion", Some("-5")), None);
        assert_eq!(parse_override("portion", Some("")), None);
        assert_eq!(parse_override("portion", Some("NaN")), None);
        assert_eq!(parse_override("portion", None), None);
        assert_eq!(parse_override("portion", Some("   ")), None);
        assert_eq!(parse_override("portion", Some("0x10")), None);
    }
}
