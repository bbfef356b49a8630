pub mod draft_service;
pub mod intake_service;
pub mod normalizer;
pub mod nutrition_service;
pub mod save_service;

pub use draft_service::{init_draft, DraftService};
pub use intake_service::{
    intake, parse_override, IntakeEvent, IntakeOptions, IntakeSession, IntakeState,
    IntakeSummary, PromptDecision, PromptRequest, PROMPT_TEXT_LIMIT,
};
pub use normalizer::{FlatteningNormalizer, Normalizer};
pub use nutrition_service::{
    nutrient_amount, nutrition_rows, recompute_nutrition, AggregationMode, Aggregator,
    NutrientTotals, NutritionRow,
};
pub use save_service::{build_record, save};
