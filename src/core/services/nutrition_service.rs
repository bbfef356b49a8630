//! Aggregate nutrition for a draft's item list.

use crate::{
    core::errors::AggregationError,
    domain::{NormalizedItem, NutrimentSpec, Nutrition, RecipeDraft},
    utils::round_2,
};

/// How an aggregator treats negative nutrient contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationMode {
    /// Negative contributions net out against the rest of the recipe.
    Subtract,
    /// Only positive contributions are summed.
    Add,
}

/// Computes total nutrition for a list of items.
pub trait Aggregator {
    fn aggregate(
        &self,
        items: &[NormalizedItem],
        mode: AggregationMode,
    ) -> Result<Nutrition, AggregationError>;
}

/// Default aggregator: each item's nutrient amounts scaled by its portion
/// and number of servings.
#[derive(Debug, Default, Clone, Copy)]
pub struct NutrientTotals;

impl Aggregator for NutrientTotals {
    fn aggregate(
        &self,
        items: &[NormalizedItem],
        mode: AggregationMode,
    ) -> Result<Nutrition, AggregationError> {
        let mut totals = Nutrition::new();
        for item in items {
            let factor = item.scale_factor();
            for (nutrient, amount) in &item.nutrition {
                let contribution = amount * factor;
                if mode == AggregationMode::Add && contribution < 0.0 {
                    continue;
                }
                *totals.entry(nutrient.clone()).or_insert(0.0) += contribution;
            }
        }

        for (nutrient, total) in totals.iter_mut() {
            if !total.is_finite() {
                return Err(AggregationError(format!(
                    "total for `{nutrient}` is not a number"
                )));
            }
            if *total < 0.0 {
                *total = 0.0;
            }
        }
        Ok(totals)
    }
}

/// Recomputes nutrition from the draft's complete current item list.
pub fn recompute_nutrition<A>(
    draft: &RecipeDraft,
    aggregator: &A,
) -> Result<Nutrition, AggregationError>
where
    A: Aggregator + ?Sized,
{
    let nutrition = aggregator.aggregate(draft.items(), AggregationMode::Subtract)?;
    tracing::debug!(
        items = draft.len(),
        nutrients = nutrition.len(),
        "recomputed recipe nutrition"
    );
    Ok(nutrition)
}

/// Amount of `nutrient`, zero when absent.
pub fn nutrient_amount(nutrition: &Nutrition, nutrient: &str) -> f64 {
    nutrition.get(nutrient).copied().unwrap_or(0.0)
}

/// One displayable nutrition line.
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionRow {
    pub name: String,
    pub unit: String,
    pub amount: f64,
}

/// Display rows in catalogue order. Missing and zero nutrients are left
/// out; amounts are rounded to two decimals.
pub fn nutrition_rows(nutrition: &Nutrition, catalog: &[NutrimentSpec]) -> Vec<NutritionRow> {
    catalog
        .iter()
        .filter_map(|spec| {
            let amount = *nutrition.get(&spec.name)?;
            if amount == 0.0 {
                return None;
            }
            Some(NutritionRow {
                name: spec.name.clone(),
                unit: spec.unit.clone(),
                amount: round_2(amount),
            })
        })
        .collect()
}
