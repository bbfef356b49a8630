//! Conversion of picker items into flattened recipe entries.

use crate::{
    core::errors::NormalizationError,
    domain::{IncomingItem, NormalizedItem},
};

/// Turns a raw incoming item into a [`NormalizedItem`].
pub trait Normalizer {
    fn normalize(&self, item: &IncomingItem) -> Result<NormalizedItem, NormalizationError>;
}

/// Default normalizer. Foods and recipes keep their own nutrition; meals
/// are collapsed into one entry whose nutrition is the sum of their
/// contents for a single serving of the meal.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlatteningNormalizer;

impl Normalizer for FlatteningNormalizer {
    fn normalize(&self, item: &IncomingItem) -> Result<NormalizedItem, NormalizationError> {
        let fail = |reason: String| NormalizationError {
            reference: item.reference.to_string(),
            reason,
        };

        check_amount("portion", item.portion).map_err(fail)?;
        check_amount("quantity", item.quantity).map_err(fail)?;
        check_amount("nutrition portion", item.nutrition_portion).map_err(fail)?;
        for (nutrient, amount) in &item.nutrition {
            if !amount.is_finite() {
                return Err(fail(format!("nutrient `{nutrient}` is not a number")));
            }
        }

        if item.items.is_empty() {
            return Ok(NormalizedItem {
                reference: item.reference,
                name: item.name.clone(),
                unit: item.unit.clone(),
                notes: item.notes.clone(),
                portion: item.portion,
                quantity: item.quantity,
                nutrition: item.nutrition.clone(),
                nutrition_portion: item.nutrition_portion,
            });
        }

        let mut nutrition = item.nutrition.clone();
        for child in &item.items {
            let flattened = self.normalize(child)?;
            let factor = flattened.scale_factor();
            for (nutrient, amount) in flattened.nutrition {
                *nutrition.entry(nutrient).or_insert(0.0) += amount * factor;
            }
        }

        Ok(NormalizedItem {
            reference: item.reference,
            name: item.name.clone(),
            unit: item.unit.clone(),
            notes: item.notes.clone(),
            portion: item.portion,
            quantity: item.quantity,
            nutrition,
            nutrition_portion: None,
        })
    }
}

fn check_amount(field: &str, value: Option<f64>) -> Result<(), String> {
    match value {
        Some(amount) if !amount.is_finite() => Err(format!("{field} is not a number")),
        Some(amount) if amount < 0.0 => Err(format!("{field} must not be negative")),
        _ => Ok(()),
    }
}
