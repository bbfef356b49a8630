//! Raw picker items and their normalized, flattened form.

use serde::{Deserialize, Serialize};

use crate::domain::common::{ItemRef, NamedEntity, Nutrition};

/// An item handed over by a picker screen before normalization.
///
/// Foods and recipes usually carry a `name` and a `unit`; such items are
/// eligible for the portion/quantity prompt. Meal references without those
/// fields are added as they are.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncomingItem {
    pub reference: ItemRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portion: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Nutrient amounts for `nutrition_portion` units of this item.
    #[serde(default, skip_serializing_if = "Nutrition::is_empty")]
    pub nutrition: Nutrition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition_portion: Option<f64>,
    /// Contents of a meal reference.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<IncomingItem>,
}

impl IncomingItem {
    /// A food with a name, unit and serving size hint.
    pub fn food(
        reference: ItemRef,
        name: impl Into<String>,
        unit: impl Into<String>,
        portion: Option<f64>,
    ) -> Self {
        Self {
            reference,
            name: Some(name.into()),
            unit: Some(unit.into()),
            portion,
            quantity: None,
            notes: None,
            nutrition: Nutrition::new(),
            nutrition_portion: portion,
            items: Vec::new(),
        }
    }

    /// A meal reference wrapping already picked items.
    pub fn meal(reference: ItemRef, items: Vec<IncomingItem>) -> Self {
        Self {
            reference,
            name: None,
            unit: None,
            portion: None,
            quantity: None,
            notes: None,
            nutrition: Nutrition::new(),
            nutrition_portion: None,
            items,
        }
    }

    pub fn with_nutrient(mut self, nutrient: impl Into<String>, amount: f64) -> Self {
        self.nutrition.insert(nutrient.into(), amount);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Items with both a name and a unit can be confirmed interactively.
    pub fn is_promptable(&self) -> bool {
        self.name.is_some() && self.unit.is_some()
    }
}

impl NamedEntity for IncomingItem {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Canonical flattened item stored in a recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedItem {
    pub reference: ItemRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portion: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Nutrition::is_empty")]
    pub nutrition: Nutrition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition_portion: Option<f64>,
}

impl NormalizedItem {
    /// Number of servings, one when unset.
    pub fn servings(&self) -> f64 {
        self.quantity.unwrap_or(1.0)
    }

    /// Multiplier applied to `nutrition` to get this entry's contribution.
    pub fn scale_factor(&self) -> f64 {
        let portion_ratio = match (self.portion, self.nutrition_portion) {
            (Some(portion), Some(base)) if base > 0.0 => portion / base,
            _ => 1.0,
        };
        self.servings() * portion_ratio
    }
}

impl NamedEntity for NormalizedItem {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn only_named_items_with_units_are_promptable() {
        let food = IncomingItem::food(ItemRef::Food(Uuid::new_v4()), "Rice", "g", Some(100.0));
        let meal = IncomingItem::meal(ItemRef::Meal(Uuid::new_v4()), vec![food.clone()]);

        assert!(food.is_promptable());
        assert!(!meal.is_promptable());
    }

    #[test]
    fn scale_factor_combines_portion_and_quantity() {
        let item = NormalizedItem {
            reference: ItemRef::Food(Uuid::new_v4()),
            name: Some("Milk".into()),
            unit: Some("ml".into()),
            notes: None,
            portion: Some(250.0),
            quantity: Some(2.0),
            nutrition: Nutrition::new(),
            nutrition_portion: Some(100.0),
        };
        assert_eq!(item.scale_factor(), 5.0);
    }

    #[test]
    fn incoming_item_deserializes_minimal_meal() {
        let id = Uuid::new_v4();
        let raw = format!(r#"{{"reference":{{"type":"meal","id":"{id}"}}}}"#);
        let item: IncomingItem = serde_json::from_str(&raw).unwrap();
        assert_eq!(item.reference, ItemRef::Meal(id));
        assert!(item.items.is_empty());
        assert!(!item.is_promptable());
    }
}
