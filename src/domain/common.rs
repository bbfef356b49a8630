//! Shared identifiers and value types for recipe items.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Nutrient name to amount, ordered by name.
pub type Nutrition = BTreeMap<String, f64>;

/// Collection that recipe records are written to.
pub const RECIPES_COLLECTION: &str = "recipes";

/// A nutrient known to the display catalogue, with its unit symbol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NutrimentSpec {
    pub name: String,
    pub unit: String,
}

impl NutrimentSpec {
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
        }
    }
}

/// Exposes a stable display name for item-like entities.
pub trait NamedEntity {
    fn name(&self) -> Option<&str>;
}

/// Points at the food, meal or recipe an item was picked from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum ItemRef {
    Food(Uuid),
    Meal(Uuid),
    Recipe(Uuid),
}

impl ItemRef {
    pub fn id(&self) -> Uuid {
        match self {
            ItemRef::Food(id) | ItemRef::Meal(id) | ItemRef::Recipe(id) => *id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ItemRef::Food(_) => "food",
            ItemRef::Meal(_) => "meal",
            ItemRef::Recipe(_) => "recipe",
        }
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_ref_serializes_with_type_tag() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(ItemRef::Meal(id)).unwrap();
        assert_eq!(json["type"], "meal");
        assert_eq!(json["id"], id.to_string());
    }
}
