use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{MemberId, TripId};

pub type RecipeId = i64;
pub type FoodItemId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Weight,
    Volume,
    Count,
}

text_enum!(UnitType, "unit type", {
    Weight => "weight",
    Volume => "volume",
    Count => "count",
});

/// Canonical ingredient reference (food_items), read-only for this crate
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: FoodItemId,
    pub name: String,
    pub standard_unit: String,
    #[sqlx(try_from = "String")]
    pub unit_type: UnitType,
    pub category: String,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub recipe_id: RecipeId,
    pub name: String,
    pub quantity: BigDecimal,
    pub unit: String,
    pub category: String,
    pub food_item_id: Option<FoodItemId>,
}

/// Recipe with its ingredients. `parent_id` points at the recipe it was copied from.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub servings: i32,
    pub trip_id: Option<TripId>,
    pub owner_id: Option<MemberId>,
    pub parent_id: Option<RecipeId>,
    #[sqlx(skip)]
    pub ingredients: Vec<Ingredient>,
}
