use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::TripId;

pub type ShoppingItemId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceType {
    Recipe,
    Manual,
}

text_enum!(SourceType, "source type", {
    Recipe => "recipe",
    Manual => "manual",
});

/// Shopping list lifecycle: draft -> active (generated) -> completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStatus {
    Draft,
    Active,
    Completed,
}

text_enum!(ListStatus, "list status", {
    Draft => "draft",
    Active => "active",
    Completed => "completed",
});

impl ListStatus {
    /// Draft and active lists count as the trip's current list
    pub fn is_current(&self) -> bool {
        matches!(self, ListStatus::Draft | ListStatus::Active)
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ShoppingList {
    pub id: i64,
    pub trip_id: TripId,
    #[sqlx(try_from = "String")]
    pub status: ListStatus,
    pub people_count: Option<i32>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: ShoppingItemId,
    pub list_id: i64,
    pub name: String,
    pub quantity: BigDecimal,
    pub unit: String,
    pub category: String,
    #[sqlx(try_from = "String")]
    pub source_type: SourceType,
    pub purchased: bool,
}

/// Item shape produced by the aggregator (or a manual entry) before it is stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingItemDraft {
    pub name: String,
    pub quantity: BigDecimal,
    pub unit: String,
    pub category: String,
    pub source_type: SourceType,
}
