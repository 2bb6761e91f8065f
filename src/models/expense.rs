use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{MemberId, TripId};

pub type ExpenseId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Food,
    Accommodation,
    Transport,
    Activities,
    Shopping,
    Other,
}

text_enum!(ExpenseCategory, "expense category", {
    Food => "food",
    Accommodation => "accommodation",
    Transport => "transport",
    Activities => "activities",
    Shopping => "shopping",
    Other => "other",
});

/// Expense paid by one member (expenses)
///
/// `version` is bumped on every participant replacement and guards
/// concurrent split edits.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub trip_id: TripId,
    pub payer_id: MemberId,
    pub amount: BigDecimal,
    pub currency: String,
    #[sqlx(try_from = "String")]
    pub category: ExpenseCategory,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub version: i64,
}

/// Share of an expense owed by one member (expense_participants)
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ExpenseParticipant {
    pub expense_id: ExpenseId,
    pub member_id: MemberId,
    pub amount_owed: BigDecimal,
}

/// Computed share before it is persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantShare {
    pub member_id: MemberId,
    pub amount_owed: BigDecimal,
}

/// Input for recording a new expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub payer_id: MemberId,
    pub amount: BigDecimal,
    pub currency: Option<String>,
    pub category: ExpenseCategory,
    pub description: Option<String>,
    pub date: NaiveDate,
}
