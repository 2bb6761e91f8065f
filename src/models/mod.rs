/// Raised when a stored enum column holds an unknown value
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Implements the string round trip used for TEXT enum columns
macro_rules! text_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl std::str::FromStr for $ty {
            type Err = $crate::models::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err($crate::models::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $ty {
            type Error = $crate::models::UnknownVariant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod expense;
pub mod ledger;
pub mod member;
pub mod recipe;
pub mod shopping;

pub use expense::{Expense, ExpenseCategory, ExpenseId, ExpenseParticipant, NewExpense, ParticipantShare};
pub use ledger::{Balances, SettlementSuggestion};
pub use member::{Member, MemberId, Role, Trip, TripId};
pub use recipe::{FoodItem, FoodItemId, Ingredient, Recipe, RecipeId, UnitType};
pub use shopping::{ListStatus, ShoppingItem, ShoppingItemDraft, ShoppingItemId, ShoppingList, SourceType};
