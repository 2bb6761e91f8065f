use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use serde::Serialize;

use super::MemberId;

/// Net position per member, in membership order. Positive = is owed money.
pub type Balances = IndexMap<MemberId, BigDecimal>;

/// Suggested transfer, recomputed on every request and never stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementSuggestion {
    pub from_member: MemberId,
    pub to_member: MemberId,
    pub amount: BigDecimal,
    pub currency: String,
}
