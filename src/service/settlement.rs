use bigdecimal::{BigDecimal, Zero};

use crate::models::{Balances, MemberId, SettlementSuggestion};

/// Greedy first-fit settlement.
///
/// Debtors (negative balance) are walked in input order and paired with
/// creditors (positive balance) in input order; each transfer moves the
/// smaller of the open debt and open credit. A creditor is left behind once
/// fully paid. The result always zeroes a balanced sheet but is not
/// guaranteed to use the fewest transfers.
pub fn resolve_settlements(balances: &Balances, currency: &str) -> Vec<SettlementSuggestion> {
    let zero = BigDecimal::zero();

    let debtors: Vec<(MemberId, BigDecimal)> = balances
        .iter()
        .filter(|(_, balance)| **balance < zero)
        .map(|(&member, balance)| (member, balance.abs()))
        .collect();
    let mut creditors: Vec<(MemberId, BigDecimal)> = balances
        .iter()
        .filter(|(_, balance)| **balance > zero)
        .map(|(&member, balance)| (member, balance.clone()))
        .collect();

    let mut suggestions = Vec::new();
    let mut cursor = 0;

    for (debtor, mut debt) in debtors {
        while debt > zero && cursor < creditors.len() {
            let (creditor, credit) = &mut creditors[cursor];
            let amount = if debt < *credit {
                debt.clone()
            } else {
                credit.clone()
            };

            debt -= &amount;
            *credit -= &amount;
            suggestions.push(SettlementSuggestion {
                from_member: debtor,
                to_member: *creditor,
                amount,
                currency: currency.to_string(),
            });

            if *credit <= zero {
                cursor += 1;
            }
        }
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn sheet(entries: &[(MemberId, &str)]) -> Balances {
        entries.iter().map(|(m, b)| (*m, dec(b))).collect()
    }

    fn transfers(suggestions: &[SettlementSuggestion]) -> Vec<(MemberId, MemberId, BigDecimal)> {
        suggestions
            .iter()
            .map(|s| (s.from_member, s.to_member, s.amount.clone()))
            .collect()
    }

    #[test]
    fn single_debtor_single_creditor() {
        let result = resolve_settlements(&sheet(&[(1, "50.00"), (2, "-50.00")]), "EUR");
        assert_eq!(transfers(&result), vec![(2, 1, dec("50.00"))]);
        assert_eq!(result[0].currency, "EUR");
    }

    #[test]
    fn zero_balances_take_no_part() {
        let result = resolve_settlements(&sheet(&[(1, "30"), (2, "0"), (3, "-30")]), "EUR");
        assert_eq!(transfers(&result), vec![(3, 1, dec("30"))]);
    }

    #[test]
    fn debtor_spreads_over_creditors_in_order() {
        let balances = sheet(&[(1, "-70"), (2, "40"), (3, "-10"), (4, "40")]);
        let result = resolve_settlements(&balances, "EUR");
        assert_eq!(
            transfers(&result),
            vec![(1, 2, dec("40")), (1, 4, dec("30")), (3, 4, dec("10"))]
        );
    }

    #[test]
    fn greedy_is_not_always_minimal() {
        // largest-first would need two transfers here, first-fit uses three
        let balances = sheet(&[(1, "-5"), (2, "-10"), (3, "10"), (4, "5")]);
        let result = resolve_settlements(&balances, "EUR");
        assert_eq!(
            transfers(&result),
            vec![(1, 3, dec("5")), (2, 3, dec("5")), (2, 4, dec("5"))]
        );
    }

    #[test]
    fn settled_sheet_yields_nothing() {
        assert!(resolve_settlements(&sheet(&[(1, "0"), (2, "0")]), "EUR").is_empty());
        assert!(resolve_settlements(&Balances::new(), "EUR").is_empty());
    }
}
