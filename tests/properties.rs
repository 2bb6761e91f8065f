use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use proptest::prelude::*;
use indexmap::IndexMap;
use std::collections::HashMap;
use trip_ledger::models::{Balances, Expense, ExpenseCategory, ExpenseParticipant, MemberId};
use trip_ledger::service::{balance, settlement, split};

fn cents(value: u64) -> BigDecimal {
    BigDecimal::from(value) / BigDecimal::from(100)
}

fn sum<'a>(values: impl Iterator<Item = &'a BigDecimal>) -> BigDecimal {
    values.fold(BigDecimal::zero(), |acc, v| acc + v)
}

/// (payer index, amount in cents, participant bitmask)
fn expense_plans() -> impl Strategy<Value = Vec<(usize, u64, u8)>> {
    prop::collection::vec((0usize..6, 1u64..=99_999_999, 1u8..=63), 0..=25)
}

fn build_trip(
    member_count: usize,
    plans: &[(usize, u64, u8)],
) -> (Vec<MemberId>, Vec<Expense>, Vec<ExpenseParticipant>) {
    let members: Vec<MemberId> = (1..=member_count as i64).collect();
    let mut expenses = Vec::new();
    let mut participants = Vec::new();

    for (idx, &(payer_idx, amount, mask)) in plans.iter().enumerate() {
        let expense_id = idx as i64 + 1;
        let chosen: Vec<MemberId> = members
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, m)| *m)
            .collect();
        let chosen = if chosen.is_empty() { vec![members[0]] } else { chosen };

        let expense = Expense {
            id: expense_id,
            trip_id: 1,
            payer_id: members[payer_idx % member_count],
            amount: cents(amount),
            currency: "EUR".to_string(),
            category: ExpenseCategory::Other,
            description: None,
            date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            version: 1,
        };
        for share in split::equal_shares(&expense.amount, &chosen).unwrap() {
            participants.push(ExpenseParticipant {
                expense_id,
                member_id: share.member_id,
                amount_owed: share.amount_owed,
            });
        }
        expenses.push(expense);
    }

    (members, expenses, participants)
}

proptest! {
    #[test]
    fn equal_split_adds_up_exactly(n in 1usize..=50, amount in 1u64..=99_999_999) {
        let total = cents(amount);
        let members: Vec<MemberId> = (1..=n as i64).collect();
        let shares = split::equal_shares(&total, &members).unwrap();

        prop_assert_eq!(shares.len(), n);
        prop_assert_eq!(split::total_owed(&shares), total);
        let base = &shares[n - 1].amount_owed;
        for share in &shares[1..] {
            prop_assert_eq!(&share.amount_owed, base);
        }
        for share in &shares {
            prop_assert!(share.amount_owed.with_scale(2) == share.amount_owed);
        }
        prop_assert!(&shares[0].amount_owed >= base);
    }

    #[test]
    fn custom_split_keeps_every_non_zero_amount(
        cents_per_member in prop::collection::vec(0u64..=99_999_999, 1..=20)
            .prop_filter("needs a non-zero amount", |v| v.iter().any(|c| *c > 0))
    ) {
        let amounts: IndexMap<MemberId, BigDecimal> = cents_per_member
            .iter()
            .enumerate()
            .map(|(i, c)| (i as MemberId + 1, cents(*c)))
            .collect();
        let total = sum(amounts.values());

        let shares = split::custom_shares(&total, &amounts).unwrap();

        prop_assert_eq!(split::total_owed(&shares), total);
        let expected: Vec<(MemberId, BigDecimal)> = amounts
            .iter()
            .filter(|(_, a)| !a.is_zero())
            .map(|(m, a)| (*m, a.clone()))
            .collect();
        let stored: Vec<(MemberId, BigDecimal)> = shares
            .iter()
            .map(|s| (s.member_id, s.amount_owed.clone()))
            .collect();
        prop_assert_eq!(stored, expected);
    }

    #[test]
    fn balances_sum_to_zero(member_count in 1usize..=6, plans in expense_plans()) {
        let (members, expenses, participants) = build_trip(member_count, &plans);
        let balances = balance::compute_balances(&members, &expenses, &participants);

        prop_assert_eq!(balances.len(), member_count);
        prop_assert!(sum(balances.values()).is_zero());
    }

    #[test]
    fn settlements_zero_every_balance(member_count in 1usize..=6, plans in expense_plans()) {
        let (members, expenses, participants) = build_trip(member_count, &plans);
        let balances: Balances = balance::compute_balances(&members, &expenses, &participants);
        let suggestions = settlement::resolve_settlements(&balances, "EUR");

        let mut adjusted: HashMap<MemberId, BigDecimal> =
            balances.iter().map(|(m, b)| (*m, b.clone())).collect();
        let mut paid_by: HashMap<MemberId, BigDecimal> = HashMap::new();

        for s in &suggestions {
            let debtor_balance = &balances[&s.from_member];
            let creditor_balance = &balances[&s.to_member];
            prop_assert!(s.amount > BigDecimal::zero());
            prop_assert!(s.amount <= debtor_balance.abs());
            prop_assert!(&s.amount <= creditor_balance);

            *adjusted.get_mut(&s.from_member).unwrap() += &s.amount;
            *adjusted.get_mut(&s.to_member).unwrap() -= &s.amount;
            *paid_by.entry(s.from_member).or_insert_with(BigDecimal::zero) += &s.amount;
        }

        for (member, balance) in &adjusted {
            prop_assert!(balance.is_zero(), "member {} left with {}", member, balance);
        }
        for (member, balance) in balances.iter().filter(|(_, b)| **b < BigDecimal::zero()) {
            prop_assert_eq!(&paid_by[member], &balance.abs());
        }
    }
}
