use bigdecimal::{BigDecimal, Zero};
use std::collections::HashSet;

use crate::models::{Balances, Expense, ExpenseId, ExpenseParticipant, MemberId};

/// Net balance of one member: paid as payer minus owed as participant.
///
/// Participant rows whose expense is not in `expenses` are ignored, so a
/// caller can pass rows from other trips safely.
pub fn balance_for(
    member_id: MemberId,
    expenses: &[Expense],
    participants: &[ExpenseParticipant],
) -> BigDecimal {
    let trip_expenses: HashSet<ExpenseId> = expenses.iter().map(|e| e.id).collect();

    let paid = expenses
        .iter()
        .filter(|e| e.payer_id == member_id)
        .fold(BigDecimal::zero(), |acc, e| acc + &e.amount);
    let owed = participants
        .iter()
        .filter(|p| p.member_id == member_id && trip_expenses.contains(&p.expense_id))
        .fold(BigDecimal::zero(), |acc, p| acc + &p.amount_owed);

    paid - owed
}

/// Balances for every member, in the order given. Amounts paid or owed by
/// ids outside `members` do not appear.
pub fn compute_balances(
    members: &[MemberId],
    expenses: &[Expense],
    participants: &[ExpenseParticipant],
) -> Balances {
    let mut balances: Balances = members
        .iter()
        .map(|&member_id| (member_id, BigDecimal::zero()))
        .collect();
    let trip_expenses: HashSet<ExpenseId> = expenses.iter().map(|e| e.id).collect();

    for expense in expenses {
        if let Some(balance) = balances.get_mut(&expense.payer_id) {
            *balance += &expense.amount;
        }
    }
    for participant in participants {
        if !trip_expenses.contains(&participant.expense_id) {
            continue;
        }
        if let Some(balance) = balances.get_mut(&participant.member_id) {
            *balance -= &participant.amount_owed;
        }
    }

    balances
}

/// Expense and participant rows of the trip whose member is not in `members`.
/// Non-zero means `compute_balances` will not net to zero.
pub fn rows_outside_membership(
    members: &[MemberId],
    expenses: &[Expense],
    participants: &[ExpenseParticipant],
) -> usize {
    let members: HashSet<MemberId> = members.iter().copied().collect();
    let trip_expenses: HashSet<ExpenseId> = expenses.iter().map(|e| e.id).collect();

    let payers = expenses
        .iter()
        .filter(|e| !members.contains(&e.payer_id))
        .count();
    let owers = participants
        .iter()
        .filter(|p| trip_expenses.contains(&p.expense_id) && !members.contains(&p.member_id))
        .count();

    payers + owers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseCategory;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn expense(id: ExpenseId, payer_id: MemberId, amount: &str) -> Expense {
        Expense {
            id,
            trip_id: 1,
            payer_id,
            amount: dec(amount),
            currency: "EUR".to_string(),
            category: ExpenseCategory::Food,
            description: None,
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            version: 1,
        }
    }

    fn owes(expense_id: ExpenseId, member_id: MemberId, amount: &str) -> ExpenseParticipant {
        ExpenseParticipant {
            expense_id,
            member_id,
            amount_owed: dec(amount),
        }
    }

    #[test]
    fn two_members_one_expense() {
        let expenses = vec![expense(1, 1, "100.00")];
        let participants = vec![owes(1, 1, "50.00"), owes(1, 2, "50.00")];

        let balances = compute_balances(&[1, 2], &expenses, &participants);
        assert_eq!(balances[&1], dec("50"));
        assert_eq!(balances[&2], dec("-50"));
    }

    #[test]
    fn three_members_two_expenses() {
        let expenses = vec![expense(1, 1, "60"), expense(2, 2, "30")];
        let participants = vec![
            owes(1, 1, "20"),
            owes(1, 2, "20"),
            owes(1, 3, "20"),
            owes(2, 1, "10"),
            owes(2, 2, "10"),
            owes(2, 3, "10"),
        ];

        let balances = compute_balances(&[1, 2, 3], &expenses, &participants);
        assert_eq!(balances.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(balances[&1], dec("30"));
        assert_eq!(balances[&2], dec("0"));
        assert_eq!(balances[&3], dec("-30"));

        let net = balances.values().fold(BigDecimal::zero(), |acc, b| acc + b);
        assert!(net.is_zero());
        assert_eq!(balance_for(3, &expenses, &participants), dec("-30"));
    }

    #[test]
    fn non_member_balance_is_zero() {
        let expenses = vec![expense(1, 1, "10")];
        let participants = vec![owes(1, 1, "10")];
        assert!(balance_for(42, &expenses, &participants).is_zero());
    }

    #[test]
    fn foreign_participant_rows_are_ignored() {
        let expenses = vec![expense(1, 1, "10")];
        let participants = vec![owes(1, 2, "10"), owes(99, 2, "500")];
        assert_eq!(balance_for(2, &expenses, &participants), dec("-10"));
        assert_eq!(compute_balances(&[2], &expenses, &participants)[&2], dec("-10"));
    }

    #[test]
    fn former_member_rows_are_counted() {
        let expenses = vec![expense(1, 1, "30"), expense(2, 9, "12")];
        let participants = vec![
            owes(1, 1, "10"),
            owes(1, 2, "10"),
            owes(1, 9, "10"),
            owes(2, 2, "12"),
            owes(77, 9, "5"),
        ];

        assert_eq!(rows_outside_membership(&[1, 2], &expenses, &participants), 2);
        assert_eq!(rows_outside_membership(&[1, 2, 9], &expenses, &participants), 0);

        let balances = compute_balances(&[1, 2], &expenses, &participants);
        let net = balances.values().fold(BigDecimal::zero(), |acc, b| acc + b);
        assert_eq!(net, dec("-2"));
    }
}
