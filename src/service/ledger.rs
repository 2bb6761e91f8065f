use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;

use crate::db::ExpenseRepository;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Balances, Expense, ExpenseId, ExpenseParticipant, Member, MemberId, NewExpense,
    ParticipantShare, SettlementSuggestion, Trip, TripId,
};
use crate::service::rounding::to_cents;
use crate::service::{balance, settlement, split};

/// Expense splitting, balances and settlement suggestions for trips
pub struct LedgerService {
    repo: Arc<dyn ExpenseRepository>,
}

impl LedgerService {
    pub fn new(repo: Arc<dyn ExpenseRepository>) -> Self {
        Self { repo }
    }

    async fn trip(&self, trip_id: TripId) -> LedgerResult<Trip> {
        self.repo
            .find_trip(trip_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Trip", trip_id))
    }

    async fn expense(&self, expense_id: ExpenseId) -> LedgerResult<Expense> {
        self.repo
            .find_expense(expense_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Expense", expense_id))
    }

    /// Net balance of every trip member, in membership order
    pub async fn compute_balances(&self, trip_id: TripId) -> LedgerResult<Balances> {
        let trip = self.trip(trip_id).await?;
        self.trip_balances(&trip).await
    }

    async fn trip_balances(&self, trip: &Trip) -> LedgerResult<Balances> {
        let (members, expenses, participants) = futures::try_join!(
            self.repo.list_members(trip.id),
            self.repo.list_expenses(trip.id),
            self.repo.list_trip_participants(trip.id),
        )?;
        let member_ids: Vec<MemberId> = members.iter().map(|m| m.member_id).collect();

        tracing::debug!(
            "Trip {}: balancing {} expenses across {} members",
            trip.id,
            expenses.len(),
            member_ids.len()
        );
        let unreported = balance::rows_outside_membership(&member_ids, &expenses, &participants);
        if unreported > 0 {
            tracing::warn!(
                "Trip {}: {} expense rows belong to non-members and are left out, balances will not net to zero",
                trip.id,
                unreported
            );
        }
        Ok(balance::compute_balances(&member_ids, &expenses, &participants))
    }

    /// Balance of one member; zero for anyone outside the trip
    pub async fn balance_for(&self, trip_id: TripId, member_id: MemberId) -> LedgerResult<BigDecimal> {
        self.trip(trip_id).await?;

        let members = self.repo.list_members(trip_id).await?;
        if !members.iter().any(|m| m.member_id == member_id) {
            return Ok(BigDecimal::zero());
        }

        let (expenses, participants) = futures::try_join!(
            self.repo.list_expenses(trip_id),
            self.repo.list_trip_participants(trip_id),
        )?;
        Ok(balance::balance_for(member_id, &expenses, &participants))
    }

    /// Transfers that zero out the current balances, in the trip currency
    pub async fn compute_settlements(&self, trip_id: TripId) -> LedgerResult<Vec<SettlementSuggestion>> {
        let trip = self.trip(trip_id).await?;
        let balances = self.trip_balances(&trip).await?;
        let suggestions = settlement::resolve_settlements(&balances, &trip.currency);

        tracing::info!(
            "Trip {}: {} settlement transfers suggested",
            trip_id,
            suggestions.len()
        );
        Ok(suggestions)
    }

    /// Record an expense paid by a trip member. Participants are set by a later split.
    pub async fn record_expense(&self, trip_id: TripId, expense: NewExpense) -> LedgerResult<Expense> {
        let trip = self.trip(trip_id).await?;

        let amount = to_cents(&expense.amount);
        if amount <= BigDecimal::zero() {
            return Err(LedgerError::invalid(format!(
                "amount must be positive, got {}",
                expense.amount
            )));
        }
        let currency = match &expense.currency {
            Some(code) => code.trim().to_ascii_uppercase(),
            None => trip.currency.clone(),
        };
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(LedgerError::invalid(format!("invalid currency code `{}`", currency)));
        }
        if currency != trip.currency {
            return Err(LedgerError::invalid(format!(
                "trip {} is kept in {}, got {}",
                trip_id, trip.currency, currency
            )));
        }

        let members = self.repo.list_members(trip_id).await?;
        if !members.iter().any(|m| m.member_id == expense.payer_id) {
            return Err(LedgerError::invalid(format!(
                "payer {} is not a member of trip {}",
                expense.payer_id, trip_id
            )));
        }

        let expense = NewExpense { amount, ..expense };
        let stored = self.repo.insert_expense(trip_id, &expense, &currency).await?;
        tracing::info!(
            "Trip {}: expense {} recorded ({} {} paid by {})",
            trip_id,
            stored.id,
            stored.amount,
            stored.currency,
            stored.payer_id
        );
        Ok(stored)
    }

    /// Split an expense equally; the first listed member absorbs the rounding remainder
    pub async fn apply_equal_split(
        &self,
        expense_id: ExpenseId,
        member_ids: &[MemberId],
    ) -> LedgerResult<Vec<ExpenseParticipant>> {
        let expense = self.expense(expense_id).await?;
        let shares = split::equal_shares(&expense.amount, member_ids)?;
        self.replace(&expense, shares).await
    }

    /// Split an expense by explicit amounts that must total the expense
    pub async fn apply_custom_split(
        &self,
        expense_id: ExpenseId,
        amounts: &IndexMap<MemberId, BigDecimal>,
    ) -> LedgerResult<Vec<ExpenseParticipant>> {
        let expense = self.expense(expense_id).await?;
        let shares = match split::custom_shares(&expense.amount, amounts) {
            Ok(shares) => shares,
            Err(e) => {
                tracing::info!("Expense {}: custom split rejected: {}", expense_id, e);
                return Err(e);
            }
        };
        self.replace(&expense, shares).await
    }

    pub async fn participants(&self, expense_id: ExpenseId) -> LedgerResult<Vec<ExpenseParticipant>> {
        self.expense(expense_id).await?;
        self.repo.list_participants(expense_id).await
    }

    /// Role check for callers about to create or split expenses
    pub async fn ensure_can_manage(&self, trip_id: TripId, member_id: MemberId) -> LedgerResult<Member> {
        self.trip(trip_id).await?;
        let members = self.repo.list_members(trip_id).await?;

        match members.into_iter().find(|m| m.member_id == member_id) {
            Some(member) if member.can_manage_expenses() => Ok(member),
            _ => Err(LedgerError::Forbidden { trip_id, member_id }),
        }
    }

    /// Trip id of an expense, for callers that authorize per trip
    pub async fn expense_trip(&self, expense_id: ExpenseId) -> LedgerResult<TripId> {
        Ok(self.expense(expense_id).await?.trip_id)
    }

    async fn replace(
        &self,
        expense: &Expense,
        shares: Vec<ParticipantShare>,
    ) -> LedgerResult<Vec<ExpenseParticipant>> {
        let members: HashSet<MemberId> = self
            .repo
            .list_members(expense.trip_id)
            .await?
            .into_iter()
            .map(|m| m.member_id)
            .collect();
        if let Some(outsider) = shares.iter().find(|s| !members.contains(&s.member_id)) {
            return Err(LedgerError::invalid(format!(
                "member {} is not part of trip {}",
                outsider.member_id, expense.trip_id
            )));
        }

        let updated = match self
            .repo
            .replace_participants(expense.id, expense.version, &shares)
            .await
        {
            Ok(updated) => updated,
            Err(e @ LedgerError::ConcurrencyConflict { .. }) => {
                tracing::warn!("Expense {}: split lost a concurrent update", expense.id);
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            "Expense {}: {} participants split {} (version {})",
            updated.id,
            shares.len(),
            updated.amount,
            updated.version
        );

        Ok(shares
            .into_iter()
            .map(|share| ExpenseParticipant {
                expense_id: updated.id,
                member_id: share.member_id,
                amount_owed: share.amount_owed,
            })
            .collect())
    }
}
