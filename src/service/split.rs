use bigdecimal::{BigDecimal, Zero};
use indexmap::{IndexMap, IndexSet};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{MemberId, ParticipantShare};
use crate::service::rounding::{minor_unit, split_equal, to_cents};

/// Equal split of `amount` among `members`.
///
/// Repeated ids collapse onto their first position. The first member carries
/// the rounding remainder.
pub fn equal_shares(amount: &BigDecimal, members: &[MemberId]) -> LedgerResult<Vec<ParticipantShare>> {
    let unique: IndexSet<MemberId> = members.iter().copied().collect();
    if unique.is_empty() {
        return Err(LedgerError::EmptyParticipants);
    }

    let (per_share, remainder) = split_equal(amount, unique.len())?;

    let shares = unique
        .into_iter()
        .enumerate()
        .map(|(idx, member_id)| ParticipantShare {
            member_id,
            amount_owed: if idx == 0 {
                &per_share + &remainder
            } else {
                per_share.clone()
            },
        })
        .collect();

    Ok(shares)
}

/// Custom split: explicit per-member amounts that must add up to `amount`.
///
/// The caller's amounts are checked as given: a total that misses by a cent
/// or more yields `ValidationMismatch` carrying the remaining amount. Zero
/// entries are dropped. Accepted amounts are then stored in cents; whatever
/// rounding leaves over goes to the largest share (first one on ties) so the
/// stored shares add up to `amount` exactly.
pub fn custom_shares(
    amount: &BigDecimal,
    amounts: &IndexMap<MemberId, BigDecimal>,
) -> LedgerResult<Vec<ParticipantShare>> {
    if *amount <= BigDecimal::zero() {
        return Err(LedgerError::invalid(format!("amount must be positive, got {}", amount)));
    }

    let mut requested = Vec::with_capacity(amounts.len());
    let mut total = BigDecimal::zero();

    for (&member_id, owed) in amounts {
        if *owed < BigDecimal::zero() {
            return Err(LedgerError::invalid(format!(
                "member {} cannot owe a negative amount ({})",
                member_id, owed
            )));
        }
        if owed.is_zero() {
            continue;
        }
        total += owed;
        requested.push((member_id, owed));
    }

    let delta = amount - &total;
    if delta.abs() >= minor_unit() {
        return Err(LedgerError::ValidationMismatch {
            expected: amount.clone(),
            actual: total,
            delta,
        });
    }
    if requested.is_empty() {
        return Err(LedgerError::EmptyParticipants);
    }

    let mut shares: Vec<ParticipantShare> = requested
        .into_iter()
        .map(|(member_id, owed)| ParticipantShare {
            member_id,
            amount_owed: to_cents(owed),
        })
        .collect();

    let residue = to_cents(amount) - total_owed(&shares);
    if !residue.is_zero() {
        let mut largest = 0;
        for (idx, share) in shares.iter().enumerate() {
            if share.amount_owed > shares[largest].amount_owed {
                largest = idx;
            }
        }
        let adjusted = &shares[largest].amount_owed + &residue;
        if adjusted < BigDecimal::zero() {
            return Err(LedgerError::invalid(format!(
                "amounts are too small to be stored in cents (left over: {})",
                residue
            )));
        }
        shares[largest].amount_owed = adjusted;
    }

    Ok(shares)
}

/// Sum of all shares
pub fn total_owed(shares: &[ParticipantShare]) -> BigDecimal {
    shares
        .iter()
        .fold(BigDecimal::zero(), |acc, share| acc + &share.amount_owed)
}
