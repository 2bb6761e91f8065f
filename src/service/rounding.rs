use bigdecimal::{BigDecimal, Zero};

use crate::error::{LedgerError, LedgerResult};

/// Split `total` into `n` two-decimal shares.
///
/// Returns `(per_share, remainder)` where `per_share` is `total / n` floored
/// to cents and `remainder = total - per_share * n`. Handing
/// `per_share + remainder` to exactly one party and `per_share` to the rest
/// adds back up to `total` with no drift.
pub fn split_equal(total: &BigDecimal, n: usize) -> LedgerResult<(BigDecimal, BigDecimal)> {
    if n == 0 {
        return Err(LedgerError::invalid("cannot split an amount across zero parties"));
    }
    if *total <= BigDecimal::zero() {
        return Err(LedgerError::invalid(format!("amount must be positive, got {}", total)));
    }

    let parties = BigDecimal::from(n as u64);
    // total is positive, so truncation is a floor
    let per_share = (total / &parties).with_scale(2);
    let remainder = (total - &per_share * &parties).with_scale(2);

    Ok((per_share, remainder))
}

/// Round a money amount to cents (half away from zero)
pub fn to_cents(amount: &BigDecimal) -> BigDecimal {
    amount.round(2).with_scale(2)
}

/// One minor currency unit
pub fn minor_unit() -> BigDecimal {
    BigDecimal::from(1) / BigDecimal::from(100)
}
