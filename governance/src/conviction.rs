//! Conviction-weighted voting power and lock durations.

use referenda_types::{Balance, Conviction, VoteWeight};

use crate::error::GovernanceError;

/// Voting power of `balance` locked with `conviction`.
///
/// `power = balance × weight`, where the weight is 0.1 without conviction and
/// `N` for `LockedNx`. No intermediate product is rounded; only the
/// fractional unit of the final result is dropped (rounds down, as on chain).
pub fn voting_power(balance: Balance, conviction: Conviction) -> Result<Balance, GovernanceError> {
    apply_weight(balance, conviction.weight())
}

/// Like [`voting_power`], but clamps to `Balance::MAX` on overflow.
pub fn voting_power_saturating(balance: Balance, conviction: Conviction) -> Balance {
    voting_power(balance, conviction).unwrap_or(Balance::MAX)
}

/// Multiply a balance by an exact decimal weight without widening.
///
/// Splitting `balance = 10q + r` gives `balance × t / 10 = q·t + r·t/10`, so
/// only the final result can overflow, never an intermediate product.
pub(crate) fn apply_weight(balance: Balance, weight: VoteWeight) -> Result<Balance, GovernanceError> {
    let denominator = u128::from(VoteWeight::DENOMINATOR);
    let tenths = u128::from(weight.tenths());
    let whole = balance.raw() / denominator;
    let rest = balance.raw() % denominator;
    whole
        .checked_mul(tenths)
        .and_then(|w| w.checked_add(rest * tenths / denominator))
        .map(Balance::new)
        .ok_or(GovernanceError::ArithmeticOverflow {
            context: "voting power",
        })
}

/// Blocks a balance stays locked after the referendum it voted on ends.
pub fn lock_duration(conviction: Conviction, vote_locking_period: u64) -> u64 {
    conviction.lock_periods().saturating_mul(vote_locking_period)
}

/// Decode a raw conviction tag, falling back to `None` for tags this client
/// does not know yet.
pub fn decode_conviction(tag: u8) -> Conviction {
    Conviction::try_from(tag).unwrap_or_else(|_| {
        tracing::warn!(error = %GovernanceError::UnknownConviction(tag), "using no conviction");
        Conviction::None
    })
}
