//! Delegation aggregation: who delegates to whom, on which tracks, with how
//! much balance.
//!
//! An account may delegate to several targets, each on a disjoint set of
//! tracks. The balance behind those delegations is one locked balance
//! reused per track, so wallet-level totals count each account's largest
//! delegation once instead of summing across tracks.

use referenda_types::{AccountVote, Address, Balance, Conviction, Delegation, TrackId, VotingRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A delegator's balance and conviction towards one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatedBalance {
    pub conviction: Conviction,
    pub balance: Balance,
}

/// Delegations grouped by target, then by delegator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationSummary {
    /// target → delegator → balance.
    pub balances: BTreeMap<Address, BTreeMap<Address, DelegatedBalance>>,
    /// target → delegator → delegated tracks, ascending.
    pub tracks: BTreeMap<Address, BTreeMap<Address, Vec<TrackId>>>,
    /// Sum over delegating accounts of their largest single delegation.
    pub total_delegated: Balance,
}

impl DelegationSummary {
    /// Accounts delegating to `target`.
    pub fn delegators_of(&self, target: &Address) -> Vec<&Address> {
        self.balances
            .get(target)
            .map(|delegators| delegators.keys().collect())
            .unwrap_or_default()
    }

    /// Balance delegated to `target`, one balance per delegator.
    pub fn delegated_to(&self, target: &Address) -> Balance {
        self.balances
            .get(target)
            .map(|delegators| delegators.values().map(|d| d.balance).sum())
            .unwrap_or_default()
    }

    /// Tracks `delegator` delegated to `target` on.
    pub fn tracks_of(&self, target: &Address, delegator: &Address) -> &[TrackId] {
        self.tracks
            .get(target)
            .and_then(|delegators| delegators.get(delegator))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Group every active delegation in `records` by target and delegator.
///
/// Only delegating entries are considered, whether listed under the record's
/// delegations or stored as a `Delegating` vote; records that only cast
/// votes contribute nothing. Delegations with an empty track set are inert.
pub fn aggregate_delegations<'a, I>(records: I) -> DelegationSummary
where
    I: IntoIterator<Item = &'a VotingRecord>,
{
    let mut summary = DelegationSummary::default();

    for record in records {
        let mut largest = Balance::ZERO;

        for delegation in delegations_of(record).filter(|d| !d.tracks.is_empty()) {
            let entry = summary
                .balances
                .entry(delegation.target.clone())
                .or_default()
                .entry(record.address.clone())
                .or_insert(DelegatedBalance {
                    conviction: delegation.conviction,
                    balance: delegation.balance,
                });
            if delegation.balance > entry.balance {
                *entry = DelegatedBalance {
                    conviction: delegation.conviction,
                    balance: delegation.balance,
                };
            }

            let tracks = summary
                .tracks
                .entry(delegation.target.clone())
                .or_default()
                .entry(record.address.clone())
                .or_default();
            tracks.extend(delegation.tracks.iter().copied());
            tracks.sort_unstable();
            tracks.dedup();

            largest = largest.max(delegation.balance);
        }

        summary.total_delegated = summary
            .total_delegated
            .checked_add(largest)
            .unwrap_or_else(|| {
                tracing::warn!(address = %record.address, "delegated total overflowed, saturating");
                Balance::MAX
            });
    }

    summary
}

fn delegations_of(record: &VotingRecord) -> impl Iterator<Item = &Delegation> {
    let from_votes = record.votes.values().filter_map(|vote| match vote {
        AccountVote::Delegating(delegation) => Some(delegation),
        _ => None,
    });
    record.delegations.iter().chain(from_votes)
}
