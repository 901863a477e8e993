//! Vote decoupling: flatten raw voting records into directional records.
//!
//! A raw record can hold a standard vote, a split vote, a split-abstain vote
//! or a delegation. Display and totals want a flat list of "who contributed
//! how much power in which direction", which is what [`DecoupledVote`] is.
//! Records are ephemeral and recomputed on every input change.

use referenda_types::{
    AccountVote, Address, Balance, Conviction, Delegation, ReferendumId, TrackId, VoteWeight,
    VotingRecord,
};
use serde::{Deserialize, Serialize};

use crate::conviction::apply_weight;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Aye,
    Nay,
    Abstain,
}

/// One directional contribution to a referendum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoupledVote {
    pub voter: Address,
    pub decision: Decision,
    pub balance: Balance,
    pub conviction_multiplier: VoteWeight,
    /// `balance × conviction_multiplier`.
    pub voting_power: Balance,
}

/// A delegator's share of a delegate's historical vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatorVote {
    pub address: Address,
    pub balance: Balance,
    pub conviction: Conviction,
}

/// A vote as reported by a referendum's voting history, with the delegators
/// whose balance was counted alongside it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalVote {
    pub voter: Address,
    pub vote: AccountVote,
    #[serde(default)]
    pub delegators: Vec<DelegatorVote>,
}

/// Voting power per decision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionTotals {
    pub aye: Balance,
    pub nay: Balance,
    pub abstain: Balance,
}

/// Decouple the vote `record` holds on `referendum`, a referendum of `track`.
///
/// An address delegating on `track` yields a single `Abstain` record carrying
/// its full delegated power: the delegate's direction is resolved from the
/// delegate's own record, not here.
pub fn decouple(record: &VotingRecord, referendum: ReferendumId, track: TrackId) -> Vec<DecoupledVote> {
    if let Some(delegation) = record.delegation_for(track) {
        return delegated(&record.address, delegation).into_iter().collect();
    }
    record
        .votes
        .get(&referendum)
        .map(|vote| decouple_vote(&record.address, vote, Some(track)))
        .unwrap_or_default()
}

/// Decouple a voting-history entry, fanning delegators of a standard vote
/// out into records of their own that share the delegate's decision.
pub fn decouple_from_history(history: &HistoricalVote) -> Vec<DecoupledVote> {
    let mut votes = decouple_vote(&history.voter, &history.vote, None);

    match &history.vote {
        AccountVote::Standard { aye, .. } => {
            let decision = if *aye { Decision::Aye } else { Decision::Nay };
            votes.extend(history.delegators.iter().filter_map(|delegator| {
                contribution(
                    &delegator.address,
                    decision,
                    delegator.balance,
                    delegator.conviction.weight(),
                )
            }));
        }
        _ if !history.delegators.is_empty() => {
            tracing::debug!(
                voter = %history.voter,
                delegators = history.delegators.len(),
                "delegators only count towards standard votes, ignoring"
            );
        }
        _ => {}
    }

    votes
}

/// Sum voting power per decision.
pub fn tally(votes: &[DecoupledVote]) -> DecisionTotals {
    let mut totals = DecisionTotals::default();
    for vote in votes {
        let slot = match vote.decision {
            Decision::Aye => &mut totals.aye,
            Decision::Nay => &mut totals.nay,
            Decision::Abstain => &mut totals.abstain,
        };
        *slot = slot.checked_add(vote.voting_power).unwrap_or_else(|| {
            tracing::warn!(voter = %vote.voter, "decision total overflowed, saturating");
            Balance::MAX
        });
    }
    totals
}

/// `track` is the referendum's track when known; a delegating entry only
/// contributes on tracks it covers.
fn decouple_vote(voter: &Address, vote: &AccountVote, track: Option<TrackId>) -> Vec<DecoupledVote> {
    let split = VoteWeight::NO_CONVICTION;
    match vote {
        AccountVote::Standard {
            aye,
            conviction,
            balance,
        } => {
            let decision = if *aye { Decision::Aye } else { Decision::Nay };
            contribution(voter, decision, *balance, conviction.weight())
                .into_iter()
                .collect()
        }
        // Zero legs are kept for plain split votes.
        AccountVote::Split { aye, nay } => [(Decision::Aye, *aye), (Decision::Nay, *nay)]
            .into_iter()
            .filter_map(|(decision, balance)| contribution(voter, decision, balance, split))
            .collect(),
        AccountVote::SplitAbstain { aye, nay, abstain } => [
            (Decision::Aye, *aye),
            (Decision::Nay, *nay),
            (Decision::Abstain, *abstain),
        ]
        .into_iter()
        .filter(|(_, balance)| !balance.is_zero())
        .filter_map(|(decision, balance)| contribution(voter, decision, balance, split))
        .collect(),
        AccountVote::Delegating(delegation) if track.map_or(true, |track| delegation.covers(track)) => {
            delegated(voter, delegation).into_iter().collect()
        }
        AccountVote::Delegating(_) => Vec::new(),
    }
}

fn delegated(voter: &Address, delegation: &Delegation) -> Option<DecoupledVote> {
    if delegation.tracks.is_empty() {
        return None;
    }
    contribution(
        voter,
        Decision::Abstain,
        delegation.balance,
        delegation.conviction.weight(),
    )
}

/// Build one record, dropping it if its voting power overflows.
fn contribution(
    voter: &Address,
    decision: Decision,
    balance: Balance,
    weight: VoteWeight,
) -> Option<DecoupledVote> {
    match apply_weight(balance, weight) {
        Ok(voting_power) => Some(DecoupledVote {
            voter: voter.clone(),
            decision,
            balance,
            conviction_multiplier: weight,
            voting_power,
        }),
        Err(e) => {
            tracing::warn!(voter = %voter, %balance, error = %e, "dropping vote record");
            None
        }
    }
}
