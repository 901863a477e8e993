//! Account votes and per-address voting records.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::address::Address;
use crate::amount::Balance;
use crate::block::BlockNumber;
use crate::conviction::Conviction;
use crate::referendum::ReferendumId;
use crate::track::TrackId;

/// An account delegating its voting balance to `target` on a set of tracks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub target: Address,
    pub conviction: Conviction,
    pub balance: Balance,
    pub tracks: BTreeSet<TrackId>,
}

impl Delegation {
    pub fn covers(&self, track: TrackId) -> bool {
        self.tracks.contains(&track)
    }
}

/// The vote an account holds on one referendum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountVote {
    Standard {
        aye: bool,
        conviction: Conviction,
        balance: Balance,
    },
    /// Balance split between aye and nay, without conviction.
    Split { aye: Balance, nay: Balance },
    SplitAbstain {
        aye: Balance,
        nay: Balance,
        abstain: Balance,
    },
    Delegating(Delegation),
}

/// Balance committed to each direction by a vote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingAmount {
    pub aye: Balance,
    pub nay: Balance,
    pub abstain: Balance,
}

impl AccountVote {
    pub fn is_standard(&self) -> bool {
        matches!(self, Self::Standard { .. })
    }

    pub fn is_split(&self) -> bool {
        matches!(self, Self::Split { .. })
    }

    pub fn is_split_abstain(&self) -> bool {
        matches!(self, Self::SplitAbstain { .. })
    }

    pub fn is_delegating(&self) -> bool {
        matches!(self, Self::Delegating(_))
    }

    /// Whether the account votes directly rather than through a delegate.
    pub fn is_casting(&self) -> bool {
        !self.is_delegating()
    }

    /// Conviction the vote is locked with. Split votes carry none.
    pub fn conviction(&self) -> Conviction {
        match self {
            Self::Standard { conviction, .. } => *conviction,
            Self::Delegating(delegation) => delegation.conviction,
            Self::Split { .. } | Self::SplitAbstain { .. } => Conviction::None,
        }
    }

    /// Per-direction balances. A delegation reports its balance as abstain
    /// since its direction is decided by the delegate.
    pub fn amounts(&self) -> VotingAmount {
        match self {
            Self::Standard { aye: true, balance, .. } => VotingAmount {
                aye: *balance,
                ..VotingAmount::default()
            },
            Self::Standard { aye: false, balance, .. } => VotingAmount {
                nay: *balance,
                ..VotingAmount::default()
            },
            Self::Split { aye, nay } => VotingAmount {
                aye: *aye,
                nay: *nay,
                abstain: Balance::ZERO,
            },
            Self::SplitAbstain { aye, nay, abstain } => VotingAmount {
                aye: *aye,
                nay: *nay,
                abstain: *abstain,
            },
            Self::Delegating(delegation) => VotingAmount {
                abstain: delegation.balance,
                ..VotingAmount::default()
            },
        }
    }

    /// Total balance the vote locks (saturating).
    pub fn total_balance(&self) -> Balance {
        let amounts = self.amounts();
        amounts
            .aye
            .saturating_add(amounts.nay)
            .saturating_add(amounts.abstain)
    }
}

/// Lock left behind on a track after votes were removed, released at
/// `unlock_at`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorLock {
    pub unlock_at: BlockNumber,
    pub amount: Balance,
}

/// Everything the chain reports about one address's conviction voting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingRecord {
    pub address: Address,
    /// Direct votes, one per referendum.
    #[serde(default)]
    pub votes: BTreeMap<ReferendumId, AccountVote>,
    /// Active delegations. Their track sets are disjoint.
    #[serde(default)]
    pub delegations: Vec<Delegation>,
    #[serde(default)]
    pub priors: BTreeMap<TrackId, PriorLock>,
}

impl VotingRecord {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            votes: BTreeMap::new(),
            delegations: Vec::new(),
            priors: BTreeMap::new(),
        }
    }

    pub fn with_vote(mut self, referendum: ReferendumId, vote: AccountVote) -> Self {
        self.votes.insert(referendum, vote);
        self
    }

    pub fn with_delegation(mut self, delegation: Delegation) -> Self {
        self.delegations.push(delegation);
        self
    }

    pub fn with_prior(mut self, track: TrackId, prior: PriorLock) -> Self {
        self.priors.insert(track, prior);
        self
    }

    /// The delegation in force on `track`, if any.
    ///
    /// Delegations with an empty track set are inert and never match.
    pub fn delegation_for(&self, track: TrackId) -> Option<&Delegation> {
        self.delegations.iter().find(|d| d.covers(track))
    }

    pub fn is_delegating(&self) -> bool {
        self.delegations.iter().any(|d| !d.tracks.is_empty())
    }
}
