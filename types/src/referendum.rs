//! Referendum lifecycle states as reported by the chain.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::amount::Balance;
use crate::block::BlockNumber;
use crate::track::TrackId;

/// Index of a referendum on its chain.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ReferendumId(u32);

impl ReferendumId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl From<u32> for ReferendumId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ReferendumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "referendum {}", self.0)
    }
}

/// Running vote totals of an ongoing referendum.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub ayes: Balance,
    pub nays: Balance,
    pub support: Balance,
}

/// Decision phase of an ongoing referendum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deciding {
    /// Block at which the referendum entered its decision period.
    pub since: BlockNumber,
    /// Block at which confirmation started, if it is confirming.
    #[serde(default)]
    pub confirming: Option<BlockNumber>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OngoingReferendum {
    pub submitted: BlockNumber,
    #[serde(default)]
    pub deciding: Option<Deciding>,
    #[serde(default)]
    pub tally: Tally,
}

/// Lifecycle state. Terminal variants carry the block at which they ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReferendumStatus {
    Ongoing(OngoingReferendum),
    Approved { since: BlockNumber },
    Rejected { since: BlockNumber },
    Cancelled { since: BlockNumber },
    Killed { since: BlockNumber },
    TimedOut { since: BlockNumber },
}

impl ReferendumStatus {
    pub fn is_ongoing(&self) -> bool {
        matches!(self, Self::Ongoing(_))
    }

    /// Block at which the referendum reached a terminal state.
    pub fn terminal_block(&self) -> Option<BlockNumber> {
        match self {
            Self::Ongoing(_) => None,
            Self::Approved { since }
            | Self::Rejected { since }
            | Self::Cancelled { since }
            | Self::Killed { since }
            | Self::TimedOut { since } => Some(*since),
        }
    }

    /// Whether votes on a referendum in this state keep their conviction
    /// lock. Every state does except `Killed`, which releases votes at its
    /// terminal block.
    pub fn keeps_conviction_lock(&self) -> bool {
        !matches!(self, Self::Killed { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referendum {
    pub id: ReferendumId,
    pub track: TrackId,
    pub status: ReferendumStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_block_only_for_finished_referenda() {
        let ongoing = ReferendumStatus::Ongoing(OngoingReferendum {
            submitted: BlockNumber::new(10),
            deciding: None,
            tally: Tally::default(),
        });
        assert_eq!(ongoing.terminal_block(), None);
        assert!(ongoing.is_ongoing());

        let killed = ReferendumStatus::Killed { since: BlockNumber::new(42) };
        assert_eq!(killed.terminal_block(), Some(BlockNumber::new(42)));
        assert!(!killed.keeps_conviction_lock());
        assert!(ReferendumStatus::Approved { since: BlockNumber::new(1) }.keeps_conviction_lock());
        assert!(ReferendumStatus::Cancelled { since: BlockNumber::new(1) }.keeps_conviction_lock());
        assert!(ReferendumStatus::TimedOut { since: BlockNumber::new(1) }.keeps_conviction_lock());
    }

    #[test]
    fn status_json_is_tagged() {
        let status: ReferendumStatus =
            serde_json::from_str(r#"{"state":"approved","since":1000}"#).unwrap();
        assert_eq!(status, ReferendumStatus::Approved { since: BlockNumber::new(1000) });
    }
}
