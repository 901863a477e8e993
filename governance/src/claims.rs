//! Claim schedule estimation: when does locked governance balance free up.
//!
//! Every non-zero track lock of an address becomes exactly one
//! [`ClaimChunk`]. The chunk is:
//! - `Claimable` once every vote justifying the lock has ended and served
//!   its conviction lock, or when nothing justifies the lock any more;
//! - `PendingDelegation` while the track is delegated, since the delegate's
//!   votes govern when it unlocks;
//! - `PendingLock` otherwise, with the estimated unlock block when it can be
//!   resolved.
//!
//! For an ongoing referendum the end is estimated as the end of its
//! decision period, or, if it has not started deciding yet, the worst case
//! of timing out of the queue and then deciding for a full period.

use referenda_types::{
    AccountVote, Address, Balance, BlockNumber, ChainConstants, OngoingReferendum, Referendum,
    ReferendumId, ReferendumStatus, TrackId, TrackInfo, VotingRecord,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::conviction::lock_duration;
use crate::error::GovernanceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClaimStatus {
    Claimable,
    PendingDelegation,
    PendingLock { unlock_at: Option<BlockNumber> },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimChunk {
    pub address: Address,
    pub track: TrackId,
    pub amount: Balance,
    pub status: ClaimStatus,
}

impl ClaimChunk {
    pub fn is_claimable(&self) -> bool {
        self.status == ClaimStatus::Claimable
    }

    /// Estimated unlock block of a pending lock.
    pub fn unlock_at(&self) -> Option<BlockNumber> {
        match self.status {
            ClaimStatus::PendingLock { unlock_at } => unlock_at,
            ClaimStatus::Claimable | ClaimStatus::PendingDelegation => None,
        }
    }

    fn sort_key(&self) -> (u8, BlockNumber, TrackId) {
        match self.status {
            ClaimStatus::Claimable => (0, BlockNumber::GENESIS, self.track),
            ClaimStatus::PendingLock {
                unlock_at: Some(at),
            } => (1, at, self.track),
            ClaimStatus::PendingLock { unlock_at: None } => (2, BlockNumber::GENESIS, self.track),
            ClaimStatus::PendingDelegation => (3, BlockNumber::GENESIS, self.track),
        }
    }
}

/// Everything the estimator needs for one address.
#[derive(Clone, Copy, Debug)]
pub struct ClaimScheduleInput<'a> {
    pub address: &'a Address,
    pub current_block: BlockNumber,
    pub referenda: &'a BTreeMap<ReferendumId, Referendum>,
    pub tracks: &'a BTreeMap<TrackId, TrackInfo>,
    /// The address's per-track locks.
    pub locks: &'a BTreeMap<TrackId, Balance>,
    /// The address's voting record; `None` when it never voted.
    pub record: Option<&'a VotingRecord>,
    pub constants: ChainConstants,
}

/// Estimate the claim schedule of one address.
///
/// Chunks come back ordered: claimable first, then pending locks by unlock
/// block (unresolvable ones last), then pending delegations.
pub fn estimate_claim_schedule(input: &ClaimScheduleInput<'_>) -> Vec<ClaimChunk> {
    let votes = input
        .record
        .map(|record| votes_by_track(record, input.referenda))
        .unwrap_or_default();

    let mut chunks: Vec<ClaimChunk> = input
        .locks
        .iter()
        .filter(|(_, amount)| !amount.is_zero())
        .map(|(&track, &amount)| {
            let on_track = votes.get(&track).map(Vec::as_slice).unwrap_or(&[]);
            ClaimChunk {
                address: input.address.clone(),
                track,
                amount,
                status: classify(input, track, on_track),
            }
        })
        .collect();

    chunks.sort_by_key(ClaimChunk::sort_key);
    chunks
}

/// Amount that can be unlocked right now.
pub fn sum_claimable(chunks: &[ClaimChunk]) -> Balance {
    chunks
        .iter()
        .filter(|chunk| chunk.is_claimable())
        .map(|chunk| chunk.amount)
        .sum()
}

/// Earliest resolved unlock block among pending locks.
pub fn next_unlock(chunks: &[ClaimChunk]) -> Option<BlockNumber> {
    chunks.iter().filter_map(ClaimChunk::unlock_at).min()
}

/// Group a record's direct votes by the track of the referendum they are on.
///
/// Votes on referenda missing from `referenda` cannot be attributed to a
/// track and are skipped.
pub fn votes_by_track<'a>(
    record: &'a VotingRecord,
    referenda: &'a BTreeMap<ReferendumId, Referendum>,
) -> BTreeMap<TrackId, Vec<(&'a Referendum, &'a AccountVote)>> {
    let mut grouped: BTreeMap<TrackId, Vec<(&Referendum, &AccountVote)>> = BTreeMap::new();
    for (id, vote) in &record.votes {
        match referenda.get(id) {
            Some(referendum) => grouped
                .entry(referendum.track)
                .or_default()
                .push((referendum, vote)),
            None => tracing::debug!(
                address = %record.address,
                referendum = id.get(),
                "vote on unknown referendum, skipping"
            ),
        }
    }
    grouped
}

fn classify(
    input: &ClaimScheduleInput<'_>,
    track: TrackId,
    votes: &[(&Referendum, &AccountVote)],
) -> ClaimStatus {
    let delegated = input
        .record
        .and_then(|record| record.delegation_for(track))
        .is_some()
        || votes
            .iter()
            .any(|(_, vote)| matches!(vote, AccountVote::Delegating(d) if d.covers(track)));
    if delegated {
        return ClaimStatus::PendingDelegation;
    }

    let Some(info) = input.tracks.get(&track) else {
        tracing::warn!(
            address = %input.address,
            error = %GovernanceError::MissingTrackInfo(track),
            "reporting lock as pending"
        );
        return ClaimStatus::PendingLock { unlock_at: None };
    };

    let mut latest: Option<BlockNumber> = None;
    let mut ongoing = false;

    for (referendum, vote) in votes.iter().filter(|(_, vote)| vote.is_casting()) {
        ongoing |= referendum.status.is_ongoing();
        let unlock = vote_unlock_block(&referendum.status, vote, info, &input.constants);
        latest = latest.max(Some(unlock));
    }

    if let Some(prior) = input
        .record
        .and_then(|record| record.priors.get(&track))
        .filter(|prior| !prior.amount.is_zero())
    {
        latest = latest.max(Some(prior.unlock_at));
    }

    match latest {
        // Nothing justifies the lock any more.
        None => ClaimStatus::Claimable,
        Some(at) if !ongoing && input.current_block.has_reached(at) => ClaimStatus::Claimable,
        Some(at) => ClaimStatus::PendingLock { unlock_at: Some(at) },
    }
}

/// Block at which the lock a single vote holds on its track is released.
fn vote_unlock_block(
    status: &ReferendumStatus,
    vote: &AccountVote,
    info: &TrackInfo,
    constants: &ChainConstants,
) -> BlockNumber {
    let lock = if status.keeps_conviction_lock() {
        lock_duration(vote.conviction(), constants.vote_locking_period)
    } else {
        0
    };
    match status {
        ReferendumStatus::Ongoing(ongoing) => {
            estimated_end(ongoing, info, constants).saturating_add(lock)
        }
        ReferendumStatus::Approved { since }
        | ReferendumStatus::Rejected { since }
        | ReferendumStatus::Cancelled { since }
        | ReferendumStatus::Killed { since }
        | ReferendumStatus::TimedOut { since } => since.saturating_add(lock),
    }
}

/// Worst-case end of an ongoing referendum.
pub fn estimated_end(
    referendum: &OngoingReferendum,
    info: &TrackInfo,
    constants: &ChainConstants,
) -> BlockNumber {
    match &referendum.deciding {
        Some(deciding) => deciding.since.saturating_add(info.decision_period),
        None => referendum
            .submitted
            .saturating_add(constants.undeciding_timeout)
            .saturating_add(info.decision_period),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use referenda_types::{Conviction, Deciding, Delegation, PriorLock, Tally};

    const VOTE_LOCKING_PERIOD: u64 = 500;
    const UNDECIDING_TIMEOUT: u64 = 1_000;
    const DECISION_PERIOD: u64 = 2_000;

    struct Fixture {
        address: Address,
        referenda: BTreeMap<ReferendumId, Referendum>,
        tracks: BTreeMap<TrackId, TrackInfo>,
        locks: BTreeMap<TrackId, Balance>,
        record: VotingRecord,
    }

    impl Fixture {
        fn new() -> Self {
            let address = Address::new("alice");
            let tracks = [0u16, 1, 2, 3]
                .into_iter()
                .map(|id| {
                    (
                        TrackId::new(id),
                        TrackInfo {
                            id: TrackId::new(id),
                            name: format!("track-{id}"),
                            prepare_period: 10,
                            decision_period: DECISION_PERIOD,
                            confirm_period: 10,
                            min_enactment_period: 10,
                        },
                    )
                })
                .collect();
            Self {
                record: VotingRecord::new(address.clone()),
                address,
                referenda: BTreeMap::new(),
                tracks,
                locks: BTreeMap::new(),
            }
        }

        fn referendum(mut self, id: u32, track: u16, status: ReferendumStatus) -> Self {
            self.referenda.insert(
                ReferendumId::new(id),
                Referendum {
                    id: ReferendumId::new(id),
                    track: TrackId::new(track),
                    status,
                },
            );
            self
        }

        fn vote(mut self, id: u32, conviction: Conviction, balance: u128) -> Self {
            self.record.votes.insert(
                ReferendumId::new(id),
                AccountVote::Standard {
                    aye: true,
                    conviction,
                    balance: Balance::new(balance),
                },
            );
            self
        }

        fn lock(mut self, track: u16, amount: u128) -> Self {
            self.locks.insert(TrackId::new(track), Balance::new(amount));
            self
        }

        fn estimate(&self, current_block: u64) -> Vec<ClaimChunk> {
            estimate_claim_schedule(&ClaimScheduleInput {
                address: &self.address,
                current_block: BlockNumber::new(current_block),
                referenda: &self.referenda,
                tracks: &self.tracks,
                locks: &self.locks,
                record: Some(&self.record),
                constants: ChainConstants {
                    vote_locking_period: VOTE_LOCKING_PERIOD,
                    undeciding_timeout: UNDECIDING_TIMEOUT,
                },
            })
        }
    }

    fn approved(since: u64) -> ReferendumStatus {
        ReferendumStatus::Approved {
            since: BlockNumber::new(since),
        }
    }

    fn ongoing(submitted: u64, deciding_since: Option<u64>) -> ReferendumStatus {
        ReferendumStatus::Ongoing(OngoingReferendum {
            submitted: BlockNumber::new(submitted),
            deciding: deciding_since.map(|since| Deciding {
                since: BlockNumber::new(since),
                confirming: None,
            }),
            tally: Tally::default(),
        })
    }

    #[test]
    fn approved_referendum_unlocks_after_conviction_period() {
        let fixture = Fixture::new()
            .referendum(1, 0, approved(1_000))
            .vote(1, Conviction::Locked1x, 300)
            .lock(0, 300);

        let at_unlock = fixture.estimate(1_500);
        assert_eq!(at_unlock.len(), 1);
        assert_eq!(at_unlock[0].status, ClaimStatus::Claimable);

        let before = fixture.estimate(1_499);
        assert_eq!(
            before[0].status,
            ClaimStatus::PendingLock {
                unlock_at: Some(BlockNumber::new(1_500))
            }
        );
    }

    #[test]
    fn conviction_doubles_lock_periods() {
        let fixture = Fixture::new()
            .referendum(1, 0, approved(1_000))
            .vote(1, Conviction::Locked3x, 300)
            .lock(0, 300);
        // 4 periods × 500 blocks.
        assert_eq!(fixture.estimate(2_000)[0].unlock_at(), Some(BlockNumber::new(3_000)));
    }

    #[test]
    fn ongoing_deciding_referendum_uses_decision_period() {
        let fixture = Fixture::new()
            .referendum(1, 0, ongoing(100, Some(200)))
            .vote(1, Conviction::Locked1x, 300)
            .lock(0, 300);
        assert_eq!(
            fixture.estimate(300)[0].status,
            ClaimStatus::PendingLock {
                unlock_at: Some(BlockNumber::new(200 + DECISION_PERIOD + VOTE_LOCKING_PERIOD))
            }
        );
    }

    #[test]
    fn ongoing_queued_referendum_uses_worst_case() {
        let fixture = Fixture::new()
            .referendum(1, 0, ongoing(100, None))
            .vote(1, Conviction::None, 300)
            .lock(0, 300);
        // Still pending even once the estimate has passed.
        let far_future = 1_000_000;
        assert_eq!(
            fixture.estimate(far_future)[0].status,
            ClaimStatus::PendingLock {
                unlock_at: Some(BlockNumber::new(100 + UNDECIDING_TIMEOUT + DECISION_PERIOD))
            }
        );
    }

    #[test]
    fn cancelled_and_timed_out_keep_conviction_lock() {
        let fixture = Fixture::new()
            .referendum(1, 0, ReferendumStatus::Cancelled { since: BlockNumber::new(1_000) })
            .referendum(2, 1, ReferendumStatus::TimedOut { since: BlockNumber::new(1_000) })
            .vote(1, Conviction::Locked1x, 300)
            .vote(2, Conviction::Locked1x, 200)
            .lock(0, 300)
            .lock(1, 200);

        let pending = ClaimStatus::PendingLock {
            unlock_at: Some(BlockNumber::new(1_000 + VOTE_LOCKING_PERIOD)),
        };
        let statuses: Vec<_> = fixture.estimate(1_499).iter().map(|c| (c.track.get(), c.status)).collect();
        assert_eq!(statuses, vec![(0, pending), (1, pending)]);
        assert!(fixture.estimate(1_500).iter().all(ClaimChunk::is_claimable));
    }

    #[test]
    fn killed_referendum_releases_at_terminal_block() {
        let fixture = Fixture::new()
            .referendum(1, 0, ReferendumStatus::Killed { since: BlockNumber::new(900) })
            .vote(1, Conviction::Locked6x, 300)
            .lock(0, 300);
        assert_eq!(
            fixture.estimate(899)[0].status,
            ClaimStatus::PendingLock {
                unlock_at: Some(BlockNumber::new(900))
            }
        );
        assert!(fixture.estimate(900)[0].is_claimable());
    }

    #[test]
    fn stale_lock_is_claimable() {
        let fixture = Fixture::new().lock(1, 50);
        let chunks = fixture.estimate(10);
        assert_eq!(chunks[0].status, ClaimStatus::Claimable);
        assert_eq!(sum_claimable(&chunks), Balance::new(50));
    }

    #[test]
    fn delegated_track_is_pending_delegation() {
        let mut fixture = Fixture::new().lock(0, 80).lock(1, 80);
        fixture.record.delegations.push(Delegation {
            target: Address::new("dave"),
            conviction: Conviction::Locked2x,
            balance: Balance::new(80),
            tracks: [TrackId::new(0)].into_iter().collect(),
        });
        let chunks = fixture.estimate(10);
        assert_eq!(chunks[0].track, TrackId::new(1));
        assert!(chunks[0].is_claimable());
        assert_eq!(chunks[1].status, ClaimStatus::PendingDelegation);
        assert_eq!(chunks[1].unlock_at(), None);
    }

    #[test]
    fn missing_track_info_is_unresolvable() {
        let fixture = Fixture::new().lock(9, 10);
        assert_eq!(
            fixture.estimate(10)[0].status,
            ClaimStatus::PendingLock { unlock_at: None }
        );
    }

    #[test]
    fn prior_lock_extends_unlock() {
        let mut fixture = Fixture::new()
            .referendum(1, 0, approved(1_000))
            .vote(1, Conviction::Locked1x, 300)
            .lock(0, 300);
        fixture.record.priors.insert(
            TrackId::new(0),
            PriorLock {
                unlock_at: BlockNumber::new(5_000),
                amount: Balance::new(300),
            },
        );
        assert_eq!(fixture.estimate(2_000)[0].unlock_at(), Some(BlockNumber::new(5_000)));
    }

    #[test]
    fn zero_locks_are_filtered() {
        let fixture = Fixture::new().lock(0, 0).lock(1, 10);
        let chunks = fixture.estimate(10);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].track, TrackId::new(1));
    }

    #[test]
    fn chunks_are_ordered_by_unlock() {
        let mut fixture = Fixture::new()
            .referendum(1, 0, approved(10_000))
            .referendum(2, 1, approved(2_000))
            .vote(1, Conviction::Locked1x, 10)
            .vote(2, Conviction::Locked1x, 20)
            .lock(0, 10)
            .lock(1, 20)
            .lock(2, 30)
            .lock(9, 40);
        fixture.record.delegations.push(Delegation {
            target: Address::new("dave"),
            conviction: Conviction::None,
            balance: Balance::new(1),
            tracks: [TrackId::new(2)].into_iter().collect(),
        });
        fixture = fixture.lock(3, 5);

        let chunks = fixture.estimate(100);
        let tracks: Vec<u16> = chunks.iter().map(|c| c.track.get()).collect();
        assert_eq!(tracks, vec![3, 1, 0, 9, 2]);
        assert_eq!(sum_claimable(&chunks), Balance::new(5));
        assert_eq!(next_unlock(&chunks), Some(BlockNumber::new(2_500)));
    }

    #[test]
    fn votes_on_unknown_referenda_are_skipped() {
        let fixture = Fixture::new().vote(42, Conviction::Locked6x, 10).lock(0, 10);
        assert!(fixture.estimate(1)[0].is_claimable());
    }

    #[test]
    fn no_record_means_every_lock_is_stale() {
        let fixture = Fixture::new().lock(0, 10);
        let chunks = estimate_claim_schedule(&ClaimScheduleInput {
            address: &fixture.address,
            current_block: BlockNumber::new(1),
            referenda: &fixture.referenda,
            tracks: &fixture.tracks,
            locks: &fixture.locks,
            record: None,
            constants: ChainConstants::default(),
        });
        assert!(chunks[0].is_claimable());
    }
}
