//! Governance accounting core.
//!
//! Pure, synchronous transformations over read-only chain records:
//! - conviction-weighted voting power
//! - decoupling votes (including delegated ones) into directional records
//! - delegation and per-track lock aggregation across a wallet
//! - the claim schedule: which locked balance can be unlocked now, and when
//!   the rest becomes unlockable
//!
//! Locks on different tracks of the same account overlap: they freeze the
//! same balance, so totals take the per-account maximum, never the sum.

pub mod claims;
pub mod conviction;
pub mod decouple;
pub mod delegation;
pub mod error;
pub mod locks;

pub use claims::{
    estimate_claim_schedule, estimated_end, next_unlock, sum_claimable, votes_by_track,
    ClaimChunk, ClaimScheduleInput, ClaimStatus,
};
pub use conviction::{decode_conviction, lock_duration, voting_power, voting_power_saturating};
pub use decouple::{
    decouple, decouple_from_history, tally, Decision, DecisionTotals, DecoupledVote,
    DelegatorVote, HistoricalVote,
};
pub use delegation::{aggregate_delegations, DelegatedBalance, DelegationSummary};
pub use error::GovernanceError;
pub use locks::{aggregate_track_locks, TrackLocks, TrackLockSummary};
