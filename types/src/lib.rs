//! Fundamental types for referenda governance accounting.
//!
//! This crate defines the ledger-like records shared across the workspace:
//! addresses, balances, block numbers, convictions, account votes, referenda,
//! track metadata and chain constants. Everything here is read-only input
//! mirrored from chain state; nothing in the workspace mutates it.

pub mod address;
pub mod amount;
pub mod block;
pub mod conviction;
pub mod error;
pub mod params;
pub mod referendum;
pub mod track;
pub mod vote;

pub use address::Address;
pub use amount::Balance;
pub use block::BlockNumber;
pub use conviction::{Conviction, VoteWeight};
pub use error::TypesError;
pub use params::ChainConstants;
pub use referendum::{Deciding, OngoingReferendum, Referendum, ReferendumId, ReferendumStatus, Tally};
pub use track::{TrackId, TrackInfo};
pub use vote::{AccountVote, Delegation, PriorLock, VotingAmount, VotingRecord};
