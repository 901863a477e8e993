//! Block → wall-clock estimation.

use std::time::Duration;

use referenda_governance::{ClaimChunk, ClaimStatus};
use referenda_types::BlockNumber;
use referenda_utils::format_eta;

/// Converts a block distance into an expected duration.
pub trait BlockTimeOracle: Send + Sync {
    fn time_until(&self, current: BlockNumber, target: BlockNumber) -> Duration;
}

/// Assumes every block takes the same time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AverageBlockTime {
    block_time: Duration,
}

impl AverageBlockTime {
    pub const DEFAULT: Duration = Duration::from_secs(6);

    pub fn new(block_time: Duration) -> Self {
        Self { block_time }
    }

    pub fn block_time(&self) -> Duration {
        self.block_time
    }
}

impl Default for AverageBlockTime {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl BlockTimeOracle for AverageBlockTime {
    fn time_until(&self, current: BlockNumber, target: BlockNumber) -> Duration {
        let blocks = current.blocks_until(target);
        let blocks = u32::try_from(blocks).unwrap_or(u32::MAX);
        self.block_time.saturating_mul(blocks)
    }
}

/// One-line description of when a chunk becomes claimable.
pub fn describe_unlock(
    chunk: &ClaimChunk,
    current: BlockNumber,
    oracle: &dyn BlockTimeOracle,
) -> String {
    match chunk.status {
        ClaimStatus::Claimable => "claimable now".to_string(),
        ClaimStatus::PendingDelegation => "after undelegating".to_string(),
        ClaimStatus::PendingLock { unlock_at: None } => "unlock time unknown".to_string(),
        ClaimStatus::PendingLock {
            unlock_at: Some(at),
        } => format!("{} (block {at})", format_eta(oracle.time_until(current, at))),
    }
}
