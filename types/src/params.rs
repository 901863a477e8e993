//! Chain-level governance constants, read once per chain connection.

use serde::{Deserialize, Serialize};

/// Conviction-voting and referenda constants of one chain. Both values are
/// in blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConstants {
    /// Length of one conviction lock period.
    pub vote_locking_period: u64,
    /// How long a referendum may wait for a decision slot before timing out.
    pub undeciding_timeout: u64,
}

impl ChainConstants {
    /// 7 days at 6-second blocks.
    pub const POLKADOT_VOTE_LOCKING_PERIOD: u64 = 7 * 24 * 600;
    /// 28 days at 6-second blocks.
    pub const POLKADOT_UNDECIDING_TIMEOUT: u64 = 28 * 24 * 600;

    pub fn polkadot() -> Self {
        Self {
            vote_locking_period: Self::POLKADOT_VOTE_LOCKING_PERIOD,
            undeciding_timeout: Self::POLKADOT_UNDECIDING_TIMEOUT,
        }
    }
}

impl Default for ChainConstants {
    fn default() -> Self {
        Self::polkadot()
    }
}
