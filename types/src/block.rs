//! Block number type used for referendum lifecycles and unlock estimates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A block height on the governance chain.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BlockNumber(u64);

impl BlockNumber {
    pub const GENESIS: Self = Self(0);

    pub const fn new(height: u64) -> Self {
        Self(height)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }

    pub fn saturating_add(self, blocks: u64) -> Self {
        Self(self.0.saturating_add(blocks))
    }

    /// Blocks remaining from `self` until `target`; zero if `target` has passed.
    pub fn blocks_until(&self, target: BlockNumber) -> u64 {
        target.0.saturating_sub(self.0)
    }

    /// Whether `self` is at or beyond `target`.
    pub fn has_reached(&self, target: BlockNumber) -> bool {
        self.0 >= target.0
    }
}

impl From<u64> for BlockNumber {
    fn from(height: u64) -> Self {
        Self(height)
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
