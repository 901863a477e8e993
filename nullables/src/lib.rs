//! Nullable infrastructure for deterministic testing.
//!
//! Everything the aggregation graph normally gets from a live chain (the
//! block height, block timing, input arrival) has a controllable stand-in
//! here:
//! - values are deterministic
//! - time and arrival order only change when the test says so
//! - nothing touches the network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod feed;
pub mod oracle;

pub use clock::NullBlockClock;
pub use feed::{ChainInput, InputKind, NullChainFeed};
pub use oracle::NullBlockTimeOracle;
