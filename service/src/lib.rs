//! Runtime layer of the referenda accounting core.
//!
//! One [`AggregationGraph`] per chain joins the chain inputs, runs the
//! pure aggregations of `referenda-governance` over them and publishes a
//! [`GovernanceSnapshot`]. [`GovernanceCache`] follows the graphs and
//! serves per-account views.

pub mod cache;
pub mod config;
pub mod error;
pub mod graph;
pub mod inputs;
pub mod logging;
pub mod oracle;
pub mod shutdown;
pub mod snapshot;

pub use cache::{AccountView, GovernanceCache};
pub use config::ServiceConfig;
pub use error::ServiceError;
pub use graph::{aggregate, AggregationGraph, ChainFeed, GovernanceSnapshot, SnapshotReceiver};
pub use inputs::{ChainInputs, InputSnapshot, Records, Referenda, Tracks};
pub use logging::{init_logging, LogFormat};
pub use oracle::{describe_unlock, AverageBlockTime, BlockTimeOracle};
pub use shutdown::ShutdownController;
pub use snapshot::ChainSnapshot;
