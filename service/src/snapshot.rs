//! JSON chain snapshots: every graph input captured in one file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use referenda_governance::TrackLocks;
use referenda_types::{BlockNumber, ChainConstants, Referendum, TrackInfo, VotingRecord};

use crate::graph::ChainFeed;
use crate::ServiceError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain: String,
    /// Falls back to the configured constants when absent.
    #[serde(default)]
    pub constants: Option<ChainConstants>,
    pub current_block: BlockNumber,
    #[serde(default)]
    pub referenda: Vec<Referendum>,
    #[serde(default)]
    pub tracks: Vec<TrackInfo>,
    #[serde(default)]
    pub locks: TrackLocks,
    #[serde(default)]
    pub records: Vec<VotingRecord>,
}

impl ChainSnapshot {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ServiceError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_string(&self) -> Result<String, ServiceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Publish every input of the snapshot into `feed`.
    pub fn publish(self, feed: &ChainFeed, fallback: ChainConstants) -> Result<(), ServiceError> {
        if self.chain != feed.chain() {
            tracing::warn!(snapshot = %self.chain, graph = %feed.chain(), "publishing snapshot of another chain");
        }
        feed.set_constants(self.constants.unwrap_or(fallback))?;
        feed.set_current_block(self.current_block)?;
        feed.set_referenda(self.referenda.into_iter().map(|r| (r.id, r)).collect())?;
        feed.set_tracks(self.tracks.into_iter().map(|t| (t.id, t)).collect())?;
        feed.set_locks(self.locks)?;
        feed.set_records(self.records)?;
        Ok(())
    }
}
