//! Governance track identifiers and static per-track parameters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an independent governance lane (root, treasurer, ...).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TrackId(u16);

impl TrackId {
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    pub const fn get(&self) -> u16 {
        self.0
    }
}

impl From<u16> for TrackId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "track {}", self.0)
    }
}

/// Static governance parameters of a single track. All periods are in blocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    pub id: TrackId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub prepare_period: u64,
    pub decision_period: u64,
    #[serde(default)]
    pub confirm_period: u64,
    #[serde(default)]
    pub min_enactment_period: u64,
}
