//! Graph inputs and the join barrier in front of the aggregation.

use std::collections::BTreeMap;
use std::sync::Arc;

use referenda_governance::{decouple, tally, DecisionTotals, DecoupledVote, TrackLocks};
use referenda_types::{
    Address, BlockNumber, ChainConstants, Referendum, ReferendumId, TrackId, TrackInfo,
    VotingRecord,
};

pub type Referenda = BTreeMap<ReferendumId, Referendum>;
pub type Tracks = BTreeMap<TrackId, TrackInfo>;
pub type Records = BTreeMap<Address, VotingRecord>;

/// The latest value of every input, each possibly still unresolved.
#[derive(Clone, Debug, Default)]
pub struct ChainInputs {
    pub constants: Option<ChainConstants>,
    pub current_block: Option<BlockNumber>,
    pub referenda: Option<Arc<Referenda>>,
    pub tracks: Option<Arc<Tracks>>,
    pub locks: Option<Arc<TrackLocks>>,
    pub records: Option<Arc<Records>>,
}

impl ChainInputs {
    /// A complete snapshot once every input has resolved at least once.
    pub fn ready(&self) -> Option<InputSnapshot> {
        Some(InputSnapshot {
            constants: self.constants?,
            current_block: self.current_block?,
            referenda: self.referenda.clone()?,
            tracks: self.tracks.clone()?,
            locks: self.locks.clone()?,
            records: self.records.clone()?,
        })
    }

    /// Names of the inputs still holding the barrier closed.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("constants", self.constants.is_none()),
            ("current_block", self.current_block.is_none()),
            ("referenda", self.referenda.is_none()),
            ("tracks", self.tracks.is_none()),
            ("locks", self.locks.is_none()),
            ("records", self.records.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect()
    }
}

/// A consistent view of every input, shared cheaply between consumers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputSnapshot {
    pub constants: ChainConstants,
    pub current_block: BlockNumber,
    pub referenda: Arc<Referenda>,
    pub tracks: Arc<Tracks>,
    pub locks: Arc<TrackLocks>,
    pub records: Arc<Records>,
}

impl InputSnapshot {
    /// Every known account's decoupled contribution to `referendum`, or
    /// `None` if the referendum is unknown.
    pub fn referendum_votes(&self, referendum: ReferendumId) -> Option<Vec<DecoupledVote>> {
        let track = self.referenda.get(&referendum)?.track;
        Some(
            self.records
                .values()
                .flat_map(|record| decouple(record, referendum, track))
                .collect(),
        )
    }

    pub fn referendum_totals(&self, referendum: ReferendumId) -> Option<DecisionTotals> {
        self.referendum_votes(referendum).map(|votes| tally(&votes))
    }
}

/// Key records by address; a later record for the same address wins.
pub fn index_records(records: impl IntoIterator<Item = VotingRecord>) -> Records {
    let mut indexed = Records::new();
    for record in records {
        if let Some(previous) = indexed.insert(record.address.clone(), record) {
            tracing::debug!(address = %previous.address, "duplicate voting record, keeping the later one");
        }
    }
    indexed
}
