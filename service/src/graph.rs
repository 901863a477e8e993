//! Per-chain aggregation graph.
//!
//! Six `watch` channels carry the inputs in from whichever task resolves
//! them, in any order and as often as they change. Once all six have a
//! value the graph recomputes a [`GovernanceSnapshot`] from scratch on
//! every change and publishes it on a `watch` output.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use referenda_governance::{
    aggregate_delegations, aggregate_track_locks, estimate_claim_schedule, next_unlock,
    sum_claimable, ClaimChunk, ClaimScheduleInput, DelegationSummary, GovernanceError, TrackLocks,
    TrackLockSummary,
};
use referenda_types::{Address, Balance, BlockNumber, ChainConstants, VotingRecord};

use crate::inputs::{index_records, ChainInputs, InputSnapshot, Referenda, Records, Tracks};
use crate::ServiceError;

/// Everything derived from one consistent set of inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GovernanceSnapshot {
    pub chain: String,
    /// Increments with every recomputation.
    pub generation: u64,
    pub track_locks: TrackLockSummary,
    pub delegations: DelegationSummary,
    /// Claim schedule of every address holding a non-zero lock.
    pub claims: BTreeMap<Address, Vec<ClaimChunk>>,
    /// Claimable right now, across all addresses.
    pub total_claimable: Balance,
    pub inputs: InputSnapshot,
}

impl GovernanceSnapshot {
    pub fn current_block(&self) -> BlockNumber {
        self.inputs.current_block
    }

    pub fn claims_for(&self, address: &Address) -> &[ClaimChunk] {
        self.claims.get(address).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn claimable_for(&self, address: &Address) -> Balance {
        sum_claimable(self.claims_for(address))
    }

    pub fn next_unlock_for(&self, address: &Address) -> Option<BlockNumber> {
        next_unlock(self.claims_for(address))
    }

    /// Every address the snapshot knows anything about.
    pub fn addresses(&self) -> BTreeSet<&Address> {
        self.inputs
            .locks
            .keys()
            .chain(self.inputs.records.keys())
            .collect()
    }
}

/// Run every aggregation over `inputs`.
pub fn aggregate(chain: &str, generation: u64, inputs: InputSnapshot) -> GovernanceSnapshot {
    let unknown: BTreeSet<_> = inputs
        .referenda
        .values()
        .map(|referendum| referendum.track)
        .filter(|track| !inputs.tracks.contains_key(track))
        .collect();
    for track in unknown {
        let error = GovernanceError::UnknownTrack(track);
        warn!(chain, %error, "referenda reference a track without track info");
    }

    let track_locks = aggregate_track_locks(TrackLocks::clone(&inputs.locks));
    let delegations = aggregate_delegations(inputs.records.values());

    let mut claims = BTreeMap::new();
    let mut total_claimable = Balance::ZERO;
    for (address, locks) in inputs.locks.iter() {
        if locks.values().all(|amount| amount.is_zero()) {
            continue;
        }
        let chunks = estimate_claim_schedule(&ClaimScheduleInput {
            address,
            current_block: inputs.current_block,
            referenda: &inputs.referenda,
            tracks: &inputs.tracks,
            locks,
            record: inputs.records.get(address),
            constants: inputs.constants,
        });
        total_claimable = total_claimable.saturating_add(sum_claimable(&chunks));
        claims.insert(address.clone(), chunks);
    }

    GovernanceSnapshot {
        chain: chain.to_string(),
        generation,
        track_locks,
        delegations,
        claims,
        total_claimable,
        inputs,
    }
}

pub type SnapshotReceiver = watch::Receiver<Option<Arc<GovernanceSnapshot>>>;

/// Write side of a graph's inputs. Dropping it stops the graph.
pub struct ChainFeed {
    chain: String,
    constants: watch::Sender<Option<ChainConstants>>,
    current_block: watch::Sender<Option<BlockNumber>>,
    referenda: watch::Sender<Option<Arc<Referenda>>>,
    tracks: watch::Sender<Option<Arc<Tracks>>>,
    locks: watch::Sender<Option<Arc<TrackLocks>>>,
    records: watch::Sender<Option<Arc<Records>>>,
}

impl ChainFeed {
    pub fn chain(&self) -> &str {
        &self.chain
    }

    pub fn set_constants(&self, constants: ChainConstants) -> Result<(), ServiceError> {
        self.publish(&self.constants, constants)
    }

    pub fn set_current_block(&self, block: BlockNumber) -> Result<(), ServiceError> {
        self.publish(&self.current_block, block)
    }

    pub fn set_referenda(&self, referenda: Referenda) -> Result<(), ServiceError> {
        self.publish(&self.referenda, Arc::new(referenda))
    }

    pub fn set_tracks(&self, tracks: Tracks) -> Result<(), ServiceError> {
        self.publish(&self.tracks, Arc::new(tracks))
    }

    pub fn set_locks(&self, locks: TrackLocks) -> Result<(), ServiceError> {
        self.publish(&self.locks, Arc::new(locks))
    }

    pub fn set_records(
        &self,
        records: impl IntoIterator<Item = VotingRecord>,
    ) -> Result<(), ServiceError> {
        self.publish(&self.records, Arc::new(index_records(records)))
    }

    fn publish<T>(&self, tx: &watch::Sender<Option<T>>, value: T) -> Result<(), ServiceError> {
        tx.send(Some(value))
            .map_err(|_| ServiceError::ChannelClosed(self.chain.clone()))
    }
}

struct InputReceivers {
    constants: watch::Receiver<Option<ChainConstants>>,
    current_block: watch::Receiver<Option<BlockNumber>>,
    referenda: watch::Receiver<Option<Arc<Referenda>>>,
    tracks: watch::Receiver<Option<Arc<Tracks>>>,
    locks: watch::Receiver<Option<Arc<TrackLocks>>>,
    records: watch::Receiver<Option<Arc<Records>>>,
}

impl InputReceivers {
    /// Resolves when any input changes; errors once the feed is gone.
    async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        tokio::select! {
            r = self.constants.changed() => r,
            r = self.current_block.changed() => r,
            r = self.referenda.changed() => r,
            r = self.tracks.changed() => r,
            r = self.locks.changed() => r,
            r = self.records.changed() => r,
        }
    }

    /// Latest values, marking every channel as seen so that a burst of
    /// updates collapses into one recomputation.
    fn latest(&mut self) -> ChainInputs {
        ChainInputs {
            constants: *self.constants.borrow_and_update(),
            current_block: *self.current_block.borrow_and_update(),
            referenda: self.referenda.borrow_and_update().clone(),
            tracks: self.tracks.borrow_and_update().clone(),
            locks: self.locks.borrow_and_update().clone(),
            records: self.records.borrow_and_update().clone(),
        }
    }
}

pub struct AggregationGraph {
    chain: String,
    inputs: InputReceivers,
    output: watch::Sender<Option<Arc<GovernanceSnapshot>>>,
    generation: u64,
}

impl AggregationGraph {
    pub fn new(chain: impl Into<String>) -> (Self, ChainFeed) {
        let chain = chain.into();
        let (constants_tx, constants) = watch::channel(None);
        let (block_tx, current_block) = watch::channel(None);
        let (referenda_tx, referenda) = watch::channel(None);
        let (tracks_tx, tracks) = watch::channel(None);
        let (locks_tx, locks) = watch::channel(None);
        let (records_tx, records) = watch::channel(None);
        let (output, _) = watch::channel(None);

        let graph = Self {
            chain: chain.clone(),
            inputs: InputReceivers {
                constants,
                current_block,
                referenda,
                tracks,
                locks,
                records,
            },
            output,
            generation: 0,
        };
        let feed = ChainFeed {
            chain,
            constants: constants_tx,
            current_block: block_tx,
            referenda: referenda_tx,
            tracks: tracks_tx,
            locks: locks_tx,
            records: records_tx,
        };
        (graph, feed)
    }

    pub fn chain(&self) -> &str {
        &self.chain
    }

    /// Receiver of published snapshots; `None` until the barrier opens.
    pub fn subscribe(&self) -> SnapshotReceiver {
        self.output.subscribe()
    }

    pub fn spawn(self, shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Recompute on every input change until shutdown or until the feed is
    /// dropped.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        info!(chain = %self.chain, "aggregation graph started");
        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!(chain = %self.chain, "aggregation graph shutting down");
                    break;
                }
                changed = self.inputs.changed() => {
                    if changed.is_err() {
                        info!(chain = %self.chain, "input feed dropped, stopping graph");
                        break;
                    }
                    self.recompute();
                }
            }
        }
    }

    fn recompute(&mut self) {
        let inputs = self.inputs.latest();
        let Some(snapshot) = inputs.ready() else {
            debug!(chain = %self.chain, missing = ?inputs.missing(), "waiting for inputs");
            return;
        };
        self.generation += 1;
        let snapshot = aggregate(&self.chain, self.generation, snapshot);
        debug!(
            chain = %self.chain,
            generation = self.generation,
            block = %snapshot.current_block(),
            addresses = snapshot.claims.len(),
            total_locked = %snapshot.track_locks.total,
            total_claimable = %snapshot.total_claimable,
            "governance snapshot published"
        );
        self.output.send_replace(Some(Arc::new(snapshot)));
    }
}
