//! Nullable chain feed: holds inputs back and releases them into a graph
//! in whatever order a test asks for.

use std::collections::VecDeque;

use referenda_governance::TrackLocks;
use referenda_service::{ChainFeed, ChainSnapshot, Referenda, ServiceError, Tracks};
use referenda_types::{BlockNumber, ChainConstants, VotingRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKind {
    Constants,
    CurrentBlock,
    Referenda,
    Tracks,
    Locks,
    Records,
}

impl InputKind {
    pub const ALL: [InputKind; 6] = [
        InputKind::Constants,
        InputKind::CurrentBlock,
        InputKind::Referenda,
        InputKind::Tracks,
        InputKind::Locks,
        InputKind::Records,
    ];
}

/// One resolved input waiting to be published.
#[derive(Clone, Debug)]
pub enum ChainInput {
    Constants(ChainConstants),
    CurrentBlock(BlockNumber),
    Referenda(Referenda),
    Tracks(Tracks),
    Locks(TrackLocks),
    Records(Vec<VotingRecord>),
}

impl ChainInput {
    pub fn kind(&self) -> InputKind {
        match self {
            ChainInput::Constants(_) => InputKind::Constants,
            ChainInput::CurrentBlock(_) => InputKind::CurrentBlock,
            ChainInput::Referenda(_) => InputKind::Referenda,
            ChainInput::Tracks(_) => InputKind::Tracks,
            ChainInput::Locks(_) => InputKind::Locks,
            ChainInput::Records(_) => InputKind::Records,
        }
    }

    fn publish(self, feed: &ChainFeed) -> Result<(), ServiceError> {
        match self {
            ChainInput::Constants(constants) => feed.set_constants(constants),
            ChainInput::CurrentBlock(block) => feed.set_current_block(block),
            ChainInput::Referenda(referenda) => feed.set_referenda(referenda),
            ChainInput::Tracks(tracks) => feed.set_tracks(tracks),
            ChainInput::Locks(locks) => feed.set_locks(locks),
            ChainInput::Records(records) => feed.set_records(records),
        }
    }
}

pub struct NullChainFeed {
    feed: ChainFeed,
    pending: VecDeque<ChainInput>,
    released: Vec<InputKind>,
}

impl NullChainFeed {
    pub fn new(feed: ChainFeed) -> Self {
        Self {
            feed,
            pending: VecDeque::new(),
            released: Vec::new(),
        }
    }

    /// Queue every input of `snapshot`, in declaration order.
    pub fn from_snapshot(
        feed: ChainFeed,
        snapshot: ChainSnapshot,
        fallback: ChainConstants,
    ) -> Self {
        let mut null = Self::new(feed);
        null.queue(ChainInput::Constants(snapshot.constants.unwrap_or(fallback)));
        null.queue(ChainInput::CurrentBlock(snapshot.current_block));
        null.queue(ChainInput::Referenda(
            snapshot.referenda.into_iter().map(|r| (r.id, r)).collect(),
        ));
        null.queue(ChainInput::Tracks(
            snapshot.tracks.into_iter().map(|t| (t.id, t)).collect(),
        ));
        null.queue(ChainInput::Locks(snapshot.locks));
        null.queue(ChainInput::Records(snapshot.records));
        null
    }

    pub fn queue(&mut self, input: ChainInput) {
        self.pending.push_back(input);
    }

    /// Publish the first queued input of `kind`. Returns whether one was
    /// queued.
    pub fn release(&mut self, kind: InputKind) -> Result<bool, ServiceError> {
        let Some(index) = self.pending.iter().position(|input| input.kind() == kind) else {
            return Ok(false);
        };
        match self.pending.remove(index) {
            Some(input) => {
                input.publish(&self.feed)?;
                self.released.push(kind);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Publish queued inputs in the given order of kinds.
    pub fn release_in(&mut self, order: &[InputKind]) -> Result<(), ServiceError> {
        for kind in order {
            self.release(*kind)?;
        }
        Ok(())
    }

    pub fn release_all(&mut self) -> Result<(), ServiceError> {
        while let Some(input) = self.pending.pop_front() {
            let kind = input.kind();
            input.publish(&self.feed)?;
            self.released.push(kind);
        }
        Ok(())
    }

    /// Publish an input immediately, bypassing the queue.
    pub fn publish_now(&mut self, input: ChainInput) -> Result<(), ServiceError> {
        let kind = input.kind();
        input.publish(&self.feed)?;
        self.released.push(kind);
        Ok(())
    }

    pub fn pending(&self) -> Vec<InputKind> {
        self.pending.iter().map(ChainInput::kind).collect()
    }

    pub fn released(&self) -> &[InputKind] {
        &self.released
    }

    pub fn feed(&self) -> &ChainFeed {
        &self.feed
    }
}
