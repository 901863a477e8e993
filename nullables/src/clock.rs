//! Nullable block clock: the chain height only moves when told to.

use referenda_types::BlockNumber;
use std::cell::Cell;

pub struct NullBlockClock {
    current: Cell<u64>,
}

impl NullBlockClock {
    pub fn new(initial: u64) -> Self {
        Self {
            current: Cell::new(initial),
        }
    }

    pub fn now(&self) -> BlockNumber {
        BlockNumber::new(self.current.get())
    }

    /// Produce `blocks` blocks and return the new height.
    pub fn advance(&self, blocks: u64) -> BlockNumber {
        self.current.set(self.current.get().saturating_add(blocks));
        self.now()
    }

    pub fn set(&self, height: u64) {
        self.current.set(height);
    }
}
