//! Nullable block-time oracle: answers with a fixed duration and records
//! what it was asked.

use std::sync::Mutex;
use std::time::Duration;

use referenda_service::BlockTimeOracle;
use referenda_types::BlockNumber;

pub struct NullBlockTimeOracle {
    answer: Duration,
    queries: Mutex<Vec<(BlockNumber, BlockNumber)>>,
}

impl NullBlockTimeOracle {
    /// Every query returns `answer`, whatever the distance.
    pub fn fixed(answer: Duration) -> Self {
        Self {
            answer,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// `(current, target)` pairs queried so far.
    pub fn queries(&self) -> Vec<(BlockNumber, BlockNumber)> {
        self.queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }
}

impl BlockTimeOracle for NullBlockTimeOracle {
    fn time_until(&self, current: BlockNumber, target: BlockNumber) -> Duration {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push((current, target));
        }
        self.answer
    }
}
