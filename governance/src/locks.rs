//! Per-track lock aggregation.
//!
//! Conviction-voting locks are kept per track, but concurrent locks of one
//! account freeze the same balance. The amount an account cannot spend is
//! therefore the largest of its track locks, and the wallet-wide lock is the
//! sum of those per-account maxima.

use referenda_types::{Address, Balance, TrackId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// address → track → locked amount, as reported by the chain's lock storage.
pub type TrackLocks = BTreeMap<Address, BTreeMap<TrackId, Balance>>;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackLockSummary {
    /// Wallet-wide locked balance.
    pub total: Balance,
    /// Largest track lock per address.
    pub per_address: BTreeMap<Address, Balance>,
    /// The input locks, unchanged.
    pub locks: TrackLocks,
}

impl TrackLockSummary {
    pub fn max_for(&self, address: &Address) -> Balance {
        self.per_address.get(address).copied().unwrap_or_default()
    }

    pub fn track_locks(&self, address: &Address) -> Option<&BTreeMap<TrackId, Balance>> {
        self.locks.get(address)
    }
}

/// Fold per-track locks into per-address maxima and a wallet total.
///
/// The total saturates on overflow; the pass itself never fails.
pub fn aggregate_track_locks(locks: TrackLocks) -> TrackLockSummary {
    let mut total = Balance::ZERO;
    let mut per_address = BTreeMap::new();

    for (address, tracks) in &locks {
        let address_max = tracks.values().copied().max().unwrap_or_default();
        total = total.checked_add(address_max).unwrap_or_else(|| {
            tracing::warn!(%address, "wallet lock total overflowed, saturating");
            Balance::MAX
        });
        per_address.insert(address.clone(), address_max);
    }

    TrackLockSummary {
        total,
        per_address,
        locks,
    }
}
