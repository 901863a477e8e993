//! Latest per-address view of every chain's snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;

use referenda_governance::{ClaimChunk, DelegatedBalance};
use referenda_types::{Address, Balance, BlockNumber, TrackId};

use crate::graph::{GovernanceSnapshot, SnapshotReceiver};

/// What a wallet screen shows for one account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountView {
    pub generation: u64,
    pub current_block: BlockNumber,
    /// Largest lock over all tracks.
    pub locked: Balance,
    pub track_locks: BTreeMap<TrackId, Balance>,
    pub claims: Vec<ClaimChunk>,
    pub claimable: Balance,
    pub next_unlock: Option<BlockNumber>,
    /// Target → this account's delegation to it.
    pub delegating_to: BTreeMap<Address, DelegatedBalance>,
    /// Balance other accounts delegate to this one.
    pub delegated_in: Balance,
}

impl AccountView {
    fn from_snapshot(snapshot: &GovernanceSnapshot, address: &Address) -> Self {
        let delegating_to = snapshot
            .delegations
            .balances
            .iter()
            .filter_map(|(target, delegators)| {
                delegators
                    .get(address)
                    .map(|delegated| (target.clone(), *delegated))
            })
            .collect();

        Self {
            generation: snapshot.generation,
            current_block: snapshot.current_block(),
            locked: snapshot.track_locks.max_for(address),
            track_locks: snapshot
                .track_locks
                .track_locks(address)
                .cloned()
                .unwrap_or_default(),
            claims: snapshot.claims_for(address).to_vec(),
            claimable: snapshot.claimable_for(address),
            next_unlock: snapshot.next_unlock_for(address),
            delegating_to,
            delegated_in: snapshot.delegations.delegated_to(address),
        }
    }
}

type CacheKey = (String, Address);

/// Account views keyed by (chain, address). Chains never overwrite each
/// other.
#[derive(Default)]
pub struct GovernanceCache {
    entries: RwLock<BTreeMap<CacheKey, AccountView>>,
}

impl GovernanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every entry of `snapshot.chain` with views derived from it.
    ///
    /// A snapshot older than what the cache already holds is ignored.
    pub async fn apply(&self, snapshot: &GovernanceSnapshot) {
        let views: Vec<_> = snapshot
            .addresses()
            .into_iter()
            .map(|address| {
                (
                    (snapshot.chain.clone(), address.clone()),
                    AccountView::from_snapshot(snapshot, address),
                )
            })
            .collect();

        let mut entries = self.entries.write().await;
        let stale = entries
            .iter()
            .find(|((chain, _), _)| *chain == snapshot.chain)
            .is_some_and(|(_, view)| view.generation > snapshot.generation);
        if stale {
            tracing::debug!(chain = %snapshot.chain, generation = snapshot.generation, "ignoring stale snapshot");
            return;
        }
        entries.retain(|(chain, _), _| *chain != snapshot.chain);
        entries.extend(views);
    }

    pub async fn get(&self, chain: &str, address: &Address) -> Option<AccountView> {
        self.entries
            .read()
            .await
            .get(&(chain.to_string(), address.clone()))
            .cloned()
    }

    /// Addresses cached for `chain`.
    pub async fn addresses(&self, chain: &str) -> Vec<Address> {
        self.entries
            .read()
            .await
            .keys()
            .filter(|(c, _)| c == chain)
            .map(|(_, address)| address.clone())
            .collect()
    }

    /// Keep the cache in step with a graph's output until shutdown or
    /// until the graph stops.
    pub fn follow(
        self: Arc<Self>,
        mut snapshots: SnapshotReceiver,
        mut shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let latest = snapshots.borrow_and_update().clone();
                if let Some(snapshot) = latest {
                    self.apply(&snapshot).await;
                }
                tokio::select! {
                    _ = shutdown.recv() => break,
                    changed = snapshots.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
        })
    }
}
