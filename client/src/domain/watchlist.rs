//! Watchlist synchronizer.
//!
//! Membership is flipped locally before the server confirms it. Each id
//! moves through `Stable -> Pending -> {Stable, RolledBack}`; a failed call
//! restores the membership read before the flip.
//!
//! Toggles of the same id are serialised by a per-id async lock that is
//! taken before membership is read and held across the remote call. Toggles
//! of different ids do not wait on each other.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};

use crate::domain::ports::ApiGateway;
use crate::domain::{ContentId, ContentItem, Error, Liveness, RemoteApi, WatchlistAction};

/// Synchronisation status of one watchlist relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipStatus {
    /// Local membership matches the last server answer.
    Stable,
    /// A toggle is waiting for the server.
    Pending,
    /// The last toggle failed and was reverted.
    RolledBack,
}

/// Observable watchlist state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchlistSnapshot {
    ids: BTreeSet<ContentId>,
    status: BTreeMap<ContentId, MembershipStatus>,
}

impl WatchlistSnapshot {
    /// Whether `id` is currently saved.
    pub fn contains(&self, id: ContentId) -> bool {
        self.ids.contains(&id)
    }

    /// Saved ids in ascending order.
    pub fn ids(&self) -> &BTreeSet<ContentId> {
        &self.ids
    }

    /// Status of the relation for `id`. Untouched ids are stable.
    pub fn status(&self, id: ContentId) -> MembershipStatus {
        self.status
            .get(&id)
            .copied()
            .unwrap_or(MembershipStatus::Stable)
    }

    fn set(&mut self, id: ContentId, member: bool, status: MembershipStatus) {
        if member {
            self.ids.insert(id);
        } else {
            self.ids.remove(&id);
        }
        self.status.insert(id, status);
    }
}

/// Optimistic watchlist state over the remote API.
pub struct WatchlistSynchronizer<G> {
    api: RemoteApi<G>,
    liveness: Liveness,
    epoch: AtomicU64,
    snapshot: watch::Sender<WatchlistSnapshot>,
    locks: Mutex<HashMap<ContentId, Arc<Mutex<()>>>>,
}

impl<G> WatchlistSynchronizer<G> {
    /// Create an empty watchlist.
    pub fn new(api: RemoteApi<G>, liveness: Liveness) -> Self {
        let (snapshot, _) = watch::channel(WatchlistSnapshot::default());
        Self {
            api,
            liveness,
            epoch: AtomicU64::new(0),
            snapshot,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Reseed from a freshly authenticated user's saved ids.
    ///
    /// Toggles still in flight from before the reset are not applied when
    /// they complete.
    pub fn reset(&self, ids: impl IntoIterator<Item = ContentId>) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.snapshot.send_replace(WatchlistSnapshot {
            ids: ids.into_iter().collect(),
            status: BTreeMap::new(),
        });
    }

    /// Current state.
    pub fn snapshot(&self) -> WatchlistSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Whether `id` is currently saved.
    pub fn contains(&self, id: ContentId) -> bool {
        self.snapshot.borrow().contains(id)
    }

    /// Status of the relation for `id`.
    pub fn status(&self, id: ContentId) -> MembershipStatus {
        self.snapshot.borrow().status(id)
    }

    /// Observe every optimistic flip, confirmation and rollback.
    pub fn subscribe(&self) -> watch::Receiver<WatchlistSnapshot> {
        self.snapshot.subscribe()
    }

    async fn lock_for(&self, id: ContentId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(id).or_default())
    }

    /// Drop the per-id lock once no other toggle holds or waits on it.
    async fn release_lock(&self, id: ContentId, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().await;
        drop(lock);
        if locks
            .get(&id)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            locks.remove(&id);
        }
    }

    fn applies(&self, epoch: u64) -> bool {
        self.liveness.is_alive() && self.epoch.load(Ordering::Acquire) == epoch
    }
}

impl<G: ApiGateway> WatchlistSynchronizer<G> {
    /// Flip membership of `id` and confirm it with the server.
    ///
    /// Returns the membership after the toggle.
    ///
    /// # Errors
    ///
    /// The gateway error, after the local flip has been reverted.
    pub async fn toggle(&self, id: ContentId) -> Result<bool, Error> {
        let lock = self.lock_for(id).await;
        let outcome = {
            let _serialised = lock.lock().await;
            self.toggle_serialised(id).await
        };
        self.release_lock(id, lock).await;
        outcome
    }

    async fn toggle_serialised(&self, id: ContentId) -> Result<bool, Error> {
        let epoch = self.epoch.load(Ordering::Acquire);
        let was_member = self.contains(id);
        let action = if was_member {
            WatchlistAction::Remove
        } else {
            WatchlistAction::Add
        };
        self.snapshot
            .send_modify(|state| state.set(id, !was_member, MembershipStatus::Pending));
        debug!(%id, ?action, "optimistic watchlist flip");

        let outcome = self.api.set_watchlist_membership(id, action).await;
        if !self.applies(epoch) {
            debug!(%id, "watchlist reset during toggle; dropping response");
            return outcome.map(|()| !was_member);
        }

        match outcome {
            Ok(()) => {
                self.snapshot
                    .send_modify(|state| state.set(id, !was_member, MembershipStatus::Stable));
                Ok(!was_member)
            }
            Err(error) => {
                warn!(%id, kind = %error.kind(), error = %error, "watchlist toggle failed; rolling back");
                self.snapshot
                    .send_modify(|state| state.set(id, was_member, MembershipStatus::RolledBack));
                Err(error)
            }
        }
    }

    /// Saved items with their details, as listed by the server.
    pub async fn saved_items(&self) -> Result<Vec<ContentItem>, Error> {
        self.api.watchlist_items().await
    }
}

#[cfg(test)]
#[path = "watchlist_tests.rs"]
mod tests;
