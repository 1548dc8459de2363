//! Per-user async mutual exclusion
//!
//! Each user id maps to its own `tokio::sync::Mutex`, created on first use
//! and removed from the registry once nobody holds or awaits it. Locks for
//! different users never contend.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard as StdMutexGuard};
use std::task::{Context, Poll};
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockRegistry = HashMap<String, Arc<Mutex<()>>>;

/// Registry of per-user locks
#[derive(Clone, Default)]
pub struct UserLocks {
    registry: Arc<StdMutex<LockRegistry>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `user_id`. Released when the guard drops.
    ///
    /// Dropping the returned future while it waits leaves the registry as
    /// if the call never happened.
    pub async fn lock(&self, user_id: &str) -> UserLockGuard {
        let entry = {
            let mut registry = self.registry();
            registry
                .entry(user_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        let slot = RegistrySlot {
            user_id: user_id.to_string(),
            registry: Arc::clone(&self.registry),
        };

        Acquire {
            pending: Box::pin(entry.lock_owned()),
            slot: Some(slot),
        }
        .await
    }

    /// Number of users with a live lock entry
    pub fn len(&self) -> usize {
        self.registry().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry().is_empty()
    }

    fn registry(&self) -> StdMutexGuard<'_, LockRegistry> {
        lock_registry(&self.registry)
    }
}

fn lock_registry(registry: &StdMutex<LockRegistry>) -> StdMutexGuard<'_, LockRegistry> {
    // The map is only touched in short non-panicking sections
    registry
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A caller's claim on one registry entry, held while waiting and while
/// locked. Removes the entry on drop when only the registry still refers
/// to it.
struct RegistrySlot {
    user_id: String,
    registry: Arc<StdMutex<LockRegistry>>,
}

impl Drop for RegistrySlot {
    fn drop(&mut self) {
        let mut registry = lock_registry(&self.registry);

        let idle = registry
            .get(&self.user_id)
            .map(|entry| Arc::strong_count(entry) == 1)
            .unwrap_or(false);
        if idle {
            registry.remove(&self.user_id);
        }
    }
}

type PendingLock = Pin<Box<dyn Future<Output = OwnedMutexGuard<()>> + Send>>;

/// Waits for one user's mutex while holding its registry slot
struct Acquire {
    // Field order matters: the pending acquire releases its `Arc` before
    // the slot checks whether the entry is idle.
    pending: PendingLock,
    slot: Option<RegistrySlot>,
}

impl Future for Acquire {
    type Output = UserLockGuard;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let guard = match self.pending.as_mut().poll(cx) {
            Poll::Ready(guard) => guard,
            Poll::Pending => return Poll::Pending,
        };

        match self.slot.take() {
            Some(slot) => Poll::Ready(UserLockGuard {
                _guard: guard,
                _slot: slot,
            }),
            // Only reachable when polled again after completion
            None => Poll::Pending,
        }
    }
}

/// Exclusive access to one user's records
pub struct UserLockGuard {
    // Field order matters: the mutex guard releases its `Arc` before the
    // slot checks whether the entry is idle.
    _guard: OwnedMutexGuard<()>,
    _slot: RegistrySlot,
}

