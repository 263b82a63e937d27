//! Keyed, cancellable delayed tasks.
//!
//! Each key holds at most one pending task. Re-arming a key aborts the old
//! task, and every task carries a generation number so that one which has
//! already woken up but lost the race to a re-arm never fires. A task that
//! fires removes its own entry before running its callback, so callbacks are
//! free to schedule on the same [`Timers`] again.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::trace;

struct Pending {
    generation: u64,
    task: JoinHandle<()>,
}

struct Slots<K> {
    next_generation: u64,
    pending: HashMap<K, Pending>,
}

impl<K> Drop for Slots<K> {
    fn drop(&mut self) {
        for pending in self.pending.values() {
            pending.task.abort();
        }
    }
}

/// Handle to a set of keyed timers. Clones share the same set; every pending
/// task is aborted once the last clone is dropped.
pub struct Timers<K> {
    slots: Arc<Mutex<Slots<K>>>,
    runtime: Handle,
}

impl<K> Clone for Timers<K> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
            runtime: self.runtime.clone(),
        }
    }
}

impl<K> fmt::Debug for Timers<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timers")
            .field("pending", &lock(&self.slots).pending.len())
            .finish()
    }
}

fn lock<K>(slots: &Mutex<Slots<K>>) -> MutexGuard<'_, Slots<K>> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<K> Timers<K>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + 'static,
{
    /// Timers whose tasks run on `runtime`.
    pub fn new(runtime: Handle) -> Self {
        Self {
            slots: Arc::new(Mutex::new(Slots {
                next_generation: 0,
                pending: HashMap::new(),
            })),
            runtime,
        }
    }

    /// Run `callback` after `delay`, replacing any task pending under `key`.
    pub fn schedule<F>(&self, key: K, delay: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut slots = lock(&self.slots);
        self.arm(&mut slots, key, delay, callback);
    }

    /// Like [`Timers::schedule`], but leaves an already pending task alone.
    /// Returns whether a task was armed.
    pub fn schedule_if_idle<F>(&self, key: K, delay: Duration, callback: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let mut slots = lock(&self.slots);
        if slots.pending.contains_key(&key) {
            return false;
        }
        self.arm(&mut slots, key, delay, callback);
        true
    }

    fn arm<F>(&self, slots: &mut Slots<K>, key: K, delay: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let generation = slots.next_generation;
        slots.next_generation += 1;

        let shared: Weak<Mutex<Slots<K>>> = Arc::downgrade(&self.slots);
        let task_key = key.clone();
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            let Some(shared) = shared.upgrade() else {
                return;
            };
            let current = {
                let mut slots = lock(&shared);
                match slots.pending.get(&task_key) {
                    Some(pending) if pending.generation == generation => {
                        slots.pending.remove(&task_key);
                        true
                    }
                    _ => false,
                }
            };
            drop(shared);

            if current {
                trace!(key = ?task_key, "Timer fired");
                callback();
            }
        });

        if let Some(previous) = slots.pending.insert(key, Pending { generation, task }) {
            previous.task.abort();
        }
    }

    /// Cancel the task pending under `key`. Returns whether one was pending.
    pub fn cancel(&self, key: &K) -> bool {
        match lock(&self.slots).pending.remove(key) {
            Some(pending) => {
                pending.task.abort();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        let mut slots = lock(&self.slots);
        for (_, pending) in slots.pending.drain() {
            pending.task.abort();
        }
    }

    pub fn is_pending(&self, key: &K) -> bool {
        lock(&self.slots).pending.contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.slots).pending.len()
    }

    pub fn pending_keys(&self) -> Vec<K> {
        lock(&self.slots).pending.keys().cloned().collect()
    }
}
