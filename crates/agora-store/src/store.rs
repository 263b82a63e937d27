//! The reactive store every widget is mounted into.
//!
//! A [`Store`] owns one widget's state behind an `Arc`. Readers take cheap
//! snapshots; [`Store::dispatch`] runs the widget's reducer against a shallow
//! copy and swaps it in only when the reducer reports a change. Entity
//! collections are `Vec<Arc<_>>`, so a reducer that goes through
//! [`find_mut`] clones just the entity it touches and every sibling stays
//! shared with the previous snapshot.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::debug;

/// A self-seeding widget: its state, the actions it accepts, and the view it
/// renders from.
pub trait Widget: Send + Sync + 'static {
    /// Name used in logs.
    const NAME: &'static str;

    type State: Clone + Send + Sync + 'static;
    type Action: fmt::Debug + Send + 'static;
    type View;

    /// The mock data the widget starts with.
    fn seed() -> Self::State;

    /// Apply `action` to `state`. Returns `false` when the action was
    /// rejected or had no effect; `state` must then be left untouched.
    fn reduce(state: &mut Self::State, action: Self::Action) -> bool;

    /// Derive the render model.
    fn project(state: &Self::State) -> Self::View;
}

type Listener<W> = Arc<dyn Fn(&Arc<<W as Widget>::State>) + Send + Sync>;

struct Listeners<W: Widget> {
    next_id: u64,
    entries: BTreeMap<u64, Listener<W>>,
}

/// Committed states waiting to be handed to listeners, in commit order.
struct Delivery<W: Widget> {
    queue: VecDeque<Arc<W::State>>,
    draining: bool,
}

struct Inner<W: Widget> {
    state: Mutex<Arc<W::State>>,
    listeners: Mutex<Listeners<W>>,
    delivery: Mutex<Delivery<W>>,
}

/// Handle to one mounted widget. Clones share the same state.
pub struct Store<W: Widget> {
    inner: Arc<Inner<W>>,
}

impl<W: Widget> Clone for Store<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W: Widget> Default for Store<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Widget> Store<W> {
    /// Mount the widget with its seed data.
    pub fn new() -> Self {
        Self::with_state(W::seed())
    }

    /// Mount the widget with caller-provided state.
    pub fn with_state(state: W::State) -> Self {
        debug!(widget = W::NAME, "Mounted widget store");
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(Arc::new(state)),
                listeners: Mutex::new(Listeners {
                    next_id: 0,
                    entries: BTreeMap::new(),
                }),
                delivery: Mutex::new(Delivery {
                    queue: VecDeque::new(),
                    draining: false,
                }),
            }),
        }
    }

    /// Current state. The snapshot never changes under the caller.
    pub fn snapshot(&self) -> Arc<W::State> {
        Arc::clone(&lock(&self.inner.state))
    }

    /// Current render model.
    pub fn view(&self) -> W::View {
        W::project(&self.snapshot())
    }

    /// Apply an action. Returns whether the state changed; listeners are
    /// only notified when it did.
    ///
    /// Listeners see every committed state exactly once and in commit order.
    /// If another call is already delivering, the new state is queued behind
    /// it and delivered by that call.
    pub fn dispatch(&self, action: W::Action) -> bool {
        let action_desc = format!("{action:?}");

        let changed = {
            let mut guard = lock(&self.inner.state);
            let mut draft = (**guard).clone();
            if W::reduce(&mut draft, action) {
                let next = Arc::new(draft);
                *guard = Arc::clone(&next);
                // Queued while the state lock is held so queue order is commit order.
                lock(&self.inner.delivery).queue.push_back(next);
                true
            } else {
                false
            }
        };

        debug!(
            widget = W::NAME,
            action = %action_desc,
            changed,
            "Dispatched action"
        );

        if changed {
            self.deliver();
        }
        changed
    }

    /// Register `listener`, called with the new state after every change.
    /// The listener stays registered until the returned handle is dropped or
    /// [`Subscription::unsubscribe`] is called.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Arc<W::State>) + Send + Sync + 'static,
    {
        let id = {
            let mut listeners = lock(&self.inner.listeners);
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.insert(id, Arc::new(listener));
            id
        };

        let weak: Weak<Inner<W>> = Arc::downgrade(&self.inner);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    lock(&inner.listeners).entries.remove(&id);
                }
            })),
        }
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        lock(&self.inner.listeners).entries.len()
    }

    fn deliver(&self) {
        {
            let mut delivery = lock(&self.inner.delivery);
            if delivery.draining {
                return;
            }
            delivery.draining = true;
        }

        let mut guard = DrainGuard {
            delivery: &self.inner.delivery,
            finished: false,
        };
        loop {
            let state = {
                let mut delivery = lock(&self.inner.delivery);
                match delivery.queue.pop_front() {
                    Some(state) => state,
                    None => {
                        delivery.draining = false;
                        guard.finished = true;
                        return;
                    }
                }
            };

            // Listeners run outside every lock so they may dispatch or unsubscribe.
            let listeners: Vec<Listener<W>> =
                lock(&self.inner.listeners).entries.values().cloned().collect();
            for listener in listeners {
                listener(&state);
            }
        }
    }
}

/// Releases the delivery slot if a listener panics mid-drain.
struct DrainGuard<'a, W: Widget> {
    delivery: &'a Mutex<Delivery<W>>,
    finished: bool,
}

impl<W: Widget> Drop for DrainGuard<'_, W> {
    fn drop(&mut self) {
        if !self.finished {
            let mut delivery = lock(self.delivery);
            delivery.draining = false;
            delivery.queue.clear();
        }
    }
}

/// Keeps a store listener registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Copy-on-write access to the first entity matching `pred`.
///
/// Only the matched entity is cloned (and only if a snapshot still shares
/// it); the rest of the collection is left pointing at the same allocations.
pub fn find_mut<T, P>(items: &mut [Arc<T>], mut pred: P) -> Option<&mut T>
where
    T: Clone,
    P: FnMut(&T) -> bool,
{
    items
        .iter_mut()
        .find(|item| pred(&***item))
        .map(Arc::make_mut)
}
