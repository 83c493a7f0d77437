// src/watch.rs
//
// Push-based subscriptions: the producer keeps a `Watchers` registry and
// consumers hold a `Subscription` that unregisters itself when dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// A live feed of values. Dropping it unsubscribes.
pub struct Subscription<T> {
    rx: Receiver<T>,
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl<T> Subscription<T> {
    /// Builds a subscription from a channel and a teardown callback.
    pub fn new(rx: Receiver<T>, unsubscribe: impl FnOnce() + Send + 'static) -> Self {
        Subscription {
            rx,
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// A subscription that yields `value` once and is never fed again.
    pub fn once(value: T) -> Self {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(value);
        Subscription {
            rx,
            unsubscribe: None,
        }
    }

    /// Next pending value, if any. Never blocks.
    pub fn try_next(&self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(v) => Some(v),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Drains every pending value and returns the most recent one.
    pub fn latest(&self) -> Option<T> {
        let mut last = None;
        while let Some(v) = self.try_next() {
            last = Some(v);
        }
        last
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

struct Entry<K, T> {
    id: u64,
    key: K,
    tx: Sender<T>,
}

/// Registry of watchers keyed by what they observe.
pub struct Watchers<K, T> {
    next_id: AtomicU64,
    entries: Mutex<Vec<Entry<K, T>>>,
}

impl<K, T> Default for Watchers<K, T> {
    fn default() -> Self {
        Watchers {
            next_id: AtomicU64::new(1),
            entries: Mutex::new(Vec::new()),
        }
    }
}

impl<K, T> Watchers<K, T>
where
    K: Send + 'static,
    T: Send + 'static,
{
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers a watcher on `key` and seeds it with `initial`.
    pub fn watch(self: &Arc<Self>, key: K, initial: T) -> Subscription<T> {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(initial);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push(Entry { id, key, tx });

        let registry: Weak<Self> = Arc::downgrade(self);
        Subscription::new(rx, move || {
            if let Some(registry) = registry.upgrade() {
                registry.remove(id);
            }
        })
    }

    /// Sends `make(key)` to every watcher whose key satisfies `matches`.
    /// Watchers whose receiver is gone are pruned.
    pub fn notify(&self, mut matches: impl FnMut(&K) -> bool, mut make: impl FnMut(&K) -> T) {
        self.lock()
            .retain(|entry| !matches(&entry.key) || entry.tx.send(make(&entry.key)).is_ok());
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove(&self, id: u64) {
        self.lock().retain(|entry| entry.id != id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Entry<K, T>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
