//! Observable single-value stores
//!
//! A [`Store`] holds one value of process-wide UI state. Writers replace or
//! modify the value; subscribers are called synchronously, in subscription
//! order, on the writer's thread once the new value is in place.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Handle returned by [`Store::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: RwLock<T>,
    subscribers: Mutex<Vec<(SubscriptionId, Callback<T>)>>,
    next_id: AtomicU64,
}

/// Cloneable handle to a shared observable value
pub struct Store<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.inner.value.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Store")
            .field("value", &*value)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<T: Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Store<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: RwLock::new(value),
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Register `callback`; it sees every value written from now on
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers().push((id, Arc::new(callback)));
        id
    }

    /// Remove a subscription, returning whether it existed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers();
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers().len()
    }

    fn subscribers(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriptionId, Callback<T>)>> {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> Store<T> {
    pub fn get(&self) -> T {
        self.inner
            .value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, value: T) {
        self.update(|current| *current = value);
    }

    /// Modify the value in place, then notify subscribers
    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        let snapshot = {
            let mut value = self
                .inner
                .value
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            f(&mut *value);
            value.clone()
        };

        // Callbacks run without any lock held so they may read or write the store
        let callbacks: Vec<Callback<T>> = self
            .subscribers()
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in callbacks {
            callback(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_initial_value() {
        let store = Store::new(5);
        assert_eq!(store.get(), 5);
        assert_eq!(Store::<u32>::default().get(), 0);
    }

    #[test]
    fn set_notifies_subscribers_in_order() {
        let store = Store::new(0);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&seen);
        store.subscribe(move |v| first.lock().unwrap().push(("first", *v)));
        let second = Arc::clone(&seen);
        store.subscribe(move |v| second.lock().unwrap().push(("second", *v)));

        store.set(1);
        store.set(2);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![("first", 1), ("second", 1), ("first", 2), ("second", 2)]
        );
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let store = Store::new(0);
        let count = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&count);
        let id = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.set(1);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set(2);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn update_modifies_in_place() {
        let store = Store::new(vec![1, 2]);
        store.update(|v| v.push(3));
        assert_eq!(store.get(), vec![1, 2, 3]);
    }

    #[test]
    fn callback_can_read_store() {
        let store = Store::new(0);
        let observed = Arc::new(AtomicU64::new(0));
        let reader = store.clone();
        let out = Arc::clone(&observed);
        store.subscribe(move |_| out.store(reader.get(), Ordering::SeqCst));

        store.set(7);
        assert_eq!(observed.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn clones_share_value() {
        let store = Store::new("a".to_string());
        let other = store.clone();
        other.set("b".to_string());
        assert_eq!(store.get(), "b");
    }

    #[test]
    fn concurrent_writers_are_all_applied() {
        let store = Store::new(0u64);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.update(|v| *v += 1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.get(), 800);
    }
}
