//! Synchronous publish/subscribe base every model builds on.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub type ObserverId = u64;

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

pub struct Observable<E> {
    inner: Mutex<Registry<E>>,
}

struct Registry<E> {
    next_id: ObserverId,
    observers: Vec<(ObserverId, Callback<E>)>,
}

impl<E> Default for Observable<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Observable<E> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Registry {
                next_id: 0,
                observers: Vec::new(),
            }),
        }
    }

    pub fn add_observer(&self, callback: impl Fn(&E) + Send + Sync + 'static) -> ObserverId {
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.observers.push((id, Arc::new(callback)));
        id
    }

    pub fn remove_observer(&self, id: ObserverId) -> bool {
        let mut registry = self.lock();
        let before = registry.observers.len();
        registry.observers.retain(|(observer, _)| *observer != id);
        registry.observers.len() != before
    }

    /// Invokes every subscriber synchronously, in subscription order. A
    /// panicking callback is logged and skipped; the rest still run. The
    /// registry lock is released first, so callbacks may subscribe or
    /// unsubscribe freely (taking effect from the next notification).
    pub fn notify(&self, event: &E) {
        let snapshot: Vec<(ObserverId, Callback<E>)> = self.lock().observers.clone();
        for (id, callback) in snapshot {
            if catch_unwind(AssertUnwindSafe(|| callback(event))).is_err() {
                tracing::warn!(observer = id, "observer callback panicked, continuing");
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Registry<E>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "tests/observable_tests.rs"]
mod tests;
