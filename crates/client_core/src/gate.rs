//! Busy-window bookkeeping around user-triggered mutations.
//!
//! The gate never orders or cancels the underlying requests; it only drives
//! the busy indicator. The indicator stays up at least `lower` (so a fast
//! call does not flicker) and flips to a "still working" notice at `upper`
//! when a call is still pending.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{sleep, Instant};

#[derive(Debug, Clone, Copy)]
pub struct GateLimits {
    pub lower: Duration,
    pub upper: Duration,
}

impl Default for GateLimits {
    fn default() -> Self {
        Self {
            lower: Duration::from_millis(350),
            upper: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusyState {
    #[default]
    Idle,
    Busy,
    /// The upper bound elapsed with a mutation still pending. Signal only;
    /// the request keeps running.
    StillWorking,
}

struct GateInner {
    depth: u32,
    generation: u64,
    window_started: Option<Instant>,
}

struct GateShared {
    limits: GateLimits,
    inner: Mutex<GateInner>,
    state: watch::Sender<BusyState>,
}

impl GateShared {
    fn lock(&self) -> MutexGuard<'_, GateInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Clone)]
pub struct MutationGate {
    shared: Arc<GateShared>,
}

impl MutationGate {
    pub fn new(limits: GateLimits) -> Self {
        let (state, _) = watch::channel(BusyState::Idle);
        Self {
            shared: Arc::new(GateShared {
                limits,
                inner: Mutex::new(GateInner {
                    depth: 0,
                    generation: 0,
                    window_started: None,
                }),
                state,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<BusyState> {
        self.shared.state.subscribe()
    }

    pub fn busy(&self) -> bool {
        *self.shared.state.borrow() != BusyState::Idle
    }

    /// Begins (or nests into) a busy window.
    pub fn block(&self) {
        let new_window = {
            let mut inner = self.shared.lock();
            inner.depth += 1;
            if inner.depth > 1 {
                None
            } else {
                inner.generation += 1;
                inner.window_started = Some(Instant::now());
                self.shared.state.send_replace(BusyState::Busy);
                Some(inner.generation)
            }
        };

        if let Some(generation) = new_window {
            let shared = Arc::clone(&self.shared);
            tokio::spawn(async move {
                sleep(shared.limits.upper).await;
                let inner = shared.lock();
                if inner.depth > 0 && inner.generation == generation {
                    shared.state.send_replace(BusyState::StillWorking);
                }
            });
        }
    }

    /// Completes one busy window. The indicator clears only when every
    /// nested window has completed and the lower bound has been on screen.
    pub async fn unblock(&self) {
        let remaining = {
            let mut inner = self.shared.lock();
            if inner.depth == 0 {
                tracing::warn!("unblock without a matching block");
                return;
            }
            inner.depth -= 1;
            if inner.depth > 0 {
                return;
            }
            inner
                .window_started
                .map(|started| self.shared.limits.lower.saturating_sub(started.elapsed()))
        };

        if let Some(remaining) = remaining.filter(|wait| !wait.is_zero()) {
            sleep(remaining).await;
        }

        let mut inner = self.shared.lock();
        // A new window may have opened during the anti-flicker wait.
        if inner.depth == 0 {
            inner.window_started = None;
            self.shared.state.send_replace(BusyState::Idle);
        }
    }
}

#[cfg(test)]
#[path = "tests/gate_tests.rs"]
mod tests;
