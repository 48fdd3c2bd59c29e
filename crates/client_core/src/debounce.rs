//! Trailing-edge debounce timer.
//!
//! Every [`Debouncer::schedule`] restarts the quiescence window and replaces
//! the pending action, so only the last action armed inside a window runs.
//! A generation counter backs this up: an action that already woke up when a
//! newer `schedule` or `cancel` lands sees a stale [`DebounceTicket`].

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};

use tokio::{runtime::Handle, task::JoinHandle};

pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

/// Handed to a fired action; tells it whether it is still the latest one.
#[derive(Debug, Clone)]
pub struct DebounceTicket {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl DebounceTicket {
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arms the timer with `action`, replacing whatever was pending.
    ///
    /// Returns `false` without arming anything when called outside a tokio
    /// runtime; the caller decides how to run the action then.
    pub fn schedule<F>(&self, action: F) -> bool
    where
        F: FnOnce(DebounceTicket) + Send + 'static,
    {
        let Ok(runtime) = Handle::try_current() else {
            return false;
        };

        let ticket = DebounceTicket {
            generation: self.generation.fetch_add(1, Ordering::SeqCst) + 1,
            current: Arc::clone(&self.generation),
        };
        let delay = self.delay;
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if ticket.is_current() {
                action(ticket);
            }
        });

        if let Some(previous) = self.lock_pending().replace(task) {
            previous.abort();
        }
        true
    }

    /// Drops the pending action, if any. Returns whether one was still waiting.
    pub fn cancel(&self) -> bool {
        self.generation.fetch_add(1, Ordering::SeqCst);
        match self.lock_pending().take() {
            Some(task) => {
                let was_waiting = !task.is_finished();
                task.abort();
                was_waiting
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.lock_pending()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[path = "tests/debounce_tests.rs"]
mod tests;
