use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::task::AbortHandle;

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A single pending fire-once action. Scheduling again cancels whatever was
/// pending, so bursts of triggers collapse into one action after the last.
///
/// Must be used from within a tokio runtime.
#[derive(Default)]
pub struct DebouncedTask {
    pending: Mutex<Option<AbortHandle>>,
}

impl DebouncedTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule<F>(&self, delay: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut pending = lock(&self.pending);
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        });
        *pending = Some(task.abort_handle());
    }

    /// Returns true if an action was still pending.
    pub fn cancel(&self) -> bool {
        match lock(&self.pending).take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.pending)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for DebouncedTask {
    fn drop(&mut self) {
        if let Some(handle) = lock(&self.pending).take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/debounce_tests.rs"]
mod tests;
