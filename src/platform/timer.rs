//! Cancellable deferred actions on the local event loop
//!
//! Both timers spawn onto the current `LocalSet`, so they must be used from
//! inside `LocalSet::run_until` (or a task spawned on one). Dropping a timer
//! cancels whatever it still has pending.

use std::cell::RefCell;
use std::future::Future;
use std::time::Duration;

use tokio::task::{self, JoinHandle};

fn spawn_after<F>(delay: Duration, action: F) -> JoinHandle<()>
where
    F: FnOnce() + 'static,
{
    task::spawn_local(async move {
        tokio::time::sleep(delay).await;
        action();
    })
}

/// One-shot action that runs after a fixed delay unless cancelled
#[derive(Debug, Default)]
pub struct DeferredAction {
    handle: RefCell<Option<JoinHandle<()>>>,
}

impl DeferredAction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `action` after `delay`, replacing anything already scheduled
    pub fn schedule<F>(&self, delay: Duration, action: F)
    where
        F: FnOnce() + 'static,
    {
        self.cancel();
        *self.handle.borrow_mut() = Some(spawn_after(delay, action));
    }

    /// Schedules an arbitrary future, replacing anything already scheduled
    pub fn spawn<Fut>(&self, future: Fut)
    where
        Fut: Future<Output = ()> + 'static,
    {
        self.cancel();
        *self.handle.borrow_mut() = Some(task::spawn_local(future));
    }

    /// Cancels the pending action, returns true if one was still pending
    pub fn cancel(&self) -> bool {
        match self.handle.borrow_mut().take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// Returns true while an action is scheduled and has not completed
    pub fn is_pending(&self) -> bool {
        self.handle
            .borrow()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for DeferredAction {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Action that fires only after a quiet window with no re-arming
///
/// Every call to [`Debouncer::arm`] cancels the previous timer and starts a
/// new one, so the action runs once, `window` after the last arm.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    timer: DeferredAction,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            timer: DeferredAction::new(),
        }
    }

    /// Length of the quiet window
    pub fn window(&self) -> Duration {
        self.window
    }

    /// (Re)starts the quiet window with `action` as the pending action
    pub fn arm<F>(&self, action: F)
    where
        F: FnOnce() + 'static,
    {
        self.timer.schedule(self.window, action);
    }

    /// Cancels the pending action, returns true if one was still pending
    pub fn cancel(&self) -> bool {
        self.timer.cancel()
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_pending()
    }
}
