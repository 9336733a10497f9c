//! Periodic silent-refresh scheduling.
//!
//! The scheduler is owned by the session store and bound to the session's
//! lifetime: it starts when a session becomes authenticated and is stopped
//! synchronously on logout, so no tick can fire against a cleared session.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::store::SessionStore;

pub(crate) struct RefreshScheduler {
    shutdown: Arc<Notify>,
    handle: JoinHandle<()>,
}

impl RefreshScheduler {
    /// Spawn the repeating refresh task. Must run inside a tokio runtime.
    pub(crate) fn start(store: Weak<SessionStore>, period: Duration) -> Self {
        let shutdown = Arc::new(Notify::new());
        let shutdown_rx = Arc::clone(&shutdown);

        let handle = tokio::spawn(async move {
            let mut ticks = tokio::time::interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // interval fires immediately; the session was just refreshed or
            // restored, so consume the first tick.
            ticks.tick().await;

            tracing::debug!("refresh scheduler started (period {period:?})");

            loop {
                tokio::select! {
                    _ = shutdown_rx.notified() => break,
                    _ = ticks.tick() => {
                        let Some(store) = store.upgrade() else { break };
                        if !store.state().is_authenticated() {
                            continue;
                        }
                        // Failure handling (ignore vs. force-logout) is the
                        // store's concern; the scheduler only drives ticks.
                        let _ = store.silent_refresh().await;
                    }
                }
            }

            tracing::debug!("refresh scheduler stopped");
        });

        Self { shutdown, handle }
    }

    /// Stop the timer immediately; no tick fires after this returns.
    pub(crate) fn stop(&self) {
        self.shutdown.notify_one();
        self.handle.abort();
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
