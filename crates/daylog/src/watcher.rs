//! Background daily rotation.
//!
//! Each production logger gets one watcher thread driving a small
//! current-thread tokio runtime, so rotation works whether or not the host
//! application runs tokio itself.

use chrono::Local;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::error::{LoggerError, Result};
use crate::logger::Shared;

/// Default interval between date checks.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Handle to a running rotation loop.
///
/// Dropping the handle stops the loop and joins its thread.
#[derive(Debug)]
pub struct RotationWatcher {
    stop_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl RotationWatcher {
    pub(crate) fn spawn(shared: Arc<Shared>, period: Duration) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(LoggerError::Watcher)?;
        let (stop_tx, stop_rx) = watch::channel(false);

        let handle = thread::Builder::new()
            .name(format!("daylog-rotation-{}", shared.category()))
            .spawn(move || runtime.block_on(run(shared, period, stop_rx)))
            .map_err(LoggerError::Watcher)?;

        Ok(Self {
            stop_tx,
            handle: Some(handle),
        })
    }

    /// Signal the loop to exit and wait for it.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.stop_tx.send(true);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for RotationWatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run(shared: Arc<Shared>, period: Duration, mut stop_rx: watch::Receiver<bool>) {
    shared.in_scope(|| {
        tracing::debug!(
            every = ?period,
            path = %shared.path().display(),
            "rotation watcher started"
        )
    });

    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => check(&shared),
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
            }
        }
    }

    shared.in_scope(|| tracing::debug!("rotation watcher stopped"));
}

fn check(shared: &Shared) {
    let today = Local::now().date_naive();
    if let Err(e) = shared.rotate_if_needed(today) {
        // the stored date is unchanged, so the next tick retries
        shared.in_scope(|| {
            tracing::warn!(error = %e, "log rotation failed, keeping current file")
        });
    }
}
