//! Wall clock and interruptible sleep.
//!
//! The monitor never calls `thread::sleep` or `Utc::now` directly; it goes
//! through a `Clock` so tests can script time and shutdown can cut a nap short.
use chrono::Utc;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::debug;
use std::thread;
use std::time::Duration;

/// Time source used by the monitor loop.
pub trait Clock {
    /// Current wall-clock time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;

    /// Block for `duration`. Returns `false` when shutdown was requested
    /// during (or before) the wait.
    fn sleep(&self, duration: Duration) -> bool;
}

/// System clock whose sleeps wake up early on a shutdown signal.
pub struct SystemClock {
    shutdown_rx: Receiver<()>,
}

impl SystemClock {
    /// Create a clock that listens for shutdown on `shutdown_rx`.
    pub fn new(shutdown_rx: Receiver<()>) -> Self {
        Self { shutdown_rx }
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn sleep(&self, duration: Duration) -> bool {
        match self.shutdown_rx.recv_timeout(duration) {
            Ok(()) => false,
            Err(RecvTimeoutError::Timeout) => true,
            Err(RecvTimeoutError::Disconnected) => {
                // Nobody can signal shutdown any more.
                debug!("Shutdown channel closed, falling back to plain sleep");
                thread::sleep(duration);
                true
            }
        }
    }
}
