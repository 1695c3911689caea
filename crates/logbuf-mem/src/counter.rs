//! Checkout accounting and the polling drain wait.
//!
//! All state is atomic; nothing here takes a lock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Upper bound on how long a drain waiter sleeps between checks.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Default)]
pub struct ActiveCounter {
    active: AtomicUsize,
    waiting: AtomicUsize,
    peak: AtomicUsize,
}

impl ActiveCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages obtained and not yet returned.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Threads currently inside [`ActiveCounter::wait_until_zero`].
    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::Acquire)
    }

    /// Highest `active` value observed so far.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Relaxed)
    }

    pub fn checkout(&self) {
        let now = self.active.fetch_add(1, Ordering::AcqRel) + 1;
        self.record_peak(now);
    }

    /// Saturates at zero so a stray extra return cannot wrap the counter.
    pub fn checkin(&self) {
        let _ = self
            .active
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
    }

    /// Block until `active` reaches zero or `deadline` passes (`None` waits
    /// forever). Sleeps in steps of at most [`POLL_INTERVAL`].
    pub fn wait_until_zero(&self, deadline: Option<Instant>) -> bool {
        if self.active() == 0 {
            return true;
        }

        let _waiting = WaitingGuard::enter(&self.waiting);
        loop {
            if self.active() == 0 {
                return true;
            }
            let nap = match deadline {
                Some(d) => {
                    let now = Instant::now();
                    if now >= d {
                        return false;
                    }
                    (d - now).min(POLL_INTERVAL)
                }
                None => POLL_INTERVAL,
            };
            thread::sleep(nap);
        }
    }

    fn record_peak(&self, active: usize) {
        let mut cur = self.peak.load(Ordering::Relaxed);
        while active > cur {
            match self
                .peak
                .compare_exchange(cur, active, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => break,
                Err(observed) => cur = observed,
            }
        }
    }
}

/// Keeps the waiter count balanced on every exit path, panics included.
struct WaitingGuard<'a> {
    waiting: &'a AtomicUsize,
}

impl<'a> WaitingGuard<'a> {
    fn enter(waiting: &'a AtomicUsize) -> Self {
        waiting.fetch_add(1, Ordering::AcqRel);
        Self { waiting }
    }
}

impl Drop for WaitingGuard<'_> {
    fn drop(&mut self) {
        self.waiting.fetch_sub(1, Ordering::AcqRel);
    }
}
