//! Per-client sliding-window rate limiter.
//!
//! Each client keeps the instants of its recently admitted requests. The
//! count is approximate at window edges, and windows for clients that stop
//! calling are never dropped.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

pub struct RateLimiter {
    windows: Mutex<HashMap<String, VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            max_requests,
            window,
        }
    }

    /// Returns `true` if the request is admitted. Denied attempts are not
    /// recorded, so a client that keeps retrying is not locked out forever.
    pub fn check_and_record(&self, client_id: &str) -> bool {
        self.check_and_record_at(client_id, Instant::now())
    }

    fn check_and_record_at(&self, client_id: &str, now: Instant) -> bool {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let log = windows.entry(client_id.to_string()).or_default();

        while log
            .front()
            .is_some_and(|&t| now.saturating_duration_since(t) >= self.window)
        {
            log.pop_front();
        }

        if log.len() >= self.max_requests {
            debug!(
                client = client_id,
                recent = log.len(),
                "rate limit reached"
            );
            return false;
        }

        log.push_back(now);
        true
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.windows.lock().unwrap().len()
    }
}
