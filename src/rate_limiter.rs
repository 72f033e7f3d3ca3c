use std::collections::VecDeque;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// The request may proceed and has been recorded
    Allow,
    /// The window is full; nothing was recorded
    Deny {
        /// Time until the oldest recorded request leaves the window
        retry_after: Duration,
    },
}

/// Sliding window log rate limiter, keyed by client
///
/// A request is admitted while fewer than `max_requests` of the client's recorded
/// instants fall inside the trailing window. Expired instants are pruned whenever
/// the key is checked or swept.
pub struct RateLimiter {
    window: Duration,
    max_requests: usize,
    history: DashMap<String, VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            window,
            max_requests,
            history: DashMap::new(),
        }
    }

    /// Decide whether the client identified by `key` may proceed
    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        // The entry guard holds the shard lock until the decision is recorded
        let mut history = self.history.entry(key.to_owned()).or_default();
        prune(&mut history, now, self.window);

        if history.len() >= self.max_requests {
            let retry_after = history.front().map_or(self.window, |oldest| {
                (*oldest + self.window).saturating_duration_since(now)
            });
            return RateLimitDecision::Deny { retry_after };
        }

        history.push_back(now);
        RateLimitDecision::Allow
    }

    /// Drop the keys with no request left inside the window, returning how many were dropped
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    fn sweep_at(&self, now: Instant) -> usize {
        let mut dropped = 0;
        self.history.retain(|_, history| {
            prune(history, now, self.window);
            let idle = history.is_empty();
            dropped += usize::from(idle);
            !idle
        });
        dropped
    }

    /// Number of client keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.history.len()
    }

    pub const fn window(&self) -> Duration {
        self.window
    }

    pub const fn max_requests(&self) -> usize {
        self.max_requests
    }
}

/// Remove the instants older than `now - window` from the front of the log
fn prune(history: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while history
        .front()
        .is_some_and(|t| now.saturating_duration_since(*t) > window)
    {
        history.pop_front();
    }
}
