//! Per-session sliding-window rate limiter.
//!
//! A precise sliding window keyed by session id: a FIFO timestamp queue
//! per key, pruned on every check.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use uuid::Uuid;

const WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub limit: u32,
    pub retry_after: Duration,
}

pub struct RateLimiter {
    max_requests_per_minute: u32,
    history: DashMap<Uuid, Mutex<VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_requests_per_minute: u32) -> Self {
        Self {
            max_requests_per_minute,
            history: DashMap::new(),
        }
    }

    /// Admission check for `session_id`. Unknown sessions start with empty
    /// history (cold start). Holds exclusive access to this session's queue
    /// for the duration of the prune+decide step.
    pub fn check(&self, session_id: Uuid) -> RateLimitDecision {
        let now = Instant::now();
        let limit = self.max_requests_per_minute;

        let entry = self
            .history
            .entry(session_id)
            .or_insert_with(|| Mutex::new(VecDeque::new()));
        let mut queue = entry.lock();

        while let Some(&oldest) = queue.front() {
            if now.duration_since(oldest) >= WINDOW {
                queue.pop_front();
            } else {
                break;
            }
        }

        if queue.len() as u32 >= limit {
            let oldest = *queue.front().expect("non-empty when at limit");
            let retry_after = (oldest + WINDOW)
                .checked_duration_since(now)
                .unwrap_or(Duration::from_secs(1))
                .max(Duration::from_secs(1));
            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                limit,
                retry_after,
            };
        }

        queue.push_back(now);
        let remaining = limit - queue.len() as u32;
        RateLimitDecision {
            allowed: true,
            remaining,
            limit,
            retry_after: Duration::ZERO,
        }
    }
}
