//! Sliding-window request limiter for backends with published call quotas

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Limits a single backend to a number of requests per minute.
///
/// Owned by the backend that needs it; the evaluation core never throttles.
pub struct RateLimiter {
    requests_per_minute: u32,
    window: Duration,
    last_requests: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(requests_per_minute: u32) -> Self {
        Self::with_window(requests_per_minute, Duration::from_secs(60))
    }

    /// Create a limiter over a custom window length
    pub fn with_window(requests: u32, window: Duration) -> Self {
        Self {
            requests_per_minute: requests.max(1),
            window,
            last_requests: Mutex::new(VecDeque::new()),
        }
    }

    /// Limiter that lets one request through per `interval`
    pub fn spaced(interval: Duration) -> Self {
        Self::with_window(1, interval)
    }

    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Wait until a request may be sent, then record it
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut last = self.last_requests.lock().await;
                let now = Instant::now();
                self.evict_expired(&mut last, now);

                if last.len() < self.requests_per_minute as usize {
                    last.push_back(now);
                    return;
                }

                // at the limit: wait for the oldest request to leave the window
                match last.front() {
                    Some(&oldest) => {
                        self.window.saturating_sub(now.duration_since(oldest))
                            + Duration::from_millis(10)
                    }
                    None => Duration::from_millis(10),
                }
            };

            tracing::debug!("Rate limit reached, waiting {}ms", wait.as_millis());
            tokio::time::sleep(wait).await;
        }
    }

    /// Requests recorded inside the current window
    pub async fn in_window(&self) -> usize {
        let mut last = self.last_requests.lock().await;
        self.evict_expired(&mut last, Instant::now());
        last.len()
    }

    fn evict_expired(&self, last: &mut VecDeque<Instant>, now: Instant) {
        while let Some(&front) = last.front() {
            if now.duration_since(front) > self.window {
                last.pop_front();
            } else {
                break;
            }
        }
    }
}
