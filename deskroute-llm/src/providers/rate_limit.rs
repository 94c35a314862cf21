//! Client-side request throttling shared by the HTTP adapters

use crate::providers::request_failed;
use deskroute_core::DeskResult;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Semaphore, SemaphorePermit};

/// Caps concurrent requests and spaces them by a minimum interval.
#[derive(Debug)]
pub struct RateLimiter {
    provider: &'static str,
    permits: Arc<Semaphore>,
    /// Milliseconds since `start_time` plus one; zero means no request yet.
    last_request: AtomicU64,
    min_request_interval_ms: u64,
    start_time: Instant,
}

impl RateLimiter {
    pub fn new(provider: &'static str, requests_per_minute: u32) -> Self {
        let rpm = requests_per_minute.max(1);
        Self {
            provider,
            permits: Arc::new(Semaphore::new(rpm as usize)),
            last_request: AtomicU64::new(0),
            min_request_interval_ms: (60_000 / rpm as u64).max(10),
            start_time: Instant::now(),
        }
    }

    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }

    /// Wait for a permit and the minimum interval. Hold the permit for the
    /// duration of the request.
    pub async fn acquire(&self) -> DeskResult<SemaphorePermit<'_>> {
        let permit = self.permits.acquire().await.map_err(|e| {
            request_failed(self.provider, 0, format!("Rate limiter error: {}", e))
        })?;

        let last = self.last_request.load(Ordering::Relaxed);
        if last != 0 {
            let elapsed = self.now_stamp().saturating_sub(last);
            if elapsed < self.min_request_interval_ms {
                let wait_ms = self.min_request_interval_ms - elapsed;
                tokio::time::sleep(Duration::from_millis(wait_ms)).await;
            }
        }

        self.last_request.store(self.now_stamp(), Ordering::Relaxed);
        Ok(permit)
    }

    fn now_stamp(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64 + 1
    }
}
