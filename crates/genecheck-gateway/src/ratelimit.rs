//! Per-upstream token-bucket rate limiter

use crate::config::BucketConfig;
use crate::error::GatewayError;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

struct Bucket {
    tokens: f64,
    last_refill: Instant,
    capacity: f64,
    refill_per_sec: f64,
}

impl Bucket {
    fn new(config: BucketConfig) -> Self {
        Self {
            tokens: config.capacity as f64,
            last_refill: Instant::now(),
            capacity: config.capacity as f64,
            refill_per_sec: config.refill_per_sec,
        }
    }

    /// Refill from elapsed wall-clock time, then try to take one token.
    /// On failure returns the wait until the next token becomes available.
    fn try_take(&mut self) -> Result<(), Duration> {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        self.last_refill = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            let deficit = 1.0 - self.tokens;
            Err(Duration::from_secs_f64(deficit / self.refill_per_sec))
        }
    }
}

/// Per-upstream token-bucket rate limiter
///
/// Refill is computed lazily at acquisition time from elapsed wall-clock
/// time; there is no background timer. Buckets are created on first use from
/// the per-upstream settings handed in at construction.
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, Bucket>>,
    bucket_config: Box<dyn Fn(&str) -> BucketConfig + Send + Sync>,
    max_wait: Duration,
}

impl RateLimiter {
    /// Create a limiter where every upstream uses the same bucket settings
    pub fn uniform(config: BucketConfig, max_wait: Duration) -> Self {
        Self::new(move |_| config, max_wait)
    }

    /// Create a limiter with per-upstream bucket settings
    pub fn new(
        bucket_config: impl Fn(&str) -> BucketConfig + Send + Sync + 'static,
        max_wait: Duration,
    ) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            bucket_config: Box::new(bucket_config),
            max_wait,
        }
    }

    /// Try to take one token without waiting
    ///
    /// On failure returns the suggested wait until a token is available.
    pub fn try_acquire(&self, upstream: &str) -> Result<(), Duration> {
        let mut buckets = self.buckets.lock().unwrap();
        let bucket = buckets
            .entry(upstream.to_string())
            .or_insert_with(|| Bucket::new((self.bucket_config)(upstream)));
        bucket.try_take()
    }

    /// Acquire one token for the upstream, waiting up to the configured bound
    ///
    /// Fails with [`GatewayError::RateLimited`] if no token becomes available
    /// within the bound. Waiting is a cancellation point: dropping the future
    /// releases nothing and corrupts nothing, since the token was never taken.
    pub async fn acquire(&self, upstream: &str) -> Result<(), GatewayError> {
        let deadline = Instant::now() + self.max_wait;

        loop {
            match self.try_acquire(upstream) {
                Ok(()) => return Ok(()),
                Err(wait_hint) => {
                    let now = Instant::now();
                    if now >= deadline {
                        debug!("rate limit wait bound exhausted for '{}'", upstream);
                        return Err(GatewayError::RateLimited(upstream.to_string()));
                    }
                    let remaining = deadline.duration_since(now);
                    tokio::time::sleep(wait_hint.min(remaining)).await;
                }
            }
        }
    }
}
