//! Request pacing against the external catalogue
//!
//! The catalogue penalizes bursty access, so the item loop waits a fixed
//! delay after every fetch attempt, success or failure alike. Not adaptive,
//! no backoff tiers.

use std::time::Duration;

/// Fixed inter-request delay
#[derive(Debug, Clone)]
pub struct RateLimiter {
    delay: Duration,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// Blocks the current task for the configured delay
    pub async fn wait(&self) {
        tokio::time::sleep(self.delay).await;
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_from_millis() {
        let limiter = RateLimiter::from_millis(1500);
        assert_eq!(limiter.delay(), Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_wait_blocks_for_delay() {
        let limiter = RateLimiter::from_millis(20);
        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(40));
    }
}
