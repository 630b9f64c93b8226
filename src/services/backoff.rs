use std::time::Duration;

/// Bounded exponential backoff: `base * 2^n` after the n-th failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub max_attempts: u32,
    pub base: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            base: Duration::from_secs(1),
        }
    }
}

impl BackoffPolicy {
    pub fn new(max_attempts: u32, base: Duration) -> Self {
        Self { max_attempts, base }
    }

    /// Delay to sleep after the 0-indexed `attempt` failed.
    ///
    /// `None` once no attempts remain, so the last failure is reported without waiting.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt.saturating_add(1) >= self.max_attempts {
            return None;
        }
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        Some(self.base.saturating_mul(factor))
    }
}
