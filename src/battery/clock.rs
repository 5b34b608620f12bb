use std::time::{Duration, Instant};

use super::CancellationToken;

/// Longest uninterrupted nap while waiting for the next tick
const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// Time source for the test loop
pub trait Clock {
    /// Monotonic time since an arbitrary origin
    fn now(&self) -> Duration;

    /// Wait for `period`, returning early if `cancel` fires
    fn sleep(&self, period: Duration, cancel: &CancellationToken);
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Clock whose origin is the moment of construction
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, period: Duration, cancel: &CancellationToken) {
        let deadline = Instant::now() + period;
        while !cancel.is_cancelled() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            std::thread::sleep(remaining.min(SLEEP_SLICE));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sleep_returns_early_when_cancelled() {
        let clock = SystemClock::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let before = clock.now();
        clock.sleep(Duration::from_secs(30), &cancel);
        assert!(clock.now() - before < Duration::from_secs(1));
    }

    #[test]
    fn test_sleep_waits_for_period() {
        let clock = SystemClock::new();
        let before = clock.now();
        clock.sleep(Duration::from_millis(150), &CancellationToken::new());
        assert!(clock.now() - before >= Duration::from_millis(150));
    }
}
