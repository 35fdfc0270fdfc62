use chrono::{DateTime, Utc};
use tokio::time::Instant;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time that advances with the tokio clock.
///
/// The wall time is sampled once and then moved forward by the monotonic
/// tokio instant, so timestamps never go backwards and follow paused time in
/// tests.
#[derive(Debug, Clone)]
pub struct TokioClock {
    wall_base: DateTime<Utc>,
    instant_base: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            wall_base: Utc::now(),
            instant_base: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = Instant::now().saturating_duration_since(self.instant_base);
        let elapsed =
            chrono::Duration::from_std(elapsed).unwrap_or_else(|_| chrono::Duration::zero());
        self.wall_base + elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_follows_paused_time() {
        let clock = TokioClock::new();
        let before = clock.now();

        tokio::time::advance(Duration::from_secs(10)).await;

        let after = clock.now();
        assert_eq!(after - before, chrono::Duration::seconds(10));
    }
}
