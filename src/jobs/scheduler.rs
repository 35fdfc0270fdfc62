use futures::future::BoxFuture;
use std::time::Duration;
use tokio::task::AbortHandle;
use tokio::time::{sleep_until, Instant};

/// Runs a deferred action once after a delay.
///
/// The deadline is fixed when `schedule` is called, not when the returned
/// task is first polled.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, action: BoxFuture<'static, ()>) -> AbortHandle;
}

/// Spawns one tokio task per scheduled action.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, action: BoxFuture<'static, ()>) -> AbortHandle {
        let deadline = Instant::now() + delay;
        tokio::spawn(async move {
            sleep_until(deadline).await;
            action.await;
        })
        .abort_handle()
    }
}
