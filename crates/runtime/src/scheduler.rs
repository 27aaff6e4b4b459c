//! Cancellable delayed and repeating tasks.
//!
//! A [`TaskHandle`] pairs a spawned tokio task with a [`CancellationToken`].
//! Cancelling (or dropping the handle) guarantees the task body does not start
//! another iteration; work already posted elsewhere by the task must be
//! filtered by the receiver.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Owner of one scheduled task. Dropping the handle cancels the task.
#[derive(Debug)]
pub struct TaskHandle {
    token: CancellationToken,
    join: JoinHandle<()>,
}

impl TaskHandle {
    /// Runs `task` once after `delay` unless cancelled first.
    pub fn once<F>(delay: Duration, task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let child = token.clone();
        let join = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = child.cancelled() => {
                    trace!("delayed task cancelled before firing");
                }
                _ = time::sleep(delay) => task.await,
            }
        });
        Self { token, join }
    }

    /// Calls `tick` every `interval`, first after one full interval.
    ///
    /// The loop stops when cancelled or when `tick` resolves to `false`.
    pub fn repeating<F, Fut>(interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let token = CancellationToken::new();
        let child = token.clone();
        let join = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = child.cancelled() => break,
                    _ = ticker.tick() => {
                        if !tick().await {
                            break;
                        }
                    }
                }
            }
            trace!("repeating task stopped");
        });
        Self { token, join }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn once_fires_after_delay() {
        let fired = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&fired);
        let handle = TaskHandle::once(Duration::from_millis(1500), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        time::sleep(Duration::from_millis(1499)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_cancels() {
        let fired = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&fired);
        let handle = TaskHandle::once(Duration::from_millis(100), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        drop(handle);

        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn repeating_ticks_until_cancelled() {
        let ticks = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&ticks);
        let handle = TaskHandle::repeating(Duration::from_millis(400), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            }
        });

        time::sleep(Duration::from_millis(1300)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);

        handle.cancel();
        time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn repeating_stops_when_tick_declines() {
        let handle = TaskHandle::repeating(Duration::from_millis(10), || async { false });
        time::sleep(Duration::from_millis(50)).await;
        assert!(handle.is_finished());
    }
}
