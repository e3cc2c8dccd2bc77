use log::{debug, warn};
use std::{fmt::Display, future::Future, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

/// A recurring action running on its own tokio task.
///
/// The first run happens one full interval after spawning. Failures of the
/// action are logged and the schedule keeps going.
pub struct ScheduledTask {
    name: String,
    interval: Duration,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    pub fn spawn<F, Fut, E>(name: &str, interval: Duration, mut action: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        // tokio intervals must not be zero
        let interval = interval.max(Duration::from_millis(1));
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task_name = name.to_owned();
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => (),
                }
                if let Err(err) = action().await {
                    warn!("Scheduled task {} failed: {}", task_name, err);
                }
            }
            debug!("Scheduled task {} stopped", task_name);
        });
        Self {
            name: name.to_owned(),
            interval,
            cancel,
            handle,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Stops future runs. A run already in progress completes.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Cancels and waits for the task to wind down.
    pub async fn shutdown(self) {
        self.cancel();
        if let Err(err) = self.handle.await {
            warn!("Scheduled task {} ended abnormally: {}", self.name, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn counting_task(counter: &Arc<AtomicUsize>, fail: bool) -> ScheduledTask {
        let counter = counter.clone();
        ScheduledTask::spawn("test", Duration::from_secs(10), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                if fail {
                    Err("transient failure")
                } else {
                    Ok(())
                }
            }
        })
    }

    #[tokio::test(start_paused = true)]
    async fn runs_once_per_interval() {
        let counter = Arc::new(AtomicUsize::new(0));
        let task = counting_task(&counter, false);
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        task.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failures_do_not_stop_the_schedule() {
        let counter = Arc::new(AtomicUsize::new(0));
        let task = counting_task(&counter, true);
        time::sleep(Duration::from_secs(45)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 4);
        task.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn no_runs_after_shutdown() {
        let counter = Arc::new(AtomicUsize::new(0));
        let task = counting_task(&counter, false);
        time::sleep(Duration::from_secs(15)).await;
        task.shutdown().await;
        time::sleep(Duration::from_secs(60)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_lets_a_running_action_finish() {
        let finished = Arc::new(AtomicUsize::new(0));
        let done = finished.clone();
        let task = ScheduledTask::spawn("slow", Duration::from_secs(1), move || {
            let done = done.clone();
            async move {
                time::sleep(Duration::from_secs(5)).await;
                done.fetch_add(1, Ordering::SeqCst);
                Ok::<(), String>(())
            }
        });
        time::sleep(Duration::from_secs(2)).await;
        task.cancel();
        task.shutdown().await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }
}
