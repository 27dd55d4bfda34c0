use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, MissedTickBehavior};

/// A wake-up event, tagged with the name of the timer that fired so
/// consumers can ignore wake-ups that are not theirs.
#[derive(Debug, Clone)]
pub struct Wake {
    pub timer: Arc<str>,
}

/// A single named recurring timer on the tokio runtime. Wake-ups are
/// delivered over the provided channel; re-arming replaces the period of
/// the one running timer task, so there are never two concurrent timers
/// for the same name. Ticks missed under load are skipped, not replayed.
pub struct Scheduler {
    task: tokio::task::JoinHandle<()>,
}

#[derive(Clone)]
pub struct SchedulerHandle {
    name: Arc<str>,
    period_tx: watch::Sender<Duration>,
}

impl Scheduler {
    pub fn spawn(
        name: &str,
        period: Duration,
        wake_tx: mpsc::UnboundedSender<Wake>,
    ) -> (Self, SchedulerHandle) {
        let name: Arc<str> = Arc::from(name);
        let (period_tx, period_rx) = watch::channel(period);

        tracing::info!(timer = %name, period_secs = period.as_secs(), "Timer armed");
        let task = tokio::spawn(run_timer(Arc::clone(&name), period_rx, wake_tx));

        (Self { task }, SchedulerHandle { name, period_tx })
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl SchedulerHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Re-arms the timer at a new period. The next wake-up fires one full
    /// period from now; any previously pending tick is discarded.
    pub fn arm(&self, period: Duration) {
        if self.period_tx.send(period).is_ok() {
            tracing::info!(timer = %self.name, period_secs = period.as_secs(), "Timer re-armed");
        } else {
            tracing::warn!(timer = %self.name, "Scheduler task is gone, arm request dropped");
        }
    }

    #[cfg(test)]
    pub(crate) fn detached(name: &str) -> (Self, watch::Receiver<Duration>) {
        let (period_tx, period_rx) = watch::channel(Duration::ZERO);
        (
            Self {
                name: Arc::from(name),
                period_tx,
            },
            period_rx,
        )
    }
}

async fn run_timer(
    name: Arc<str>,
    mut period_rx: watch::Receiver<Duration>,
    wake_tx: mpsc::UnboundedSender<Wake>,
) {
    loop {
        let period = *period_rx.borrow_and_update();
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if wake_tx.send(Wake { timer: Arc::clone(&name) }).is_err() {
                        return;
                    }
                }
                changed = period_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_wakes_carry_timer_name_at_period() {
        let (wake_tx, mut wake_rx) = mpsc::unbounded_channel();
        let (_scheduler, _handle) =
            Scheduler::spawn("orynth-poll", Duration::from_secs(3), wake_tx);

        let start = Instant::now();

        let wake = wake_rx.recv().await.unwrap();
        assert_eq!(&*wake.timer, "orynth-poll");
        assert_eq!(start.elapsed(), Duration::from_secs(3));

        wake_rx.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_arm_replaces_period() {
        let (wake_tx, mut wake_rx) = mpsc::unbounded_channel();
        let (_scheduler, handle) = Scheduler::spawn("orynth-poll", Duration::from_secs(3), wake_tx);

        wake_rx.recv().await.unwrap();

        let rearmed_at = Instant::now();
        handle.arm(Duration::from_secs(10));

        wake_rx.recv().await.unwrap();
        assert_eq!(rearmed_at.elapsed(), Duration::from_secs(10));

        wake_rx.recv().await.unwrap();
        assert_eq!(rearmed_at.elapsed(), Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_stops_when_receiver_dropped() {
        let (wake_tx, wake_rx) = mpsc::unbounded_channel();
        let (_scheduler, handle) = Scheduler::spawn("orynth-poll", Duration::from_secs(1), wake_tx);

        drop(wake_rx);
        time::sleep(Duration::from_secs(5)).await;

        // Arming after the consumer is gone must not panic.
        handle.arm(Duration::from_secs(2));
    }
}
