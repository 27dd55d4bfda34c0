use crate::core::backoff::Cadence;
use crate::core::models::{FeedItem, StatusSnapshot};
use crate::core::notifications::Notifier;
use crate::daemon::scheduler::{SchedulerHandle, Wake};
use crate::feed::{FeedError, FeedSource};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

struct PollState {
    last_seen_id: Option<String>,
    cadence: Cadence,
}

/// The adaptive polling and change-detection engine.
///
/// One fetch-and-compare cycle runs per qualifying wake-up, guarded by an
/// atomic in-flight flag: a wake-up arriving while a fetch is outstanding
/// is dropped, never queued. The fetch is the only await inside a cycle
/// and the state mutex is never held across it.
pub struct PollEngine<S, N> {
    feed: S,
    notifier: N,
    scheduler: SchedulerHandle,
    state: Mutex<PollState>,
    in_flight: AtomicBool,
}

enum Observation {
    Baseline,
    Fresh { recovered: Option<Duration> },
    Unchanged,
}

impl<S: FeedSource, N: Notifier> PollEngine<S, N> {
    pub fn new(
        feed: S,
        notifier: N,
        scheduler: SchedulerHandle,
        base_interval: Duration,
        max_interval: Duration,
    ) -> Self {
        Self {
            feed,
            notifier,
            scheduler,
            state: Mutex::new(PollState {
                last_seen_id: None,
                cadence: Cadence::new(base_interval, max_interval),
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Read-only diagnostic view; never blocks on a running cycle.
    pub fn status(&self) -> StatusSnapshot {
        let state = self.state();
        StatusSnapshot {
            last_seen_id: state.last_seen_id.clone(),
            current_interval_secs: state.cadence.current().as_secs(),
            in_flight: self.in_flight.load(Ordering::SeqCst),
        }
    }

    /// Entry point for scheduler wake-ups; events for other timers are
    /// ignored.
    pub async fn on_wake(&self, wake: &Wake) {
        if &*wake.timer != self.scheduler.name() {
            tracing::trace!(timer = %wake.timer, "Ignoring wake-up for unrelated timer");
            return;
        }
        self.run_cycle().await;
    }

    /// One complete poll cycle: fetch, classify, react.
    pub async fn run_cycle(&self) {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::debug!("Skipping cycle, previous poll still in flight");
            return;
        };

        match self.feed.fetch_latest().await {
            Ok(items) => match items.first() {
                Some(newest) => self.observe(newest),
                None => tracing::debug!("Feed is empty"),
            },
            Err(FeedError::Throttled) => {
                let period = self.state().cadence.back_off();
                tracing::warn!(
                    next_interval_secs = period.as_secs(),
                    "Rate limited, backing off"
                );
                self.scheduler.arm(period);
            }
            Err(e @ (FeedError::Status(_) | FeedError::Transport(_))) => {
                tracing::error!(error = %e, "Feed request failed");
            }
            Err(e @ FeedError::Malformed(_)) => {
                tracing::error!(error = %e, "Invalid feed response");
            }
        }
    }

    fn observe(&self, newest: &FeedItem) {
        let observation = {
            let mut state = self.state();
            match state.last_seen_id.as_deref() {
                // The first observed item only establishes the baseline.
                None => {
                    state.last_seen_id = Some(newest.id.clone());
                    Observation::Baseline
                }
                Some(prev) if prev != newest.id => {
                    state.last_seen_id = Some(newest.id.clone());
                    let recovered = state
                        .cadence
                        .is_backed_off()
                        .then(|| state.cadence.recover());
                    Observation::Fresh { recovered }
                }
                Some(_) => Observation::Unchanged,
            }
        };

        match observation {
            Observation::Baseline => {
                tracing::info!(id = %newest.id, "Recorded baseline notification");
            }
            Observation::Unchanged => {
                tracing::debug!(id = %newest.id, "No new notifications");
            }
            Observation::Fresh { recovered } => {
                tracing::info!(id = %newest.id, "New notification detected");
                self.notifier.present(newest);
                if let Some(period) = recovered {
                    tracing::info!(
                        interval_secs = period.as_secs(),
                        "Fresh data while backed off, restoring base cadence"
                    );
                    self.scheduler.arm(period);
                }
            }
        }
    }

    fn state(&self) -> MutexGuard<'_, PollState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the in-flight flag on every exit path of a cycle, including a
/// panicking fetch.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
            .then_some(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
