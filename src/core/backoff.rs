use std::time::Duration;

/// Polling cadence with geometric backoff under throttling.
///
/// The interval starts at `base`, doubles on every throttled cycle, and is
/// clamped to `max`. Recovery snaps straight back to `base`; it is only
/// triggered by a confirmed fresh item, never by elapsed time.
#[derive(Debug, Clone)]
pub struct Cadence {
    base: Duration,
    max: Duration,
    current: Duration,
}

impl Cadence {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max: max.max(base),
            current: base,
        }
    }

    pub fn current(&self) -> Duration {
        self.current
    }

    pub fn is_backed_off(&self) -> bool {
        self.current > self.base
    }

    /// Doubles the interval (saturating at the ceiling) and returns the
    /// new period to re-arm the scheduler with.
    pub fn back_off(&mut self) -> Duration {
        let doubled = self.current.as_secs().saturating_mul(2);
        self.current = Duration::from_secs(doubled).min(self.max);
        self.current
    }

    /// Resets the interval to base and returns it.
    pub fn recover(&mut self) -> Duration {
        self.current = self.base;
        self.current
    }
}
