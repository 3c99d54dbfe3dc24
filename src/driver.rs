use std::time::{Duration, Instant};

/// Fixed-interval tick scheduler.
///
/// The app loop asks `poll` whether a tick is due; the returned elapsed
/// time is measured from the previous tick, so velocity integration stays
/// correct when the loop wakes late.
#[derive(Debug)]
pub struct TickDriver {
    interval: Duration,
    last_tick: Option<Instant>,
    next_due: Option<Instant>,
}

impl TickDriver {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: None,
            next_due: None,
        }
    }

    /// Schedules the first tick one interval from `now`.
    pub fn arm(&mut self, now: Instant) {
        self.last_tick = Some(now);
        self.next_due = Some(now + self.interval);
    }

    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Milliseconds elapsed since the previous tick, if one is due.
    pub fn poll(&mut self, now: Instant) -> Option<f32> {
        let due = self.next_due?;
        if now < due {
            return None;
        }

        let elapsed = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(self.interval);
        self.last_tick = Some(now);
        self.next_due = Some(now + self.interval);

        Some(elapsed.as_secs_f32() * 1000.0)
    }

    /// How long the caller may block before the next tick. Disarmed drivers
    /// report one interval so input keeps being polled.
    pub fn time_until_due(&self, now: Instant) -> Duration {
        match self.next_due {
            Some(due) => due.saturating_duration_since(now),
            None => self.interval,
        }
    }
}
