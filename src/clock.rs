//! Sources of "now" for scheduling.
//!
//! `SimulatedClock` lets a session jump forward a day at a time, so spaced
//! repetition can be exercised without waiting for the calendar.

use chrono::{DateTime, Duration, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SimulatedClock {
    current: DateTime<Utc>,
}

impl SimulatedClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { current: start }
    }

    /// Advances the clock by 24 hours.
    pub fn advance_day(&mut self) {
        self.advance_days(1);
    }

    pub fn advance_days(&mut self, days: u32) {
        self.current += Duration::days(i64::from(days));
    }
}

impl Clock for SimulatedClock {
    fn now(&self) -> DateTime<Utc> {
        self.current
    }
}
