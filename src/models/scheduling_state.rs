use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_EASINESS: f64 = 2.5;
pub const MINIMUM_EASINESS: f64 = 1.3;

/// Per-card SM-2 scheduling data. Replaced wholesale by the scheduler on every review.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SchedulingState {
    pub repetitions: u32,
    pub easiness_factor: f64,
    pub interval_days: u32,
    pub next_review_at: DateTime<Utc>,
}

impl SchedulingState {
    /// State of a freshly created card: due immediately.
    pub fn new_card(now: DateTime<Utc>) -> Self {
        Self {
            repetitions: 0,
            easiness_factor: DEFAULT_EASINESS,
            interval_days: 1,
            next_review_at: now,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at <= now
    }

    /// Cards in their first two successful repetitions still use fixed intervals.
    pub fn is_learning(&self) -> bool {
        self.repetitions < 2
    }
}
