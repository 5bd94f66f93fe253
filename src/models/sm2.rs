//! SM-2 (SuperMemo 2) spaced repetition algorithm implementation.
//!
//! The SM-2 algorithm calculates review intervals based on recall quality:
//! - Each card has an easiness factor (EF) that adjusts based on performance
//! - Quality grades 0-2: Reset repetitions, review again after one day
//! - Quality grades 3-5: Increase interval progressively (1 day → 6 days → EF multiplier)
//! - EF is adjusted after each review and has a minimum value of 1.3
//! - The multiplier step uses the EF produced by the same review
//!
//! Scheduling is a pure computation: it returns a new state and never
//! touches a store. Persisting the result is up to the caller.

use super::scheduling_state::MINIMUM_EASINESS;
use super::{Quality, SchedulingState};
use crate::clock::Clock;
use crate::config::{IntervalScaling, Sm2Config};
use crate::error::SchedulerError;
use chrono::{DateTime, Duration, Utc};

/// Calculates the next scheduling state with the default SM-2 constants.
pub fn calculate_next_review(
    state: &SchedulingState,
    quality: Quality,
    now: DateTime<Utc>,
) -> SchedulingState {
    Scheduler::default().next_state(state, quality, now)
}

/// New easiness factor after a review, never below `minimum` nor below 1.3.
pub fn updated_easiness(easiness: f64, quality: Quality, minimum: f64) -> f64 {
    let q = f64::from(quality.value());
    let ef = easiness + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02));
    // f64::max also maps a NaN input onto the floor
    ef.max(floor(minimum))
}

/// Configured floor, raised to the SM-2 minimum when lower or NaN.
fn floor(minimum: f64) -> f64 {
    minimum.max(MINIMUM_EASINESS)
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    config: Sm2Config,
}

impl Scheduler {
    pub fn new(config: Sm2Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Sm2Config {
        &self.config
    }

    /// Scheduling state for a card created at `now`.
    pub fn initial_state(&self, now: DateTime<Utc>) -> SchedulingState {
        SchedulingState {
            easiness_factor: self.config.initial_easiness.max(floor(self.config.minimum_easiness)),
            ..SchedulingState::new_card(now)
        }
    }

    /// Validates a raw quality rating, then schedules.
    pub fn review(
        &self,
        state: &SchedulingState,
        quality: i64,
        now: DateTime<Utc>,
    ) -> Result<SchedulingState, SchedulerError> {
        let quality = Quality::new(quality)?;
        Ok(self.next_state(state, quality, now))
    }

    /// Like [`Scheduler::review`], with the review instant taken from `clock`.
    pub fn review_at(
        &self,
        state: &SchedulingState,
        quality: i64,
        clock: &impl Clock,
    ) -> Result<SchedulingState, SchedulerError> {
        self.review(state, quality, clock.now())
    }

    pub fn next_state(
        &self,
        state: &SchedulingState,
        quality: Quality,
        now: DateTime<Utc>,
    ) -> SchedulingState {
        let minimum = floor(self.config.minimum_easiness);
        let new_ef = updated_easiness(state.easiness_factor, quality, minimum);

        let (interval_days, repetitions) = if !quality.is_passing() {
            // Failed recall: start from the beginning
            (self.config.lapse_interval_days, 0)
        } else {
            let interval = match state.repetitions {
                0 => self.config.first_interval_days,
                1 => self.config.second_interval_days,
                _ => {
                    let factor = match self.config.interval_scaling {
                        IntervalScaling::UpdatedEasiness => new_ef,
                        IntervalScaling::PreviousEasiness => state.easiness_factor.max(minimum),
                    };
                    scale_interval(state.interval_days, factor)
                }
            };
            (interval, state.repetitions.saturating_add(1))
        };
        let interval_days = interval_days.max(1);

        SchedulingState {
            repetitions,
            easiness_factor: new_ef,
            interval_days,
            next_review_at: add_days(now, interval_days),
        }
    }
}

/// `round(interval * factor)`, rounding half away from zero.
fn scale_interval(interval_days: u32, factor: f64) -> u32 {
    // float-to-int `as` saturates, so huge products stay at u32::MAX
    ((f64::from(interval_days) * factor).round() as u32).max(1)
}

fn add_days(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SimulatedClock;
    use chrono::TimeZone;

    const EPS: f64 = 1e-9;

    fn q(value: i64) -> Quality {
        Quality::new(value).unwrap()
    }

    fn state(repetitions: u32, easiness_factor: f64, interval_days: u32) -> SchedulingState {
        SchedulingState {
            repetitions,
            easiness_factor,
            interval_days,
            next_review_at: Utc::now(),
        }
    }

    #[test]
    fn test_first_review() {
        let next = calculate_next_review(&state(0, 2.5, 1), q(4), Utc::now());
        assert_eq!(next.interval_days, 1);
        assert_eq!(next.repetitions, 1);
    }

    #[test]
    fn test_second_review() {
        let next = calculate_next_review(&state(1, 2.5, 1), q(4), Utc::now());
        assert_eq!(next.interval_days, 6);
        assert_eq!(next.repetitions, 2);
    }

    #[test]
    fn test_quality_below_3_resets() {
        let next = calculate_next_review(&state(5, 2.5, 10), q(2), Utc::now());
        assert_eq!(next.interval_days, 1);
        assert_eq!(next.repetitions, 0);
        // EF should still be updated
        assert!(next.easiness_factor < 2.5);
    }

    #[test]
    fn test_failure_reset_for_every_failing_grade() {
        for grade in 0..3 {
            for reps in [0, 1, 2, 7] {
                let next = calculate_next_review(&state(reps, 2.1, 40), q(grade), Utc::now());
                assert_eq!(next.repetitions, 0);
                assert_eq!(next.interval_days, 1);
            }
        }
    }

    #[test]
    fn test_ef_floor() {
        let next = calculate_next_review(&state(1, 1.3, 1), q(0), Utc::now());
        assert_eq!(next.easiness_factor, 1.3);
    }

    #[test]
    fn test_floor_and_positivity_for_all_grades() {
        let starts = [
            state(0, 2.5, 1),
            state(1, 1.3, 1),
            state(2, 1.31, 1),
            state(9, 3.7, 250),
            state(3, 1.0, 0),
            state(4, f64::NAN, 5),
        ];
        for start in &starts {
            for grade in 0..=5 {
                let now = Utc::now();
                let next = calculate_next_review(start, q(grade), now);
                assert!(next.easiness_factor >= 1.3);
                assert!(next.interval_days >= 1);
                assert!(next.next_review_at > now);
            }
        }
    }

    #[test]
    fn test_easiness_delta_per_grade() {
        let deltas = [(0, -0.8), (1, -0.54), (2, -0.32), (3, -0.14), (4, 0.0), (5, 0.1)];
        for (grade, delta) in deltas {
            let ef = updated_easiness(2.5, q(grade), 1.3);
            assert!((ef - (2.5 + delta)).abs() < EPS, "grade {grade}: {ef}");
        }
    }

    #[test]
    fn test_learning_ramp_with_perfect_grades() {
        let now = Utc::now();

        let first = calculate_next_review(&SchedulingState::new_card(now), q(5), now);
        assert_eq!((first.repetitions, first.interval_days), (1, 1));

        let second = calculate_next_review(&first, q(5), now);
        assert_eq!((second.repetitions, second.interval_days), (2, 6));

        let third = calculate_next_review(&second, q(5), now);
        assert!((third.easiness_factor - 2.8).abs() < EPS);
        assert_eq!((third.repetitions, third.interval_days), (3, 17));
    }

    #[test]
    fn test_scaling_uses_updated_easiness() {
        // 10 * 2.36 = 23.6 with the new EF; 10 * 2.5 = 25 with the old one
        let next = calculate_next_review(&state(3, 2.5, 10), q(3), Utc::now());
        assert_eq!(next.interval_days, 24);
    }

    #[test]
    fn test_scaling_with_previous_easiness() {
        let scheduler = Scheduler::new(Sm2Config {
            interval_scaling: IntervalScaling::PreviousEasiness,
            ..Sm2Config::default()
        });
        let next = scheduler.next_state(&state(3, 2.5, 10), q(3), Utc::now());
        assert_eq!(next.interval_days, 25);
        assert!((next.easiness_factor - 2.36).abs() < EPS);
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        // 5 * 2.5 = 12.5 exactly, EF unchanged for grade 4
        let next = calculate_next_review(&state(2, 2.5, 5), q(4), Utc::now());
        assert_eq!(next.interval_days, 13);
    }

    #[test]
    fn test_deterministic_for_identical_inputs() {
        let now = Utc::now();
        let start = state(6, 2.17, 33);

        let a = calculate_next_review(&start, q(4), now);
        let b = calculate_next_review(&start, q(4), now);
        assert_eq!(a, b);
        assert_eq!(a.easiness_factor.to_bits(), b.easiness_factor.to_bits());
    }

    #[test]
    fn test_perfect_grades_never_lower_easiness() {
        let now = Utc::now();
        let mut current = SchedulingState::new_card(now);
        for _ in 0..20 {
            let next = calculate_next_review(&current, q(5), now);
            assert!(next.easiness_factor >= current.easiness_factor);
            assert!(next.interval_days >= current.interval_days);
            current = next;
        }
    }

    #[test]
    fn test_lapse_then_recover() {
        let now = Utc::now();
        let lapsed = calculate_next_review(&state(4, 2.3, 20), q(2), now);
        assert_eq!(lapsed.repetitions, 0);
        assert_eq!(lapsed.interval_days, 1);
        assert!((lapsed.easiness_factor - 1.98).abs() < EPS);

        // Back on the learning steps
        let first = calculate_next_review(&lapsed, q(4), now);
        assert_eq!((first.repetitions, first.interval_days), (1, 1));
        let second = calculate_next_review(&first, q(4), now);
        assert_eq!((second.repetitions, second.interval_days), (2, 6));
    }

    #[test]
    fn test_blackout_on_new_card() {
        let now = Utc::now();
        let next = calculate_next_review(&SchedulingState::new_card(now), q(0), now);
        assert_eq!(next.repetitions, 0);
        assert_eq!(next.interval_days, 1);
        assert!((next.easiness_factor - 1.7).abs() < EPS);
    }

    #[test]
    fn test_next_review_is_interval_days_after_now() {
        let now = Utc::now();
        let next = calculate_next_review(&state(1, 2.5, 1), q(5), now);
        assert_eq!(next.next_review_at, now + Duration::days(6));
    }

    #[test]
    fn test_huge_interval_saturates() {
        let now = Utc::now();
        let next = calculate_next_review(&state(50, 3.0, u32::MAX), q(5), now);
        assert_eq!(next.interval_days, u32::MAX);
        assert_eq!(next.next_review_at, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_review_rejects_invalid_quality() {
        let scheduler = Scheduler::default();
        let start = state(2, 2.5, 6);

        assert_eq!(
            scheduler.review(&start, 6, Utc::now()),
            Err(SchedulerError::InvalidQuality(6))
        );
        assert_eq!(
            scheduler.review(&start, -1, Utc::now()),
            Err(SchedulerError::InvalidQuality(-1))
        );
        assert!(scheduler.review(&start, 5, Utc::now()).is_ok());
    }

    #[test]
    fn test_floor_holds_under_unvalidated_config() {
        for minimum in [1.0, -4.0, f64::NAN] {
            let scheduler = Scheduler::new(Sm2Config {
                minimum_easiness: minimum,
                initial_easiness: 0.5,
                interval_scaling: IntervalScaling::PreviousEasiness,
                ..Sm2Config::default()
            });
            let now = Utc::now();
            assert_eq!(scheduler.initial_state(now).easiness_factor, 1.3);

            let next = scheduler.next_state(&state(1, 1.3, 1), q(0), now);
            assert_eq!(next.easiness_factor, 1.3, "minimum {minimum}");

            let next = scheduler.next_state(&state(2, 0.2, 10), q(3), now);
            assert!(next.easiness_factor >= 1.3);
            assert_eq!(next.interval_days, 13);
        }
    }

    #[test]
    fn test_raised_floor_is_respected() {
        let scheduler = Scheduler::new(Sm2Config {
            minimum_easiness: 1.8,
            ..Sm2Config::default()
        });
        let next = scheduler.next_state(&state(4, 2.0, 10), q(0), Utc::now());
        assert_eq!(next.easiness_factor, 1.8);
        assert_eq!(scheduler.config().minimum_easiness, 1.8);
    }

    #[test]
    fn test_review_at_uses_clock() {
        let start = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
        let mut clock = SimulatedClock::new(start);
        clock.advance_days(3);
        let scheduler = Scheduler::default();

        let next = scheduler.review_at(&state(1, 2.5, 1), 4, &clock).unwrap();
        assert_eq!(next.next_review_at, start + Duration::days(3 + 6));
        assert_eq!(
            scheduler.review_at(&state(1, 2.5, 1), 6, &clock),
            Err(SchedulerError::InvalidQuality(6))
        );
    }

    #[test]
    fn test_custom_learning_steps() {
        let scheduler = Scheduler::new(Sm2Config {
            first_interval_days: 2,
            second_interval_days: 4,
            lapse_interval_days: 3,
            ..Sm2Config::default()
        });
        let now = Utc::now();

        let first = scheduler.next_state(&scheduler.initial_state(now), q(4), now);
        assert_eq!(first.interval_days, 2);
        let second = scheduler.next_state(&first, q(4), now);
        assert_eq!(second.interval_days, 4);
        let lapsed = scheduler.next_state(&second, q(1), now);
        assert_eq!(lapsed.interval_days, 3);
    }
}
