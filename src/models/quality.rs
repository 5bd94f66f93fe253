//! Recall quality rating on the 0-5 SM-2 scale.
use crate::error::SchedulerError;

/// A validated quality rating: 0 = complete blackout, 5 = perfect response.
/// Ratings below 3 count as a failed recall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quality(u8);

impl Quality {
    pub const MAX: u8 = 5;
    pub const PASSING: u8 = 3;

    pub fn new(value: i64) -> Result<Self, SchedulerError> {
        match u8::try_from(value) {
            Ok(q) if q <= Self::MAX => Ok(Self(q)),
            _ => Err(SchedulerError::InvalidQuality(value)),
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_passing(self) -> bool {
        self.0 >= Self::PASSING
    }
}

impl TryFrom<u8> for Quality {
    type Error = SchedulerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

impl TryFrom<i32> for Quality {
    type Error = SchedulerError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}
