//! Scheduler tuning, loadable from a JSON file.
//! Every field is optional in the file; missing fields keep the SM-2 defaults.

use crate::error::ConfigError;
use crate::models::scheduling_state::MINIMUM_EASINESS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Which easiness factor scales the interval once a card leaves the learning steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalScaling {
    /// Multiply by the factor produced by the current review.
    #[default]
    UpdatedEasiness,
    /// Multiply by the factor the card had before the current review.
    PreviousEasiness,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sm2Config {
    pub initial_easiness: f64,
    pub minimum_easiness: f64,
    pub first_interval_days: u32,
    pub second_interval_days: u32,
    pub lapse_interval_days: u32,
    pub interval_scaling: IntervalScaling,
}

impl Default for Sm2Config {
    fn default() -> Self {
        Self {
            initial_easiness: 2.5,
            minimum_easiness: 1.3,
            first_interval_days: 1,
            second_interval_days: 6,
            lapse_interval_days: 1,
            interval_scaling: IntervalScaling::UpdatedEasiness,
        }
    }
}

impl Sm2Config {
    /// Reads and validates a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: Sm2Config = serde_json::from_str(&contents)?;
        config.validate()?;

        log::debug!("Loaded scheduler config from '{}'", path.as_ref().display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.minimum_easiness.is_finite() || self.minimum_easiness < MINIMUM_EASINESS {
            return Err(ConfigError::Invalid(format!(
                "minimum_easiness must be a finite number of at least {}, got {}",
                MINIMUM_EASINESS, self.minimum_easiness
            )));
        }
        if !self.initial_easiness.is_finite() || self.initial_easiness < self.minimum_easiness {
            return Err(ConfigError::Invalid(format!(
                "initial_easiness {} is below minimum_easiness {}",
                self.initial_easiness, self.minimum_easiness
            )));
        }
        for (name, days) in [
            ("first_interval_days", self.first_interval_days),
            ("second_interval_days", self.second_interval_days),
            ("lapse_interval_days", self.lapse_interval_days),
        ] {
            if days == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be at least 1")));
            }
        }
        Ok(())
    }
}
