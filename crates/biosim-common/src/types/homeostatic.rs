//! HomeostaticVariable - internal quantity an organism must keep in range
//!
//! Each variable drifts away from its comfortable band by `decay_rate` per
//! cycle (resource depletion) and is restored by oracle rewards. Being
//! outside `[min, max]` is what the organism experiences as discrepancy.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Clamp a value to the finite `f64` range; NaN collapses to zero.
#[inline]
pub fn saturate(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(f64::MIN, f64::MAX)
    }
}

/// Running mean that stays finite when every input is finite.
///
/// Returns `None` for an empty input.
pub fn saturating_mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut mean = 0.0;
    let mut count = 0u64;
    for value in values {
        count += 1;
        mean = saturate(mean + saturate(value - mean) / count as f64);
    }
    (count > 0).then_some(mean)
}

/// Inclusive comfortable band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRange {
    pub min: f64,
    pub max: f64,
}

impl TargetRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Distance from `value` to the nearest bound, zero inside the band
    pub fn distance(&self, value: f64) -> f64 {
        if value < self.min {
            saturate(self.min - value)
        } else if value > self.max {
            saturate(value - self.max)
        } else {
            0.0
        }
    }
}

/// A homeostatic variable with its current value and dynamics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeostaticVariable {
    /// Current level
    pub current: f64,
    /// Comfortable band
    pub target_range: TargetRange,
    /// Amount subtracted from `current` every cycle (>= 0)
    pub decay_rate: f64,
}

impl HomeostaticVariable {
    pub fn new(current: f64, min: f64, max: f64, decay_rate: f64) -> Self {
        Self {
            current,
            target_range: TargetRange::new(min, max),
            decay_rate,
        }
    }

    /// Apply one cycle of decay
    pub fn decay(&mut self) {
        self.current = saturate(self.current - self.decay_rate);
    }

    /// Distance outside the target range (0 when comfortable)
    #[inline]
    pub fn discrepancy(&self) -> f64 {
        self.target_range.distance(self.current)
    }

    /// Check if the variable sits inside its target range
    #[inline]
    pub fn is_comfortable(&self) -> bool {
        self.target_range.contains(self.current)
    }

    /// Raise `current` by `amount`, never above `target_range.max`.
    ///
    /// Non-finite amounts are ignored. Returns the new level.
    pub fn restore(&mut self, amount: f64) -> f64 {
        if amount.is_finite() {
            self.current = saturate(self.current + amount).min(self.target_range.max);
        }
        self.current
    }

    /// Validate this variable as part of a homeostasis template
    pub fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if !self.current.is_finite() {
            return Err(ConfigError::NonFinite {
                field: format!("{name}.current"),
            });
        }
        let TargetRange { min, max } = self.target_range;
        if !min.is_finite() || !max.is_finite() {
            return Err(ConfigError::NonFinite {
                field: format!("{name}.target_range"),
            });
        }
        if min > max {
            return Err(ConfigError::InvalidTargetRange {
                name: name.to_string(),
                min,
                max,
            });
        }
        if !self.decay_rate.is_finite() || self.decay_rate < 0.0 {
            return Err(ConfigError::InvalidDecayRate {
                name: name.to_string(),
                rate: self.decay_rate,
            });
        }
        Ok(())
    }
}
