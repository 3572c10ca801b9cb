//! Death policy: catastrophic spike or cumulative instability = death
//!
//! Raising `catastrophic_threshold` relative to the per-cycle decay of the
//! homeostatic variables lets organisms ride out longer starvation streaks,
//! which raises mean survivor age. Raising `cumulative_threshold` lengthens
//! every lifetime and weakens selection, since more organisms reach the end
//! of the generation alive.

use biosim_common::ConfigError;
use serde::{Deserialize, Serialize};

/// Default single-cycle discrepancy that kills outright
pub const DEFAULT_CATASTROPHIC_THRESHOLD: f64 = 50.0;

/// Default lifetime discrepancy that kills
pub const DEFAULT_CUMULATIVE_THRESHOLD: f64 = 2500.0;

/// Which threshold ended an organism's life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    /// A single cycle's discrepancy exceeded the catastrophic threshold
    Catastrophic,
    /// Accumulated discrepancy exceeded the lifetime threshold
    Cumulative,
}

impl std::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeathCause::Catastrophic => write!(f, "catastrophic"),
            DeathCause::Cumulative => write!(f, "cumulative"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeathPolicy {
    /// Per-cycle discrepancy above which the organism dies immediately
    pub catastrophic_threshold: f64,
    /// Lifetime discrepancy above which the organism dies
    pub cumulative_threshold: f64,
}

impl Default for DeathPolicy {
    fn default() -> Self {
        Self {
            catastrophic_threshold: DEFAULT_CATASTROPHIC_THRESHOLD,
            cumulative_threshold: DEFAULT_CUMULATIVE_THRESHOLD,
        }
    }
}

impl DeathPolicy {
    pub fn new(catastrophic_threshold: f64, cumulative_threshold: f64) -> Self {
        Self {
            catastrophic_threshold,
            cumulative_threshold,
        }
    }

    /// Decide whether a cycle with the given discrepancies is fatal
    pub fn assess(&self, cycle_discrepancy: f64, cumulative: f64) -> Option<DeathCause> {
        if cycle_discrepancy > self.catastrophic_threshold {
            Some(DeathCause::Catastrophic)
        } else if cumulative > self.cumulative_threshold {
            Some(DeathCause::Cumulative)
        } else {
            None
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("catastrophic_threshold", self.catastrophic_threshold),
            ("cumulative_threshold", self.cumulative_threshold),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidThreshold { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_cycle_survives() {
        let policy = DeathPolicy::default();
        assert_eq!(policy.assess(0.0, 0.0), None);
        assert_eq!(policy.assess(50.0, 2500.0), None);
    }

    #[test]
    fn test_spike_is_catastrophic() {
        let policy = DeathPolicy::new(10.0, 100.0);
        assert_eq!(policy.assess(10.5, 10.5), Some(DeathCause::Catastrophic));
    }

    #[test]
    fn test_catastrophic_takes_precedence() {
        let policy = DeathPolicy::new(10.0, 100.0);
        assert_eq!(policy.assess(11.0, 500.0), Some(DeathCause::Catastrophic));
    }

    #[test]
    fn test_accumulation_is_cumulative() {
        let policy = DeathPolicy::new(10.0, 100.0);
        assert_eq!(policy.assess(1.0, 100.5), Some(DeathCause::Cumulative));
    }

    #[test]
    fn test_validate_rejects_non_positive() {
        assert!(DeathPolicy::new(0.0, 100.0).validate().is_err());
        assert!(DeathPolicy::new(10.0, f64::INFINITY).validate().is_err());
        assert!(DeathPolicy::default().validate().is_ok());
    }
}
