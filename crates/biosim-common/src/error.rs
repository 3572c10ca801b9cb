//! Error types for the Biosim simulator
//!
//! Configuration errors are fatal and surface before the first generation.
//! Everything that can happen mid-run (extinction, single-parent breeding,
//! mapping mismatches) is handled in place and never becomes an error.

use thiserror::Error;

/// Result type alias using BiosimError
pub type Result<T> = std::result::Result<T, BiosimError>;

/// Unified error type for Biosim operations
#[derive(Debug, Error)]
pub enum BiosimError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Setup-time configuration errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Population size must be positive")]
    InvalidPopulationSize,

    #[error("Genome size must be positive")]
    InvalidGenomeSize,

    #[error("Cycles per generation must be positive")]
    InvalidCycleCount,

    #[error("Target range of '{name}' is inverted: min {min} > max {max}")]
    InvalidTargetRange { name: String, min: f64, max: f64 },

    #[error("Decay rate of '{name}' must be finite and non-negative, got {rate}")]
    InvalidDecayRate { name: String, rate: f64 },

    #[error("Mutation rate must lie in [0, 1], got {0}")]
    MutationRateOutOfRange(f64),

    #[error("Mutation standard deviation must be finite and non-negative, got {0}")]
    InvalidMutationStdDev(f64),

    #[error("Probability '{field}' must lie in [0, 1], got {value}")]
    InvalidProbability { field: &'static str, value: f64 },

    #[error("Fraction '{field}' must lie in (0, 1], got {value}")]
    InvalidFraction { field: &'static str, value: f64 },

    #[error("Threshold '{field}' must be finite and positive, got {value}")]
    InvalidThreshold { field: &'static str, value: f64 },

    #[error("Reward for {problem} must be finite and non-negative, got {amount}")]
    InvalidReward { problem: String, amount: f64 },

    #[error("Value '{field}' must be finite")]
    NonFinite { field: String },

    #[error("At least one homeostatic variable is required")]
    EmptyHomeostasis,

    #[error("Oracle has no problem kinds configured")]
    NoProblemKinds,

    #[error("No reward amount configured for {problem}")]
    MissingReward { problem: String },

    #[error("Operand range is inverted: {min} > {max}")]
    InvalidOperandRange { min: i32, max: i32 },

    #[error("Initial gene range must be finite with min <= max, got [{min}, {max}]")]
    InvalidGeneRange { min: f64, max: f64 },

    #[error("Accuracy scale must be finite and positive, got {0}")]
    InvalidAccuracyScale(f64),

    #[error("Problem weights must be finite, non-negative and not all zero")]
    InvalidWeights,

    #[error("Leap detector window must be positive")]
    InvalidLeapWindow,
}

// Implement From for common external error types
impl From<serde_json::Error> for BiosimError {
    fn from(err: serde_json::Error) -> Self {
        BiosimError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for BiosimError {
    fn from(err: std::io::Error) -> Self {
        BiosimError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BiosimError::Config(ConfigError::InvalidTargetRange {
            name: "compute_load".to_string(),
            min: 95.0,
            max: 30.0,
        });
        assert!(err.to_string().contains("compute_load"));
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_io_error_is_storage() {
        let err: BiosimError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert!(matches!(err, BiosimError::Storage(ref msg) if msg.contains("disk full")));
    }

    #[test]
    fn test_mutation_rate_error() {
        let err = ConfigError::MutationRateOutOfRange(1.5);
        assert!(err.to_string().contains("1.5"));
    }
}
