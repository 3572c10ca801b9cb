//! # Biosim Common
//!
//! Shared types and errors for the Biosim homeostasis simulator.
//!
//! ## Core Types
//!
//! - [`Genome`]: fixed-length sequence of real-valued genes (problem-solving weights)
//! - [`HomeostaticVariable`]: named internal quantity with a comfortable range and decay
//! - [`TargetRange`]: inclusive comfort band of a homeostatic variable
//!
//! ## Errors
//!
//! - [`BiosimError`]: unified error type
//! - [`ConfigError`]: setup-time validation failures (fatal, rejected before any generation)

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{BiosimError, ConfigError, Result};
pub use types::{
    genome::Genome,
    homeostatic::{saturate, saturating_mean, HomeostaticVariable, TargetRange},
};

/// Biosim version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default per-gene mutation probability
pub const DEFAULT_MUTATION_RATE: f64 = 0.1;

/// Default standard deviation of the Gaussian mutation kernel
pub const DEFAULT_MUTATION_STD_DEV: f64 = 0.5;

/// Fraction of the ranked pool chosen as parents
pub const PARENT_FRACTION: f64 = 0.2;

/// Fraction of parents carried over unchanged as elites
pub const ELITE_FRACTION: f64 = 0.5;

/// Lower bound for freshly seeded genes
pub const INITIAL_GENE_MIN: f64 = -1.0;

/// Upper bound for freshly seeded genes
pub const INITIAL_GENE_MAX: f64 = 1.0;
