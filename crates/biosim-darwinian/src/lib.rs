//! # Darwinian
//!
//! Generation lifecycle engine for Biosim: homeostatic organisms, an
//! oracle that pays for correct answers, and selection with elitism.
//!
//! ## Fitness
//!
//! ```text
//! answer   = Σ operand_i × gene_i
//! accuracy = max(0, 1 − |answer − correct| / max(|correct|, 1))
//! reward   = reward_amount × accuracy
//! ```
//!
//! There is no explicit fitness score. Organisms that answer well keep
//! their variables topped up, stay comfortable, and live longer.
//!
//! ## Death Policy
//!
//! An organism dies when one cycle's discrepancy exceeds the catastrophic
//! threshold (50) or its lifetime discrepancy exceeds the cumulative
//! threshold (2500).
//!
//! ## Selection
//!
//! Survivors are ranked by age (ties: lower discrepancy). The top 20%
//! become parents; the top half of those pass on unchanged. If nobody
//! survived, the longest-lived dead organisms are used instead.

pub mod culling;
pub mod environment;
pub mod evolution;
pub mod fitness;
pub mod oracle;
pub mod organism;
pub mod telemetry;

use biosim_common::ConfigError;
use serde::{Deserialize, Serialize};

pub use culling::{DeathCause, DeathPolicy};
pub use environment::{BreedingConfig, Environment};
pub use evolution::{EvolutionaryLoop, GenerationOutcome};
pub use oracle::{Oracle, OracleConfig, Problem, ProblemKind};
pub use organism::{default_homeostasis, HomeostasisTemplate, Organism, OrganismId};
pub use telemetry::{GenerationRecord, History, LeapDetectorConfig};

/// Full configuration of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Organisms per generation
    pub population_size: usize,
    /// Genes per organism
    pub genome_size: usize,
    pub total_generations: u64,
    pub cycles_per_generation: u64,
    /// Seed of the run's single random source
    pub seed: u64,
    /// Chance that a living organism meets the oracle in a given cycle
    pub interaction_probability: f64,
    /// Initial homeostatic state of every newborn
    pub homeostasis: HomeostasisTemplate,
    pub death: DeathPolicy,
    pub oracle: OracleConfig,
    pub breeding: BreedingConfig,
    /// Evolutionary leap detection
    pub monitor: LeapDetectorConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            genome_size: 2,
            total_generations: 2000,
            cycles_per_generation: 150,
            seed: 42,
            interaction_probability: 0.25,
            homeostasis: default_homeostasis(),
            death: DeathPolicy::default(),
            oracle: OracleConfig::default(),
            breeding: BreedingConfig::default(),
            monitor: LeapDetectorConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Reject configurations the loop cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::InvalidPopulationSize);
        }
        if self.genome_size == 0 {
            return Err(ConfigError::InvalidGenomeSize);
        }
        if self.cycles_per_generation == 0 {
            return Err(ConfigError::InvalidCycleCount);
        }
        if !(0.0..=1.0).contains(&self.interaction_probability) {
            return Err(ConfigError::InvalidProbability {
                field: "interaction_probability",
                value: self.interaction_probability,
            });
        }
        if self.homeostasis.is_empty() {
            return Err(ConfigError::EmptyHomeostasis);
        }
        for (name, variable) in &self.homeostasis {
            variable.validate(name)?;
        }
        self.death.validate()?;
        self.oracle.validate()?;
        self.breeding.validate()?;
        self.monitor.validate()?;
        Ok(())
    }
}
