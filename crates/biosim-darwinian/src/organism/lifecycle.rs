//! Organism lifecycle: homeostasis, problem solving, reward intake
//!
//! An organism is `Alive` until a cycle breaches one of its death
//! thresholds, after which it is `Dead` for good. Dead organisms stay in
//! the roster until the generation boundary so that their final age can
//! still drive extinction-recovery selection.

use std::collections::BTreeMap;

use biosim_common::{saturate, Genome, HomeostaticVariable};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::culling::{DeathCause, DeathPolicy};

/// Named homeostatic variables an organism starts its life with
pub type HomeostasisTemplate = BTreeMap<String, HomeostaticVariable>;

/// The reference experiment's two variables
pub fn default_homeostasis() -> HomeostasisTemplate {
    let mut template = HomeostasisTemplate::new();
    template.insert(
        "compute_load".to_string(),
        HomeostaticVariable::new(50.0, 30.0, 95.0, 0.34),
    );
    template.insert(
        "signal_integrity".to_string(),
        HomeostaticVariable::new(90.0, 70.0, 100.0, 0.14),
    );
    template
}

/// Stable organism identifier, unique within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrganismId(pub u64);

impl std::fmt::Display for OrganismId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "org-{}", self.0)
    }
}

/// How an organism came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Origin {
    /// Random genome from population seeding
    Seeded,
    /// Unmutated copy of a parent's genome
    Elite { source: OrganismId },
    /// Crossover + mutation child
    Offspring {
        first: OrganismId,
        second: OrganismId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeState {
    Alive,
    Dead(DeathCause),
}

/// Result of one `process_cycle` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleOutcome {
    /// Organism lived through the cycle
    Survived { discrepancy: f64 },
    /// Organism crossed a death threshold during the cycle
    Died { discrepancy: f64, cause: DeathCause },
    /// Organism was already dead; nothing happened
    Inactive,
}

#[derive(Debug, Clone)]
pub struct Organism {
    id: OrganismId,
    origin: Origin,
    genome: Genome,
    variables: HomeostasisTemplate,
    death_policy: DeathPolicy,
    pub(crate) age: u64,
    pub(crate) cumulative_discrepancy: f64,
    pub(crate) state: LifeState,
}

impl Organism {
    /// Create an organism with freshly initialized homeostatic state
    pub fn new(
        id: OrganismId,
        origin: Origin,
        genome: Genome,
        template: &HomeostasisTemplate,
        death_policy: DeathPolicy,
    ) -> Self {
        Self {
            id,
            origin,
            genome,
            variables: template.clone(),
            death_policy,
            age: 0,
            cumulative_discrepancy: 0.0,
            state: LifeState::Alive,
        }
    }

    /// Deep copy of the genome into a newborn: state and age reset, no mutation
    pub fn elite_clone(&self, id: OrganismId, template: &HomeostasisTemplate) -> Organism {
        Organism::new(
            id,
            Origin::Elite { source: self.id },
            self.genome.clone(),
            template,
            self.death_policy,
        )
    }

    pub fn id(&self) -> OrganismId {
        self.id
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn variables(&self) -> &HomeostasisTemplate {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&HomeostaticVariable> {
        self.variables.get(name)
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn cumulative_discrepancy(&self) -> f64 {
        self.cumulative_discrepancy
    }

    pub fn state(&self) -> LifeState {
        self.state
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        matches!(self.state, LifeState::Alive)
    }

    /// Instantaneous discrepancy summed over all variables
    pub fn current_discrepancy(&self) -> f64 {
        self.variables
            .values()
            .fold(0.0, |acc, var| saturate(acc + var.discrepancy()))
    }

    /// Live one cycle: decay, accumulate discrepancy, age, check for death
    pub fn process_cycle(&mut self) -> CycleOutcome {
        if !self.is_alive() {
            return CycleOutcome::Inactive;
        }

        for var in self.variables.values_mut() {
            var.decay();
        }
        let discrepancy = self.current_discrepancy();
        self.cumulative_discrepancy = saturate(self.cumulative_discrepancy + discrepancy);
        self.age = self.age.saturating_add(1);

        match self
            .death_policy
            .assess(discrepancy, self.cumulative_discrepancy)
        {
            Some(cause) => {
                self.state = LifeState::Dead(cause);
                CycleOutcome::Died { discrepancy, cause }
            }
            None => CycleOutcome::Survived { discrepancy },
        }
    }

    /// Answer = dot product of operands and genes.
    ///
    /// An organism with fewer genes than operands cannot answer and yields 0.
    pub fn solve_problem(&self, problem_data: &[f64]) -> f64 {
        self.genome.dot(problem_data).map(saturate).unwrap_or(0.0)
    }

    /// Feed a reward into the named variable, capped at its comfortable maximum.
    ///
    /// Unknown names are a configuration mismatch: logged and ignored.
    /// Returns whether the reward was applied.
    pub fn gain_resource(&mut self, resource_name: &str, amount: f64) -> bool {
        match self.variables.get_mut(resource_name) {
            Some(var) => {
                var.restore(amount);
                true
            }
            None => {
                warn!(
                    organism = %self.id,
                    resource = resource_name,
                    "Reward targets a homeostatic variable this organism does not have"
                );
                false
            }
        }
    }

    /// Add instability for a failed interaction; the death check sees it next cycle
    pub fn penalize(&mut self, amount: f64) {
        if self.is_alive() && amount.is_finite() && amount > 0.0 {
            self.cumulative_discrepancy = saturate(self.cumulative_discrepancy + amount);
        }
    }
}
