//! Evolutionary loop
//!
//! Each generation runs `cycles_per_generation` cycles, logs a history
//! record, then replaces the population wholesale: elites (top parents,
//! unmutated, state reset) first, crossover + mutation children after.
//!
//! Interaction policy: after its own `process_cycle`, every organism that
//! is still alive meets the oracle with independent probability
//! `interaction_probability`. Organisms are visited in population order.

use biosim_common::ConfigError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::selection::{select_parents, ParentSource};
use crate::environment::{Environment, EnvironmentParts};
use crate::organism::CycleOutcome;
use crate::telemetry::History;
use crate::SimulationConfig;

/// What the end-of-generation reproduction step did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub generation: u64,
    pub source: ParentSource,
    pub survivors: usize,
    pub parents: usize,
    pub elites: usize,
    pub offspring: usize,
    /// Nobody was left to breed from and the population was reseeded
    pub reseeded: bool,
}

#[derive(Debug)]
pub struct EvolutionaryLoop {
    environment: Environment,
    total_generations: u64,
    cycles_per_generation: u64,
}

impl EvolutionaryLoop {
    pub fn new(
        environment: Environment,
        total_generations: u64,
        cycles_per_generation: u64,
    ) -> Result<Self, ConfigError> {
        if cycles_per_generation == 0 {
            return Err(ConfigError::InvalidCycleCount);
        }
        Ok(Self {
            environment,
            total_generations,
            cycles_per_generation,
        })
    }

    /// Build the environment and loop from one configuration
    pub fn from_config(config: SimulationConfig) -> Result<Self, ConfigError> {
        let total_generations = config.total_generations;
        let cycles_per_generation = config.cycles_per_generation;
        Self::new(
            Environment::new(config)?,
            total_generations,
            cycles_per_generation,
        )
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    pub fn history(&self) -> &History {
        self.environment.history()
    }

    pub fn total_generations(&self) -> u64 {
        self.total_generations
    }

    pub fn cycles_per_generation(&self) -> u64 {
        self.cycles_per_generation
    }

    /// Run every configured generation and return the accumulated history
    #[instrument(skip(self), fields(generations = self.total_generations, cycles = self.cycles_per_generation))]
    pub fn run_simulation(&mut self) -> &History {
        info!("Starting homeostasis experiment");
        for _ in 0..self.total_generations {
            self.step_generation();
        }
        info!(recorded = self.history().len(), "Simulation complete");
        self.environment.history()
    }

    /// Live, log and reproduce one generation
    pub fn step_generation(&mut self) -> GenerationOutcome {
        let generation = self.environment.history().len() as u64 + 1;
        debug!(generation, "Generation start");
        self.run_generation_cycle();
        self.environment.log_generation_data(generation);
        self.evolve_population()
    }

    /// One lifetime of the current population
    pub fn run_generation_cycle(&mut self) {
        for _ in 0..self.cycles_per_generation {
            if !self.run_cycle() {
                debug!("Every organism is dead; ending lifetime early");
                break;
            }
        }
    }

    /// One cycle over the population; returns whether anyone is still alive
    fn run_cycle(&mut self) -> bool {
        let probability = self.environment.config().interaction_probability;
        let EnvironmentParts {
            population,
            oracle,
            monitor,
            rng,
        } = self.environment.parts_mut();

        let mut living = 0usize;
        for organism in population.iter_mut() {
            match organism.process_cycle() {
                CycleOutcome::Inactive => continue,
                CycleOutcome::Died { discrepancy, cause } => {
                    debug!(
                        organism = %organism.id(),
                        age = organism.age(),
                        %cause,
                        discrepancy,
                        "Organism died"
                    );
                    continue;
                }
                CycleOutcome::Survived { .. } => living += 1,
            }

            if rng.gen_bool(probability) {
                let problem = oracle.present_problem(rng);
                let evaluation = oracle.evaluate(organism, &problem);
                monitor.record(&evaluation);
            }
        }
        living > 0
    }

    /// Replace the population with elites and offspring of the selected parents
    pub fn evolve_population(&mut self) -> GenerationOutcome {
        let generation = self.environment.history().len() as u64;
        let population_size = self.environment.config().population_size;
        let breeding = self.environment.config().breeding.clone();

        let selection = select_parents(
            self.environment.take_population(),
            breeding.parent_fraction,
        );
        let parents = selection.parents.len();

        if parents == 0 {
            warn!(generation, "No organisms to breed from; reseeding population");
            self.environment.initialize_population();
            return GenerationOutcome {
                generation,
                source: selection.source,
                survivors: 0,
                parents: 0,
                elites: 0,
                offspring: 0,
                reseeded: true,
            };
        }

        if selection.is_extinction() {
            info!(
                generation,
                parents, "Extinction event! Breeding from the longest-lived organisms"
            );
        }

        let elites = breeding.elite_count(parents).min(population_size);
        let mut next_generation = Vec::with_capacity(population_size);
        for parent in &selection.parents[..elites] {
            next_generation.push(self.environment.clone_elite(parent));
        }

        // A single parent is crossed with itself: a mutated clone.
        while next_generation.len() < population_size {
            let first = self.environment.draw_parent(parents);
            let second = self.environment.draw_parent(parents);
            let child = self
                .environment
                .crossover_and_mutate(&selection.parents[first], &selection.parents[second]);
            next_generation.push(child);
        }

        let offspring = population_size - elites;
        debug!(generation, parents, elites, offspring, "Population evolved");
        self.environment.replace_population(next_generation);

        GenerationOutcome {
            generation,
            source: selection.source,
            survivors: selection.survivors,
            parents,
            elites,
            offspring,
            reseeded: false,
        }
    }
}
