//! Environment: population, oracle, randomness and history
//!
//! The environment owns the single seeded random source of a run. Problem
//! generation, interaction draws, seeding and breeding all pull from it in
//! a fixed order, so equal configurations produce identical histories.

use biosim_common::{saturating_mean, ConfigError, Genome};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, instrument, warn};

use super::breeding::{crossover, mutate};
use crate::fitness::fittest;
use crate::oracle::Oracle;
use crate::organism::{Organism, OrganismId, Origin};
use crate::telemetry::{FittestSummary, GenerationRecord, History, LeapDetector, Monitor};
use crate::SimulationConfig;

/// Simultaneous mutable access to the pieces a simulation cycle touches
pub struct EnvironmentParts<'a> {
    pub population: &'a mut [Organism],
    pub oracle: &'a Oracle,
    pub monitor: &'a mut Monitor,
    pub rng: &'a mut ChaCha8Rng,
}

#[derive(Debug)]
pub struct Environment {
    config: SimulationConfig,
    population: Vec<Organism>,
    oracle: Oracle,
    history: History,
    monitor: Monitor,
    leap_detector: LeapDetector,
    rng: ChaCha8Rng,
    next_id: u64,
}

impl Environment {
    /// Validate `config` and seed the initial population
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let oracle = Oracle::new(config.oracle.clone())?;

        for (kind, resource) in config.oracle.unmapped_resources(&config.homeostasis) {
            warn!(
                problem = %kind,
                resource = %resource,
                "Oracle routes rewards to a variable organisms do not have; those rewards are dropped"
            );
        }
        for kind in oracle.kinds() {
            if kind.arity() > config.genome_size {
                warn!(
                    problem = %kind,
                    arity = kind.arity(),
                    genome_size = config.genome_size,
                    "Genome too short to answer problem; organisms will answer 0"
                );
            }
        }

        let mut environment = Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            leap_detector: LeapDetector::new(config.monitor.clone()),
            population: Vec::with_capacity(config.population_size),
            history: History::new(),
            monitor: Monitor::new(),
            next_id: 0,
            oracle,
            config,
        };
        environment.initialize_population();
        Ok(environment)
    }

    /// Replace the population with freshly seeded random organisms
    pub fn initialize_population(&mut self) {
        let (min, max) = (
            self.config.breeding.initial_gene_min,
            self.config.breeding.initial_gene_max,
        );
        let mut population = Vec::with_capacity(self.config.population_size);
        for _ in 0..self.config.population_size {
            let genome = Genome::random(&mut self.rng, self.config.genome_size, min, max);
            population.push(self.spawn(genome, Origin::Seeded));
        }
        self.population = population;
        debug!(size = self.population.len(), "Seeded population");
    }

    fn allocate_id(&mut self) -> OrganismId {
        let id = OrganismId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Newborn organism with default homeostatic state
    pub fn spawn(&mut self, genome: Genome, origin: Origin) -> Organism {
        let id = self.allocate_id();
        Organism::new(
            id,
            origin,
            genome,
            &self.config.homeostasis,
            self.config.death,
        )
    }

    /// Unmutated copy of `parent` with reset state
    pub fn clone_elite(&mut self, parent: &Organism) -> Organism {
        let id = self.allocate_id();
        parent.elite_clone(id, &self.config.homeostasis)
    }

    /// Single-point crossover of the parents' genomes followed by per-gene Gaussian mutation
    pub fn crossover_and_mutate(&mut self, parent1: &Organism, parent2: &Organism) -> Organism {
        let mut genome = crossover(parent1.genome(), parent2.genome(), &mut self.rng);
        let mutated = mutate(
            &mut genome,
            self.config.breeding.mutation_rate,
            self.config.breeding.mutation_std_dev,
            &mut self.rng,
        );
        let child = self.spawn(
            genome,
            Origin::Offspring {
                first: parent1.id(),
                second: parent2.id(),
            },
        );
        debug!(
            child = %child.id(),
            first = %parent1.id(),
            second = %parent2.id(),
            mutated,
            "Bred offspring"
        );
        child
    }

    /// Uniform index into a parent pool of `count` (> 0) organisms
    pub fn draw_parent(&mut self, count: usize) -> usize {
        self.rng.gen_range(0..count)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn population(&self) -> &[Organism] {
        &self.population
    }

    pub fn survivors(&self) -> impl Iterator<Item = &Organism> {
        self.population.iter().filter(|o| o.is_alive())
    }

    /// Hand the roster over for selection, leaving the environment empty
    pub fn take_population(&mut self) -> Vec<Organism> {
        std::mem::take(&mut self.population)
    }

    pub fn replace_population(&mut self, population: Vec<Organism>) {
        self.population = population;
    }

    pub fn oracle(&self) -> &Oracle {
        &self.oracle
    }

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn parts_mut(&mut self) -> EnvironmentParts<'_> {
        EnvironmentParts {
            population: &mut self.population,
            oracle: &self.oracle,
            monitor: &mut self.monitor,
            rng: &mut self.rng,
        }
    }

    /// Summarize the generation that just lived and append it to history
    #[instrument(skip(self))]
    pub fn log_generation_data(&mut self, generation: u64) -> &GenerationRecord {
        let population_size = self.population.len();
        let survivor_count = self.survivors().count();
        let fittest = fittest(self.survivors()).map(FittestSummary::from);

        let average_age =
            saturating_mean(self.population.iter().map(|o| o.age() as f64)).unwrap_or(0.0);
        let average_discrepancy =
            saturating_mean(self.population.iter().map(|o| o.cumulative_discrepancy()))
                .unwrap_or(0.0);
        let average_genome = average_genome(&self.population, self.config.genome_size);

        let oracle = self.monitor.generation_metrics();
        let leap = self
            .leap_detector
            .update_and_check(generation, oracle.cohesion_mean, oracle.accuracy);
        self.monitor.reset_generation();

        info!(
            generation,
            survivors = survivor_count,
            population = population_size,
            average_age = format_args!("{:.2}", average_age),
            average_discrepancy = format_args!("{:.2}", average_discrepancy),
            "Generation complete"
        );
        if let Some(best) = &fittest {
            info!(
                organism = %best.id,
                age = best.age,
                discrepancy = format_args!("{:.2}", best.cumulative_discrepancy),
                genome = %best.genome,
                "Fittest survivor"
            );
        }
        if let Some(leap) = &leap {
            info!(
                generation,
                cohesion = leap.cohesion,
                z_score = leap.z_score,
                reason = %leap.reason,
                "Evolutionary leap detected"
            );
        }

        self.history.push(GenerationRecord {
            generation,
            population_size,
            survivor_count,
            extinction: survivor_count == 0,
            fittest,
            average_age,
            average_discrepancy,
            average_genome,
            oracle,
            leap,
        });
        &self.history.records()[self.history.len() - 1]
    }
}

fn average_genome(population: &[Organism], genome_size: usize) -> Vec<f64> {
    (0..genome_size)
        .map(|i| {
            saturating_mean(
                population
                    .iter()
                    .filter_map(|o| o.genome().genes().get(i).copied()),
            )
            .unwrap_or(0.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::BreedingConfig;

    fn config() -> SimulationConfig {
        SimulationConfig {
            population_size: 12,
            genome_size: 6,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_new_seeds_population() {
        let env = Environment::new(config()).unwrap();
        assert_eq!(env.population().len(), 12);
        assert!(env.population().iter().all(|o| o.genome().len() == 6));
        assert!(env.population().iter().all(|o| o.is_alive() && o.age() == 0));
        let ids: std::collections::BTreeSet<_> = env.population().iter().map(|o| o.id()).collect();
        assert_eq!(ids.len(), 12);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let err = Environment::new(SimulationConfig {
            population_size: 0,
            ..SimulationConfig::default()
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidPopulationSize);
    }

    #[test]
    fn test_child_has_genome_size_genes() {
        let mut env = Environment::new(config()).unwrap();
        let parents = env.take_population();
        for _ in 0..50 {
            let child = env.crossover_and_mutate(&parents[0], &parents[1]);
            assert_eq!(child.genome().len(), 6);
            assert_eq!(child.age(), 0);
            assert!(child.is_alive());
        }
    }

    #[test]
    fn test_zero_mutation_is_pure_crossover() {
        let mut env = Environment::new(SimulationConfig {
            breeding: BreedingConfig {
                mutation_rate: 0.0,
                ..BreedingConfig::default()
            },
            ..config()
        })
        .unwrap();
        let first = env.spawn(Genome::from_genes(vec![1.0; 6]), Origin::Seeded);
        let second = env.spawn(Genome::from_genes(vec![2.0; 6]), Origin::Seeded);

        for _ in 0..50 {
            let child = env.crossover_and_mutate(&first, &second);
            let point = child.genome().genes().iter().take_while(|&&g| g == 1.0).count();
            assert!((1..=5).contains(&point));
            assert_eq!(child.genome(), &first.genome().splice(second.genome(), point));
        }
    }

    #[test]
    fn test_clone_elite_copies_genome_exactly() {
        let mut env = Environment::new(config()).unwrap();
        let parent = env.population()[3].clone();
        let elite = env.clone_elite(&parent);
        assert_eq!(elite.genome(), parent.genome());
        assert_ne!(elite.id(), parent.id());
        assert_eq!(elite.variables(), &env.config().homeostasis);
    }

    #[test]
    fn test_log_generation_data_appends() {
        let mut env = Environment::new(config()).unwrap();
        let record = env.log_generation_data(1).clone();
        assert_eq!(record.generation, 1);
        assert_eq!(record.survivor_count, 12);
        assert!(!record.extinction);
        assert!(record.fittest.is_some());
        assert_eq!(record.average_genome.len(), 6);
        assert_eq!(record.oracle.interactions, 0);
        env.log_generation_data(2);
        assert_eq!(env.history().len(), 2);
    }

    #[test]
    fn test_same_seed_same_population() {
        let a = Environment::new(config()).unwrap();
        let b = Environment::new(config()).unwrap();
        let genomes_a: Vec<_> = a.population().iter().map(|o| o.genome().clone()).collect();
        let genomes_b: Vec<_> = b.population().iter().map(|o| o.genome().clone()).collect();
        assert_eq!(genomes_a, genomes_b);
    }

    #[test]
    fn test_extreme_discrepancy_survives_history_export() {
        let mut env = Environment::new(SimulationConfig {
            population_size: 2,
            ..config()
        })
        .unwrap();
        let mut population = env.take_population();
        for organism in &mut population {
            organism.cumulative_discrepancy = f64::MAX;
        }
        env.replace_population(population);

        let record = env.log_generation_data(1).clone();
        assert_eq!(record.average_discrepancy, f64::MAX);

        let mut buffer = Vec::new();
        env.history().write_json_lines(&mut buffer).unwrap();
        let line = String::from_utf8(buffer).unwrap();
        assert!(!line.contains("\"average_discrepancy\":null"));
        let parsed: GenerationRecord = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_average_genome() {
        let mut env = Environment::new(config()).unwrap();
        let population = vec![
            env.spawn(Genome::from_genes(vec![1.0, 3.0]), Origin::Seeded),
            env.spawn(Genome::from_genes(vec![3.0, 5.0]), Origin::Seeded),
        ];
        assert_eq!(average_genome(&population, 2), vec![2.0, 4.0]);
    }
}
