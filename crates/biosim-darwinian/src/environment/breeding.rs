//! Reproduction operators: single-point crossover and Gaussian mutation

use biosim_common::{
    saturate, ConfigError, Genome, DEFAULT_MUTATION_RATE, DEFAULT_MUTATION_STD_DEV,
    ELITE_FRACTION, INITIAL_GENE_MAX, INITIAL_GENE_MIN, PARENT_FRACTION,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Slack for fraction * count products that land a hair above an integer
const FRACTION_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreedingConfig {
    /// Per-gene probability of a Gaussian perturbation
    pub mutation_rate: f64,
    /// Standard deviation of the perturbation
    pub mutation_std_dev: f64,
    /// Share of the ranked pool that becomes parents (rounded up)
    pub parent_fraction: f64,
    /// Share of parents cloned unchanged into the next generation (rounded up)
    pub elite_fraction: f64,
    /// Lower bound of seeded genes
    pub initial_gene_min: f64,
    /// Upper bound of seeded genes
    pub initial_gene_max: f64,
}

impl Default for BreedingConfig {
    fn default() -> Self {
        Self {
            mutation_rate: DEFAULT_MUTATION_RATE,
            mutation_std_dev: DEFAULT_MUTATION_STD_DEV,
            parent_fraction: PARENT_FRACTION,
            elite_fraction: ELITE_FRACTION,
            initial_gene_min: INITIAL_GENE_MIN,
            initial_gene_max: INITIAL_GENE_MAX,
        }
    }
}

impl BreedingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::MutationRateOutOfRange(self.mutation_rate));
        }
        if !self.mutation_std_dev.is_finite() || self.mutation_std_dev < 0.0 {
            return Err(ConfigError::InvalidMutationStdDev(self.mutation_std_dev));
        }
        for (field, value) in [
            ("breeding.parent_fraction", self.parent_fraction),
            ("breeding.elite_fraction", self.elite_fraction),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::InvalidFraction { field, value });
            }
        }
        let (min, max) = (self.initial_gene_min, self.initial_gene_max);
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ConfigError::InvalidGeneRange { min, max });
        }
        Ok(())
    }

    /// Parents drawn from a ranked pool of `pool` organisms
    pub fn parent_count(&self, pool: usize) -> usize {
        fraction_of(pool, self.parent_fraction)
    }

    /// Elites among `parents` parents
    pub fn elite_count(&self, parents: usize) -> usize {
        fraction_of(parents, self.elite_fraction)
    }
}

/// `ceil(n * fraction)`, at least one for a non-empty pool, at most `n`
pub fn fraction_of(n: usize, fraction: f64) -> usize {
    if n == 0 {
        return 0;
    }
    let raw = (n as f64 * fraction - FRACTION_EPSILON).ceil();
    (raw.max(1.0) as usize).min(n)
}

/// Crossover point uniform in `[1, len - 1]`; `None` when the genome is too short to split
pub fn crossover_point<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<usize> {
    if len < 2 {
        None
    } else {
        Some(rng.gen_range(1..len))
    }
}

/// Single-point crossover; short genomes copy the first parent
pub fn crossover<R: Rng + ?Sized>(first: &Genome, second: &Genome, rng: &mut R) -> Genome {
    match crossover_point(first.len().min(second.len()), rng) {
        Some(point) => first.splice(second, point),
        None => first.clone(),
    }
}

/// Standard normal sample via Box-Muller
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(f64::EPSILON);
    let u2: f64 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Perturb each gene with probability `rate` by N(0, std_dev). Returns the number of mutated genes.
pub fn mutate<R: Rng + ?Sized>(genome: &mut Genome, rate: f64, std_dev: f64, rng: &mut R) -> usize {
    if rate <= 0.0 {
        return 0;
    }
    let mut mutated = 0;
    for gene in genome.genes_mut() {
        if rng.gen_bool(rate) {
            *gene = saturate(*gene + standard_normal(rng) * std_dev);
            mutated += 1;
        }
    }
    mutated
}
