//! Genome - fixed-length vector of real-valued genes
//!
//! Genes act as the weights of a linear model: an organism's answer to a
//! problem is the dot product of the problem operands with its genome.
//! The length is fixed per run; nothing else is enforced.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Ordered sequence of genes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genome(Vec<f64>);

impl Genome {
    /// Wrap an explicit gene vector
    pub fn from_genes(genes: Vec<f64>) -> Self {
        Self(genes)
    }

    /// Sample `len` genes uniformly from `[min, max]`
    pub fn random<R: Rng + ?Sized>(rng: &mut R, len: usize, min: f64, max: f64) -> Self {
        let genes = (0..len)
            .map(|_| if min < max { rng.gen_range(min..=max) } else { min })
            .collect();
        Self(genes)
    }

    /// Number of genes
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the genome has no genes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn genes(&self) -> &[f64] {
        &self.0
    }

    pub fn genes_mut(&mut self) -> &mut [f64] {
        &mut self.0
    }

    /// Weighted sum of `inputs` against the genes.
    ///
    /// Returns `None` when there are more inputs than genes.
    pub fn dot(&self, inputs: &[f64]) -> Option<f64> {
        if inputs.len() > self.0.len() {
            return None;
        }
        Some(inputs.iter().zip(&self.0).map(|(x, w)| x * w).sum())
    }

    /// Single-point crossover: `self[..point] ++ other[point..]`.
    ///
    /// `point` is clamped to the genome length.
    pub fn splice(&self, other: &Genome, point: usize) -> Genome {
        let point = point.min(self.0.len()).min(other.0.len());
        let mut genes = Vec::with_capacity(self.0.len());
        genes.extend_from_slice(&self.0[..point]);
        genes.extend_from_slice(&other.0[point..]);
        Genome(genes)
    }
}

impl From<Vec<f64>> for Genome {
    fn from(genes: Vec<f64>) -> Self {
        Self(genes)
    }
}

impl std::fmt::Display for Genome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, gene) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.3}", gene)?;
        }
        write!(f, "]")
    }
}
