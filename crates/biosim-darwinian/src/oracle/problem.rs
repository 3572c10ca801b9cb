//! Problems posed by the oracle

use std::collections::BTreeMap;

use biosim_common::ConfigError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Kind of problem; determines the correct answer and the rewarded variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProblemKind {
    /// a + b; solved exactly by genome [1, 1]
    #[serde(rename = "math_problem")]
    Arithmetic,
    /// 2a - b; solved exactly by genome [2, -1]
    #[serde(rename = "logic_problem")]
    Logic,
}

impl ProblemKind {
    pub const ALL: [ProblemKind; 2] = [ProblemKind::Arithmetic, ProblemKind::Logic];

    /// Number of operands
    pub fn arity(&self) -> usize {
        match self {
            ProblemKind::Arithmetic | ProblemKind::Logic => 2,
        }
    }

    /// Correct answer for the given operands
    pub fn answer(&self, operands: &[f64]) -> f64 {
        let a = operands.first().copied().unwrap_or(0.0);
        let b = operands.get(1).copied().unwrap_or(0.0);
        match self {
            ProblemKind::Arithmetic => a + b,
            ProblemKind::Logic => a * 2.0 - b,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemKind::Arithmetic => "math_problem",
            ProblemKind::Logic => "logic_problem",
        }
    }
}

impl std::fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive integer range operands are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperandRange {
    pub min: i32,
    pub max: i32,
}

impl Default for OperandRange {
    fn default() -> Self {
        Self { min: 1, max: 10 }
    }
}

impl OperandRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Range that always yields the same operand
    pub fn fixed(value: i32) -> Self {
        Self::new(value, value)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        f64::from(rng.gen_range(self.min..=self.max))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvalidOperandRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// How the oracle picks the next problem kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "policy", content = "weights")]
pub enum ProblemSelection {
    /// Every configured kind equally likely
    #[default]
    Uniform,
    /// Relative weights per kind; kinds without a weight are never chosen
    Weighted(BTreeMap<ProblemKind, f64>),
}

/// A concrete problem instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub kind: ProblemKind,
    pub data: Vec<f64>,
    pub correct_answer: f64,
}

impl Problem {
    /// Build a problem and compute its answer
    pub fn new(kind: ProblemKind, data: Vec<f64>) -> Self {
        let correct_answer = kind.answer(&data);
        Self {
            kind,
            data,
            correct_answer,
        }
    }

    /// Sample operands for `kind`
    pub fn generate<R: Rng + ?Sized>(kind: ProblemKind, operands: &OperandRange, rng: &mut R) -> Self {
        let data = (0..kind.arity()).map(|_| operands.sample(rng)).collect();
        Self::new(kind, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_answers() {
        assert_eq!(ProblemKind::Arithmetic.answer(&[3.0, 4.0]), 7.0);
        assert_eq!(ProblemKind::Logic.answer(&[3.0, 4.0]), 2.0);
    }

    #[test]
    fn test_generate_within_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            let problem = Problem::generate(ProblemKind::Logic, &OperandRange::default(), &mut rng);
            assert_eq!(problem.data.len(), 2);
            assert!(problem.data.iter().all(|x| (1.0..=10.0).contains(x)));
            assert_eq!(problem.correct_answer, problem.data[0] * 2.0 - problem.data[1]);
        }
    }

    #[test]
    fn test_fixed_operands() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let problem = Problem::generate(ProblemKind::Arithmetic, &OperandRange::fixed(1), &mut rng);
        assert_eq!(problem.data, vec![1.0, 1.0]);
        assert_eq!(problem.correct_answer, 2.0);
    }

    #[test]
    fn test_inverted_operand_range() {
        assert!(OperandRange::new(5, 1).validate().is_err());
    }

    #[test]
    fn test_kind_serialized_names() {
        let json = serde_json::to_string(&ProblemKind::Arithmetic).unwrap();
        assert_eq!(json, "\"math_problem\"");
    }
}
