//! Oracle: poses problems and pays rewards
//!
//! Reward policy: `reward_amounts[kind] × accuracy`, where the accuracy
//! factor comes from the configured [`RewardCurve`]. The default curve is
//! relative to the size of the correct answer, so answering 0 earns nothing.
//! An answer within `correct_tolerance` counts as correct; anything else
//! additionally costs `failure_penalty` units of cumulative discrepancy.
//!
//! Cohesion, reported to the monitor, is a separate absolute measure:
//! `max(0, 1 − |error| / cohesion_scale)`.

use std::collections::BTreeMap;

use biosim_common::{saturate, ConfigError};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::problem::{OperandRange, Problem, ProblemKind, ProblemSelection};
use crate::fitness::FitnessCalculator;
use crate::organism::{HomeostasisTemplate, Organism};

/// Default absolute error at which cohesion reaches zero
pub const DEFAULT_COHESION_SCALE: f64 = 20.0;

/// Default lower bound on the relative curve's denominator
pub const DEFAULT_MIN_RELATIVE_SCALE: f64 = 1.0;

/// Default tolerance for counting an answer as correct
pub const DEFAULT_CORRECT_TOLERANCE: f64 = 0.1;

/// Default discrepancy added for an incorrect answer
pub const DEFAULT_FAILURE_PENALTY: f64 = 50.0;

/// How answer error maps to the accuracy factor that scales rewards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "curve")]
pub enum RewardCurve {
    /// `max(0, 1 − |error| / max(|correct|, min_scale))`
    Relative { min_scale: f64 },
    /// `max(0, 1 − |error| / scale)`
    Absolute { scale: f64 },
    /// Full reward for a correct answer, nothing otherwise
    Threshold,
}

impl Default for RewardCurve {
    fn default() -> Self {
        RewardCurve::Relative {
            min_scale: DEFAULT_MIN_RELATIVE_SCALE,
        }
    }
}

impl RewardCurve {
    /// Accuracy factor in `[0, 1]`
    pub fn accuracy(&self, abs_error: f64, correct_answer: f64, is_correct: bool) -> f64 {
        match *self {
            RewardCurve::Relative { min_scale } => {
                FitnessCalculator::relative_accuracy(abs_error, correct_answer, min_scale)
            }
            RewardCurve::Absolute { scale } => FitnessCalculator::accuracy(abs_error, scale),
            RewardCurve::Threshold => {
                if is_correct {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            RewardCurve::Relative { min_scale: scale } | RewardCurve::Absolute { scale }
                if !scale.is_finite() || scale <= 0.0 =>
            {
                Err(ConfigError::InvalidAccuracyScale(scale))
            }
            _ => Ok(()),
        }
    }
}

/// Static oracle configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Problem kind -> homeostatic variable that its reward restores
    pub resource_map: BTreeMap<ProblemKind, String>,
    /// Problem kind -> maximum reward
    pub reward_amounts: BTreeMap<ProblemKind, f64>,
    /// Problem kind selection policy
    pub selection: ProblemSelection,
    /// Operand sampling range
    pub operands: OperandRange,
    /// Error-to-accuracy mapping for rewards
    pub reward_curve: RewardCurve,
    /// Absolute error at which monitor cohesion reaches zero
    pub cohesion_scale: f64,
    /// Absolute error below which an answer is correct
    pub correct_tolerance: f64,
    /// Cumulative discrepancy added for an incorrect answer (0 disables)
    pub failure_penalty: f64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        let mut resource_map = BTreeMap::new();
        resource_map.insert(ProblemKind::Arithmetic, "compute_load".to_string());
        resource_map.insert(ProblemKind::Logic, "signal_integrity".to_string());

        let mut reward_amounts = BTreeMap::new();
        reward_amounts.insert(ProblemKind::Arithmetic, 35.0);
        reward_amounts.insert(ProblemKind::Logic, 30.0);

        Self {
            resource_map,
            reward_amounts,
            selection: ProblemSelection::Uniform,
            operands: OperandRange::default(),
            reward_curve: RewardCurve::default(),
            cohesion_scale: DEFAULT_COHESION_SCALE,
            correct_tolerance: DEFAULT_CORRECT_TOLERANCE,
            failure_penalty: DEFAULT_FAILURE_PENALTY,
        }
    }
}

impl OracleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resource_map.is_empty() {
            return Err(ConfigError::NoProblemKinds);
        }
        for kind in self.resource_map.keys() {
            match self.reward_amounts.get(kind) {
                None => {
                    return Err(ConfigError::MissingReward {
                        problem: kind.to_string(),
                    })
                }
                Some(&amount) if !amount.is_finite() || amount < 0.0 => {
                    return Err(ConfigError::InvalidReward {
                        problem: kind.to_string(),
                        amount,
                    })
                }
                Some(_) => {}
            }
        }
        self.operands.validate()?;
        self.reward_curve.validate()?;
        if !self.cohesion_scale.is_finite() || self.cohesion_scale <= 0.0 {
            return Err(ConfigError::InvalidAccuracyScale(self.cohesion_scale));
        }
        if !self.correct_tolerance.is_finite() || self.correct_tolerance < 0.0 {
            return Err(ConfigError::NonFinite {
                field: "oracle.correct_tolerance".to_string(),
            });
        }
        if !self.failure_penalty.is_finite() || self.failure_penalty < 0.0 {
            return Err(ConfigError::NonFinite {
                field: "oracle.failure_penalty".to_string(),
            });
        }
        Ok(())
    }

    /// Routed variable names the template does not define
    pub fn unmapped_resources(&self, template: &HomeostasisTemplate) -> Vec<(ProblemKind, String)> {
        self.resource_map
            .iter()
            .filter(|(_, name)| !template.contains_key(name.as_str()))
            .map(|(kind, name)| (*kind, name.clone()))
            .collect()
    }
}

/// Outcome of one organism/oracle interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub kind: ProblemKind,
    /// Variable the reward was routed to
    pub resource: Option<String>,
    pub correct_answer: f64,
    pub proposed: f64,
    pub abs_error: f64,
    /// Accuracy factor in [0, 1] that scaled the reward
    pub accuracy: f64,
    /// Absolute closeness in [0, 1] on the cohesion scale
    pub cohesion: f64,
    /// Reward offered after scaling
    pub reward: f64,
    pub is_correct: bool,
    /// Whether the reward reached a homeostatic variable
    pub delivered: bool,
}

#[derive(Debug, Clone)]
pub struct Oracle {
    config: OracleConfig,
    kinds: Vec<ProblemKind>,
    weights: Option<WeightedIndex<f64>>,
}

impl Oracle {
    pub fn new(config: OracleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let kinds: Vec<ProblemKind> = config.resource_map.keys().copied().collect();
        let weights = match &config.selection {
            ProblemSelection::Uniform => None,
            ProblemSelection::Weighted(table) => {
                let weights: Vec<f64> = kinds
                    .iter()
                    .map(|kind| table.get(kind).copied().unwrap_or(0.0))
                    .collect();
                if weights.iter().any(|w| !w.is_finite()) {
                    return Err(ConfigError::InvalidWeights);
                }
                Some(WeightedIndex::new(&weights).map_err(|_| ConfigError::InvalidWeights)?)
            }
        };
        Ok(Self {
            config,
            kinds,
            weights,
        })
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// Problem kinds in selection order
    pub fn kinds(&self) -> &[ProblemKind] {
        &self.kinds
    }

    /// Variable restored by rewards for `kind`
    pub fn resource_for(&self, kind: ProblemKind) -> Option<&str> {
        self.config.resource_map.get(&kind).map(String::as_str)
    }

    /// Maximum reward for `kind`
    pub fn reward_amount(&self, kind: ProblemKind) -> f64 {
        self.config.reward_amounts.get(&kind).copied().unwrap_or(0.0)
    }

    /// Pick a problem kind and sample its operands
    pub fn present_problem<R: Rng + ?Sized>(&self, rng: &mut R) -> Problem {
        let index = match &self.weights {
            Some(weights) => weights.sample(rng),
            None => rng.gen_range(0..self.kinds.len()),
        };
        Problem::generate(self.kinds[index], &self.config.operands, rng)
    }

    /// Let `organism` answer `problem`, then pay the scaled reward
    pub fn evaluate(&self, organism: &mut Organism, problem: &Problem) -> Evaluation {
        let proposed = organism.solve_problem(&problem.data);
        let abs_error = saturate((proposed - problem.correct_answer).abs());
        let is_correct = abs_error < self.config.correct_tolerance;
        let accuracy =
            self.config
                .reward_curve
                .accuracy(abs_error, problem.correct_answer, is_correct);
        let cohesion = FitnessCalculator::accuracy(abs_error, self.config.cohesion_scale);
        let reward = FitnessCalculator::reward(self.reward_amount(problem.kind), accuracy);
        let resource = self.resource_for(problem.kind).map(str::to_string);

        let delivered = match &resource {
            Some(name) if reward > 0.0 => organism.gain_resource(name, reward),
            _ => false,
        };
        if !is_correct {
            organism.penalize(self.config.failure_penalty);
        }

        Evaluation {
            kind: problem.kind,
            resource,
            correct_answer: problem.correct_answer,
            proposed,
            abs_error,
            accuracy,
            cohesion,
            reward,
            is_correct,
            delivered,
        }
    }
}
