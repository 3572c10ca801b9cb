//! Interaction monitor
//!
//! Collects every oracle interaction of the running generation and reduces
//! them to accuracy / error / cohesion statistics. Cohesion is the oracle's
//! absolute closeness measure, so it lives in `[0, 1]`.

use biosim_common::saturating_mean;
use serde::{Deserialize, Serialize};

use crate::oracle::{Evaluation, ProblemKind};

/// One oracle interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub problem: ProblemKind,
    pub resource: Option<String>,
    pub correct_answer: f64,
    pub proposed: f64,
    pub abs_error: f64,
    pub correct: bool,
    pub cohesion: f64,
}

impl From<&Evaluation> for InteractionRecord {
    fn from(eval: &Evaluation) -> Self {
        Self {
            problem: eval.kind,
            resource: eval.resource.clone(),
            correct_answer: eval.correct_answer,
            proposed: eval.proposed,
            abs_error: eval.abs_error,
            correct: eval.is_correct,
            cohesion: eval.cohesion,
        }
    }
}

/// Reduced statistics for one generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetrics {
    /// Number of oracle interactions
    pub interactions: usize,
    /// Fraction of interactions answered correctly
    pub accuracy: Option<f64>,
    pub mean_abs_error: Option<f64>,
    pub cohesion_mean: Option<f64>,
    pub cohesion_median: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct Monitor {
    interactions: Vec<InteractionRecord>,
}

impl Monitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, evaluation: &Evaluation) {
        self.interactions.push(InteractionRecord::from(evaluation));
    }

    pub fn interactions(&self) -> &[InteractionRecord] {
        &self.interactions
    }

    /// Forget the running generation's interactions
    pub fn reset_generation(&mut self) {
        self.interactions.clear();
    }

    pub fn generation_metrics(&self) -> GenerationMetrics {
        let n = self.interactions.len();
        if n == 0 {
            return GenerationMetrics::default();
        }
        let count = n as f64;

        let correct = self.interactions.iter().filter(|i| i.correct).count() as f64;
        let mut cohesion: Vec<f64> = self.interactions.iter().map(|i| i.cohesion).collect();

        GenerationMetrics {
            interactions: n,
            accuracy: Some(correct / count),
            mean_abs_error: saturating_mean(self.interactions.iter().map(|i| i.abs_error)),
            cohesion_mean: saturating_mean(cohesion.iter().copied()),
            cohesion_median: Some(median(&mut cohesion)),
        }
    }
}

fn median(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        values[mid - 1] / 2.0 + values[mid] / 2.0
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluation(abs_error: f64, accuracy: f64, is_correct: bool) -> Evaluation {
        Evaluation {
            kind: ProblemKind::Arithmetic,
            resource: Some("compute_load".to_string()),
            correct_answer: 2.0,
            proposed: 2.0 + abs_error,
            abs_error,
            accuracy,
            cohesion: accuracy,
            reward: 35.0 * accuracy,
            is_correct,
            delivered: true,
        }
    }

    #[test]
    fn test_empty_generation() {
        let monitor = Monitor::new();
        let metrics = monitor.generation_metrics();
        assert_eq!(metrics.interactions, 0);
        assert!(metrics.accuracy.is_none());
        assert!(metrics.cohesion_median.is_none());
    }

    #[test]
    fn test_metrics() {
        let mut monitor = Monitor::new();
        monitor.record(&evaluation(0.0, 1.0, true));
        monitor.record(&evaluation(10.0, 0.5, false));
        monitor.record(&evaluation(20.0, 0.0, false));
        monitor.record(&evaluation(2.0, 0.9, false));

        let metrics = monitor.generation_metrics();
        assert_eq!(metrics.interactions, 4);
        assert_eq!(metrics.accuracy, Some(0.25));
        assert_eq!(metrics.mean_abs_error, Some(8.0));
        assert!((metrics.cohesion_mean.unwrap() - 0.6).abs() < 1e-12);
        assert!((metrics.cohesion_median.unwrap() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_huge_errors_stay_finite() {
        let mut monitor = Monitor::new();
        monitor.record(&evaluation(f64::MAX, 0.0, false));
        monitor.record(&evaluation(f64::MAX, 0.0, false));
        assert_eq!(monitor.generation_metrics().mean_abs_error, Some(f64::MAX));
    }

    #[test]
    fn test_reset() {
        let mut monitor = Monitor::new();
        monitor.record(&evaluation(0.0, 1.0, true));
        monitor.reset_generation();
        assert!(monitor.interactions().is_empty());
    }
}
