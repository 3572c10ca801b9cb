//! Evolutionary leap detection
//!
//! Keeps a rolling window of per-generation cohesion means and flags a
//! generation whose cohesion clearly exceeds that baseline, either by
//! z-score or by beating the best value seen so far by a margin.

use std::collections::VecDeque;

use biosim_common::ConfigError;
use serde::{Deserialize, Serialize};

const STD_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeapDetectorConfig {
    /// Rolling baseline length (generations)
    pub window: usize,
    /// Minimum z-score against the baseline
    pub z_min: f64,
    /// Minimum improvement over the best cohesion so far
    pub delta_min: f64,
    /// Generations below this oracle accuracy never count as leaps
    pub accuracy_floor: f64,
}

impl Default for LeapDetectorConfig {
    fn default() -> Self {
        Self {
            window: 20,
            z_min: 2.0,
            delta_min: 0.08,
            accuracy_floor: 0.0,
        }
    }
}

impl LeapDetectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window == 0 {
            return Err(ConfigError::InvalidLeapWindow);
        }
        for (field, value) in [
            ("monitor.z_min", self.z_min),
            ("monitor.delta_min", self.delta_min),
            ("monitor.accuracy_floor", self.accuracy_floor),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }

    /// History needed before a baseline exists
    fn warmup(&self) -> usize {
        (self.window / 2).max(5)
    }
}

/// A detected leap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leap {
    pub generation: u64,
    pub cohesion: f64,
    pub accuracy: Option<f64>,
    pub baseline_mean: f64,
    pub baseline_std: f64,
    /// Best cohesion before this generation
    pub previous_best: Option<f64>,
    pub z_score: f64,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct LeapDetector {
    config: LeapDetectorConfig,
    window: VecDeque<f64>,
    best: Option<f64>,
}

impl LeapDetector {
    pub fn new(config: LeapDetectorConfig) -> Self {
        Self {
            window: VecDeque::with_capacity(config.window),
            config,
            best: None,
        }
    }

    /// Best cohesion mean seen so far
    pub fn best(&self) -> Option<f64> {
        self.best
    }

    /// Feed a generation's cohesion mean; returns the leap if this generation is one
    pub fn update_and_check(
        &mut self,
        generation: u64,
        cohesion: Option<f64>,
        accuracy: Option<f64>,
    ) -> Option<Leap> {
        let cohesion = cohesion?;
        let recent: Vec<f64> = self.window.iter().copied().collect();
        self.push(cohesion);

        if recent.len() < self.config.warmup() {
            self.best = Some(self.best.map_or(cohesion, |best| best.max(cohesion)));
            return None;
        }

        let n = recent.len() as f64;
        let mean = recent.iter().sum::<f64>() / n;
        let std = (recent.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt();
        let z_score = (cohesion - mean) / (std + STD_EPSILON);

        let previous_best = self.best;
        let beats_best =
            previous_best.map_or(true, |best| cohesion >= best + self.config.delta_min);
        let z_pass = z_score >= self.config.z_min;
        let accuracy_pass = accuracy.map_or(true, |a| a >= self.config.accuracy_floor);

        if self.best.map_or(true, |best| cohesion > best) {
            self.best = Some(cohesion);
        }

        if !(accuracy_pass && (z_pass || beats_best)) {
            return None;
        }

        let mut reasons = Vec::new();
        if z_pass {
            reasons.push(format!("z={:.2} (>= {})", z_score, self.config.z_min));
        }
        if beats_best {
            let best = previous_best.map_or_else(|| "none".to_string(), |b| format!("{:.3}", b));
            reasons.push(format!(
                "best+delta ({:.3} vs {:.3} baseline / {} best)",
                cohesion, mean, best
            ));
        }

        Some(Leap {
            generation,
            cohesion,
            accuracy,
            baseline_mean: mean,
            baseline_std: std,
            previous_best,
            z_score,
            reason: reasons.join("; "),
        })
    }

    fn push(&mut self, value: f64) {
        if self.window.len() == self.config.window {
            self.window.pop_front();
        }
        self.window.push_back(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> LeapDetector {
        LeapDetector::new(LeapDetectorConfig::default())
    }

    #[test]
    fn test_no_leap_during_warmup() {
        let mut detector = detector();
        for generation in 0..10 {
            assert!(detector
                .update_and_check(generation, Some(0.1 * generation as f64), Some(0.5))
                .is_none());
        }
        assert!((detector.best().unwrap() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_missing_cohesion_is_ignored() {
        let mut detector = detector();
        assert!(detector.update_and_check(1, None, None).is_none());
        assert!(detector.best().is_none());
    }

    #[test]
    fn test_jump_is_a_leap() {
        let mut detector = detector();
        for generation in 0..12 {
            let noise = if generation % 2 == 0 { 0.01 } else { -0.01 };
            assert!(detector
                .update_and_check(generation, Some(0.3 + noise), Some(0.1))
                .is_none());
        }
        let leap = detector
            .update_and_check(12, Some(0.6), Some(0.2))
            .expect("jump should be detected");
        assert_eq!(leap.generation, 12);
        assert!(leap.z_score > 2.0);
        assert!((leap.baseline_mean - 0.3).abs() < 0.01);
    }

    #[test]
    fn test_leap_reason_records_previous_best() {
        let mut detector = detector();
        for generation in 0..12 {
            let noise = if generation % 2 == 0 { 0.01 } else { -0.01 };
            detector.update_and_check(generation, Some(0.3 + noise), Some(0.1));
        }
        let leap = detector.update_and_check(12, Some(0.6), Some(0.2)).unwrap();
        assert!((leap.previous_best.unwrap() - 0.31).abs() < 1e-12);
        assert!(leap.reason.contains("best+delta (0.600 vs 0.300 baseline / 0.310 best)"));
        assert!((detector.best().unwrap() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_flat_series_is_not_a_leap() {
        let mut detector = detector();
        for generation in 0..40 {
            assert!(detector
                .update_and_check(generation, Some(0.5), Some(0.5))
                .is_none());
        }
    }

    #[test]
    fn test_accuracy_floor_blocks_leap() {
        let mut detector = LeapDetector::new(LeapDetectorConfig {
            accuracy_floor: 0.5,
            ..LeapDetectorConfig::default()
        });
        for generation in 0..12 {
            detector.update_and_check(generation, Some(0.3), Some(0.6));
        }
        assert!(detector.update_and_check(12, Some(0.9), Some(0.1)).is_none());
    }

    #[test]
    fn test_zero_window_rejected() {
        let config = LeapDetectorConfig {
            window: 0,
            ..LeapDetectorConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidLeapWindow));
    }
}
