//! Accuracy scoring: a = max(0, 1 - |error| / scale)
//!
//! The relative form uses `scale = max(|correct|, min_scale)`, so an answer
//! of zero scores nothing whenever the correct answer is at least `min_scale`.

pub struct FitnessCalculator;

impl FitnessCalculator {
    /// Accuracy factor in `[0, 1]`, decreasing monotonically with error
    pub fn accuracy(abs_error: f64, scale: f64) -> f64 {
        if !abs_error.is_finite() || !scale.is_finite() || scale <= 0.0 {
            return 0.0;
        }
        (1.0 - abs_error.abs() / scale).clamp(0.0, 1.0)
    }

    /// Accuracy with the scale set by the magnitude of the correct answer
    pub fn relative_accuracy(abs_error: f64, correct_answer: f64, min_scale: f64) -> f64 {
        if !correct_answer.is_finite() {
            return 0.0;
        }
        Self::accuracy(abs_error, correct_answer.abs().max(min_scale))
    }

    /// Scale a base reward by accuracy
    pub fn reward(base: f64, accuracy: f64) -> f64 {
        if !base.is_finite() || base <= 0.0 {
            return 0.0;
        }
        base * accuracy.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_answer_is_full_accuracy() {
        assert_eq!(FitnessCalculator::accuracy(0.0, 20.0), 1.0);
    }

    #[test]
    fn test_accuracy_floors_at_zero() {
        assert_eq!(FitnessCalculator::accuracy(25.0, 20.0), 0.0);
        assert_eq!(FitnessCalculator::accuracy(f64::INFINITY, 20.0), 0.0);
    }

    #[test]
    fn test_accuracy_is_monotonic() {
        let a = FitnessCalculator::accuracy(1.0, 20.0);
        let b = FitnessCalculator::accuracy(5.0, 20.0);
        assert!(a > b);
        assert!((b - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_relative_accuracy_zero_answer_scores_nothing() {
        // Answering 0 means the error equals |correct|
        assert_eq!(FitnessCalculator::relative_accuracy(2.0, 2.0, 1.0), 0.0);
        assert_eq!(FitnessCalculator::relative_accuracy(8.0, -8.0, 1.0), 0.0);
        assert_eq!(FitnessCalculator::relative_accuracy(0.0, 12.0, 1.0), 1.0);
        assert!((FitnessCalculator::relative_accuracy(3.0, 12.0, 1.0) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_relative_accuracy_min_scale() {
        assert!((FitnessCalculator::relative_accuracy(0.25, 0.0, 1.0) - 0.75).abs() < 1e-12);
        assert_eq!(FitnessCalculator::relative_accuracy(1.0, f64::NAN, 1.0), 0.0);
    }

    #[test]
    fn test_reward_scaling() {
        assert_eq!(FitnessCalculator::reward(35.0, 1.0), 35.0);
        assert_eq!(FitnessCalculator::reward(35.0, 0.0), 0.0);
        assert!((FitnessCalculator::reward(30.0, 0.5) - 15.0).abs() < 1e-12);
    }
}
