//! Fitness module
pub mod calculator;
pub mod ranking;

pub use self::calculator::FitnessCalculator;
pub use self::ranking::{by_fitness, by_longevity, fittest};
