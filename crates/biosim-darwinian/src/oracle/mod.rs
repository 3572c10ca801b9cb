//! Oracle module
//!
//! - [`problem`]: problem kinds, operand sampling, selection policy
//! - [`interface`]: the oracle itself (problem presentation, evaluation, rewards)

pub mod interface;
pub mod problem;

pub use self::interface::{Evaluation, Oracle, OracleConfig, RewardCurve};
pub use self::problem::{OperandRange, Problem, ProblemKind, ProblemSelection};
