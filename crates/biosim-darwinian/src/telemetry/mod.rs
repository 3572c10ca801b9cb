//! Telemetry module
//!
//! - [`history`]: append-only per-generation records
//! - [`monitor`]: oracle interaction statistics within a generation
//! - [`leap`]: detection of sudden jumps in solution cohesion

pub mod history;
pub mod leap;
pub mod monitor;

pub use self::history::{FittestSummary, GenerationRecord, History};
pub use self::leap::{Leap, LeapDetector, LeapDetectorConfig};
pub use self::monitor::{GenerationMetrics, InteractionRecord, Monitor};
