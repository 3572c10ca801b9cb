//! Death policy module
pub mod policy;

pub use self::policy::{DeathCause, DeathPolicy};
