//! Environment module
pub mod breeding;
pub mod ecosystem;

pub use self::breeding::BreedingConfig;
pub use self::ecosystem::{Environment, EnvironmentParts};
