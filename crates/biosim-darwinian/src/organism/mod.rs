//! Organism module
pub mod lifecycle;

pub use self::lifecycle::{
    default_homeostasis, CycleOutcome, HomeostasisTemplate, LifeState, Organism, OrganismId,
    Origin,
};
