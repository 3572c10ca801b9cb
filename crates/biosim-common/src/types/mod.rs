//! Core types shared across Biosim crates

pub mod genome;
pub mod homeostatic;
