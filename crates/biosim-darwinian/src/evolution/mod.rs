//! Evolution module
//!
//! - [`selection`]: survivor / extinction parent selection
//! - [`runner`]: the generation loop (cycles, logging, reproduction)

pub mod runner;
pub mod selection;

pub use self::runner::{EvolutionaryLoop, GenerationOutcome};
pub use self::selection::{select_parents, ParentSelection, ParentSource};
