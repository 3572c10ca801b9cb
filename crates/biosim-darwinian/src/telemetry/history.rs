//! Generation history
//!
//! Append-only log of per-generation summaries owned by the environment.
//! Records are never updated or removed once pushed.

use std::io::Write;

use biosim_common::{Genome, Result};
use serde::{Deserialize, Serialize};

use super::leap::Leap;
use super::monitor::GenerationMetrics;
use crate::organism::{Organism, OrganismId};

/// Snapshot of the most stable survivor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittestSummary {
    pub id: OrganismId,
    pub age: u64,
    pub cumulative_discrepancy: f64,
    pub genome: Genome,
}

impl From<&Organism> for FittestSummary {
    fn from(organism: &Organism) -> Self {
        Self {
            id: organism.id(),
            age: organism.age(),
            cumulative_discrepancy: organism.cumulative_discrepancy(),
            genome: organism.genome().clone(),
        }
    }
}

/// Summary of one completed generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// 1-based generation index
    pub generation: u64,
    pub population_size: usize,
    pub survivor_count: usize,
    /// No organism survived the generation
    pub extinction: bool,
    /// Lowest cumulative discrepancy among survivors (ties: oldest)
    pub fittest: Option<FittestSummary>,
    pub average_age: f64,
    pub average_discrepancy: f64,
    /// Per-gene mean over the whole population
    pub average_genome: Vec<f64>,
    /// Oracle interaction statistics
    pub oracle: GenerationMetrics,
    pub leap: Option<Leap>,
}

#[derive(Debug, Clone, Default)]
pub struct History {
    records: Vec<GenerationRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: GenerationRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    pub fn latest(&self) -> Option<&GenerationRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GenerationRecord> {
        self.records.iter()
    }

    /// Generations that ended in total extinction
    pub fn extinctions(&self) -> impl Iterator<Item = &GenerationRecord> {
        self.records.iter().filter(|r| r.extinction)
    }

    /// Write one JSON object per line
    pub fn write_json_lines<W: Write>(&self, mut writer: W) -> Result<()> {
        for record in &self.records {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a GenerationRecord;
    type IntoIter = std::slice::Iter<'a, GenerationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
