//! Parent selection: oldest survivors, or the longest-lived dead on extinction

use serde::{Deserialize, Serialize};

use crate::environment::breeding::fraction_of;
use crate::fitness::by_longevity;
use crate::organism::Organism;

/// Pool the parents were drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentSource {
    Survivors,
    /// Nobody survived; the longest-lived dead organisms breed instead
    Extinction,
}

#[derive(Debug)]
pub struct ParentSelection {
    /// Ranked best-first
    pub parents: Vec<Organism>,
    pub source: ParentSource,
    pub survivors: usize,
    pub dead: usize,
}

impl ParentSelection {
    pub fn is_extinction(&self) -> bool {
        self.source == ParentSource::Extinction
    }
}

/// Rank the pool by longevity and keep the top `ceil(fraction * pool)`.
///
/// An empty population yields no parents.
pub fn select_parents(population: Vec<Organism>, fraction: f64) -> ParentSelection {
    let (survivors, dead): (Vec<Organism>, Vec<Organism>) =
        population.into_iter().partition(Organism::is_alive);
    let (survivor_count, dead_count) = (survivors.len(), dead.len());

    let (mut pool, source) = if survivors.is_empty() {
        (dead, ParentSource::Extinction)
    } else {
        (survivors, ParentSource::Survivors)
    };

    pool.sort_by(by_longevity);
    pool.truncate(fraction_of(pool.len(), fraction));

    ParentSelection {
        parents: pool,
        source,
        survivors: survivor_count,
        dead: dead_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organism::testing::organism_with;

    fn ids(selection: &ParentSelection) -> Vec<u64> {
        selection.parents.iter().map(|o| o.id().0).collect()
    }

    #[test]
    fn test_survivors_ranked_by_age() {
        let population = vec![
            organism_with(0, 3, 0.0, true),
            organism_with(1, 9, 0.0, true),
            organism_with(2, 20, 0.0, false),
            organism_with(3, 7, 0.0, true),
            organism_with(4, 8, 0.0, true),
            organism_with(5, 1, 0.0, true),
        ];
        let selection = select_parents(population, 0.2);
        assert_eq!(selection.source, ParentSource::Survivors);
        assert_eq!(selection.survivors, 5);
        assert_eq!(selection.dead, 1);
        // ceil(0.2 * 5) = 1, the dead elder is ignored
        assert_eq!(ids(&selection), vec![1]);
    }

    #[test]
    fn test_extinction_fallback() {
        let population = vec![
            organism_with(0, 4, 10.0, false),
            organism_with(1, 4, 10.0, false),
            organism_with(2, 2, 10.0, false),
        ];
        let selection = select_parents(population, 0.2);
        assert!(selection.is_extinction());
        // ceil(0.2 * 3) = 1, first encountered wins the age tie
        assert_eq!(ids(&selection), vec![0]);
    }

    #[test]
    fn test_extinction_single_dead() {
        let selection = select_parents(vec![organism_with(0, 1, 0.0, false)], 0.2);
        assert!(selection.is_extinction());
        assert_eq!(ids(&selection), vec![0]);
    }

    #[test]
    fn test_empty_population() {
        let selection = select_parents(Vec::new(), 0.2);
        assert!(selection.parents.is_empty());
        assert_eq!(selection.survivors + selection.dead, 0);
    }

    #[test]
    fn test_age_tie_prefers_lower_discrepancy() {
        let population = vec![
            organism_with(0, 10, 30.0, true),
            organism_with(1, 10, 5.0, true),
            organism_with(2, 10, 20.0, true),
            organism_with(3, 10, 1.0, true),
        ];
        let selection = select_parents(population, 0.5);
        assert_eq!(ids(&selection), vec![3, 1]);
    }
}
