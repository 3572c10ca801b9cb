//! Orderings over organisms
//!
//! Parent selection ranks by longevity; the history's "fittest survivor"
//! ranks by stability. Both are total orders on `f64` via `total_cmp` and
//! are meant for stable sorts, so equal keys keep population order.

use std::cmp::Ordering;

use crate::organism::Organism;

/// Age descending, then lower cumulative discrepancy first
pub fn by_longevity(a: &Organism, b: &Organism) -> Ordering {
    b.age()
        .cmp(&a.age())
        .then_with(|| a.cumulative_discrepancy().total_cmp(&b.cumulative_discrepancy()))
}

/// Lower cumulative discrepancy first, then age descending
pub fn by_fitness(a: &Organism, b: &Organism) -> Ordering {
    a.cumulative_discrepancy()
        .total_cmp(&b.cumulative_discrepancy())
        .then_with(|| b.age().cmp(&a.age()))
}

/// Best organism under [`by_fitness`]; the first encountered wins ties
pub fn fittest<'a, I>(organisms: I) -> Option<&'a Organism>
where
    I: IntoIterator<Item = &'a Organism>,
{
    organisms.into_iter().fold(None, |best, candidate| match best {
        Some(current) if by_fitness(candidate, current) != Ordering::Less => Some(current),
        _ => Some(candidate),
    })
}
