//! Genetic operators over flattened unit layers.

use rand::Rng;
use sapper_core::{HazardTier, Unit};
use sapper_world::{HazardBudget, HazardCounts};

const SPLIT_LOWER: f64 = 0.4;
const SPLIT_UPPER: f64 = 0.6;

/// Draws a crossover split between the 40th and 60th percentile of `len`.
///
/// The result always leaves at least one cell on each side when `len >= 2`.
pub fn split_index<R>(len: usize, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    if len < 2 {
        return len;
    }

    let min = (len as f64 * SPLIT_LOWER) as usize;
    let span = (len as f64 * SPLIT_UPPER - min as f64) as usize + 1;
    let index = min + rng.gen_range(0..span);
    index.clamp(1, len - 1)
}

/// Splices two parents at `split` into a pair of children.
///
/// The first child takes the first parent's prefix and the second parent's
/// suffix; the second child takes the opposite halves.
///
/// # Panics
///
/// Panics when the parents differ in length or `split` exceeds it.
#[must_use]
pub fn crossover(first: &[Unit], second: &[Unit], split: usize) -> (Vec<Unit>, Vec<Unit>) {
    assert_eq!(
        first.len(),
        second.len(),
        "crossover parents must share a length"
    );
    assert!(split <= first.len(), "split {split} past parent length");

    let mut first_child = Vec::with_capacity(first.len());
    first_child.extend_from_slice(&first[..split]);
    first_child.extend_from_slice(&second[split..]);

    let mut second_child = Vec::with_capacity(first.len());
    second_child.extend_from_slice(&second[..split]);
    second_child.extend_from_slice(&first[split..]);

    (first_child, second_child)
}

/// Clears hazards until the layer fits `budget`.
///
/// A tier above its cap loses its first occurrence, checked from easy to
/// hard. When every tier fits but the total is still too high, the first
/// hazard of the easiest tier present is cleared instead. Returns the number
/// of cleared cells.
pub fn repair_hazards(units: &mut [Unit], budget: &HazardBudget) -> usize {
    let mut cleared = 0;

    loop {
        let counts = HazardCounts::from_units(units);
        if counts.within(budget) {
            return cleared;
        }

        let over_cap = HazardTier::ALL
            .into_iter()
            .find(|tier| counts.count(*tier) > budget.cap(*tier));
        let victim = over_cap.or_else(|| {
            HazardTier::ALL
                .into_iter()
                .find(|tier| counts.count(*tier) > 0)
        });
        let Some(tier) = victim else {
            return cleared;
        };
        let Some(slot) = units.iter_mut().find(|unit| **unit == tier.unit()) else {
            return cleared;
        };

        *slot = Unit::None;
        cleared += 1;
    }
}

/// Overwrites one random cell past index 0 with a different mutation value.
///
/// Layers shorter than two cells are left untouched.
pub fn mutate<R>(units: &mut [Unit], rng: &mut R)
where
    R: Rng + ?Sized,
{
    if units.len() < 2 {
        return;
    }

    let index = rng.gen_range(1..units.len());
    let current = units[index];
    let mut replacement = current;
    while replacement == current {
        replacement = Unit::MUTATION_CHOICES[rng.gen_range(0..Unit::MUTATION_CHOICES.len())];
    }
    units[index] = replacement;
}
