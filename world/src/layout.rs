//! Random layout passes used by [`GridMap::randomize`](crate::GridMap::randomize).

use rand::Rng;
use sapper_core::{CellCoord, HazardTier, Terrain};

use crate::{GridMap, HazardBudget};

/// Fraction of the map area that seeds a 2x2 scanned block.
const SCANNED_BLOCK_FRACTION: f64 = 0.05;

/// Divisor applied to a random draw below each tier cap, easy to hard.
const TIER_DRAW_DIVISORS: [usize; 3] = [2, 3, 4];

pub(crate) fn scatter_unknown_patches<R>(map: &mut GridMap, rng: &mut R)
where
    R: Rng + ?Sized,
{
    for _ in 0..map.cell_count() {
        let cell = random_cell(map, rng);
        map.set_terrain(cell, Terrain::Unknown);
    }
}

pub(crate) fn scatter_scanned_blocks<R>(map: &mut GridMap, rng: &mut R)
where
    R: Rng + ?Sized,
{
    if map.width() < 2 || map.height() < 2 {
        return;
    }

    let blocks = (map.cell_count() as f64 * SCANNED_BLOCK_FRACTION).ceil() as usize;
    for _ in 0..blocks {
        let column = rng.gen_range(0..map.width() - 1);
        let row = rng.gen_range(0..map.height() - 1);
        for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            map.set_terrain(CellCoord::new(column + dx, row + dy), Terrain::Scanned);
        }
    }
}

pub(crate) fn scatter_hazards<R>(map: &mut GridMap, budget: &HazardBudget, rng: &mut R)
where
    R: Rng + ?Sized,
{
    for (tier, divisor) in HazardTier::ALL.into_iter().zip(TIER_DRAW_DIVISORS) {
        let cap = budget.cap(tier);
        if cap == 0 {
            continue;
        }
        let count = rng.gen_range(0..cap) / divisor;
        for _ in 0..count {
            let cell = random_cell(map, rng);
            map.set_unit(cell, tier.unit());
        }
    }
}

fn random_cell<R>(map: &GridMap, rng: &mut R) -> CellCoord
where
    R: Rng + ?Sized,
{
    CellCoord::new(rng.gen_range(0..map.width()), rng.gen_range(0..map.height()))
}
