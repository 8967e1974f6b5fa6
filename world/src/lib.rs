#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid map state for Sapper.
//!
//! A [`GridMap`] owns three dense row-major layers: terrain, units, and the
//! visited markers written by the pathfinder. Cells outside the map are a
//! programming error and every accessor panics on them instead of clamping.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sapper_core::{
    CellCoord, HazardTier, Mover, Personality, Terrain, TileMap, Unit, UnitGridView,
};

mod budget;
mod layout;

pub use budget::{HazardBudget, HazardBudgetConfig, HazardCounts};

/// Cell that receives the agent on freshly generated maps.
pub const AGENT_ORIGIN: CellCoord = CellCoord::new(0, 0);

/// Two-layer tile map searched by the pathfinder and evolved by the generator.
#[derive(Clone, Debug, PartialEq)]
pub struct GridMap {
    width: u32,
    height: u32,
    terrain: Vec<Terrain>,
    units: Vec<Unit>,
    visited: Vec<bool>,
}

impl GridMap {
    /// Creates a map with empty terrain and no units.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let cell_count = cell_count(width, height);
        Self {
            width,
            height,
            terrain: vec![Terrain::Empty; cell_count],
            units: vec![Unit::None; cell_count],
            visited: vec![false; cell_count],
        }
    }

    /// Rebuilds a map from previously captured layers.
    ///
    /// # Panics
    ///
    /// Panics when either layer does not hold exactly `width * height` cells.
    #[must_use]
    pub fn from_layers(width: u32, height: u32, terrain: Vec<Terrain>, units: Vec<Unit>) -> Self {
        let cell_count = cell_count(width, height);
        assert_eq!(
            terrain.len(),
            cell_count,
            "terrain layer does not match {width}x{height} map"
        );
        assert_eq!(
            units.len(),
            cell_count,
            "unit layer does not match {width}x{height} map"
        );
        Self {
            width,
            height,
            terrain,
            units,
            visited: vec![false; cell_count],
        }
    }

    /// Creates a randomly laid out map using the provided random source.
    #[must_use]
    pub fn random<R>(width: u32, height: u32, budget: &HazardBudget, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut map = Self::new(width, height);
        map.randomize(budget, rng);
        map
    }

    /// Creates a randomly laid out map reproducible from `seed`.
    #[must_use]
    pub fn seeded(width: u32, height: u32, budget: &HazardBudget, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::random(width, height, budget, &mut rng)
    }

    /// Replaces both layers with a fresh random layout.
    ///
    /// Terrain receives scattered unknown patches and a few 2x2 scanned
    /// blocks. Hazards are scattered within the budget's tier caps and the
    /// agent is placed at [`AGENT_ORIGIN`].
    pub fn randomize<R>(&mut self, budget: &HazardBudget, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.terrain.fill(Terrain::Empty);
        self.units.fill(Unit::None);
        self.visited.fill(false);
        if self.units.is_empty() {
            return;
        }

        layout::scatter_unknown_patches(self, rng);
        layout::scatter_scanned_blocks(self, rng);
        layout::scatter_hazards(self, budget, rng);
        self.set_unit(AGENT_ORIGIN, Unit::Agent);
    }

    /// Replaces only the terrain layer with a fresh random layout.
    pub fn randomize_terrain<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.terrain.fill(Terrain::Empty);
        if self.terrain.is_empty() {
            return;
        }
        layout::scatter_unknown_patches(self, rng);
        layout::scatter_scanned_blocks(self, rng);
    }

    /// Number of columns in the map.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the map.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Width and height of the map.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total number of cells in the map.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.units.len()
    }

    /// Terrain stored at `cell`.
    #[must_use]
    pub fn terrain(&self, cell: CellCoord) -> Terrain {
        self.terrain[self.index(cell)]
    }

    /// Unit stored at `cell`.
    #[must_use]
    pub fn unit(&self, cell: CellCoord) -> Unit {
        self.units[self.index(cell)]
    }

    /// Overwrites the terrain at `cell`.
    pub fn set_terrain(&mut self, cell: CellCoord, terrain: Terrain) {
        let index = self.index(cell);
        self.terrain[index] = terrain;
    }

    /// Overwrites the unit at `cell`.
    pub fn set_unit(&mut self, cell: CellCoord, unit: Unit) {
        let index = self.index(cell);
        self.units[index] = unit;
    }

    /// Reports whether the pathfinder examined `cell` since the last reset.
    #[must_use]
    pub fn is_visited(&self, cell: CellCoord) -> bool {
        self.visited[self.index(cell)]
    }

    /// Clears every visited marker.
    pub fn clear_visited(&mut self) {
        self.visited.fill(false);
    }

    /// Number of cells currently marked as visited.
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.visited.iter().filter(|visited| **visited).count()
    }

    /// Flattened terrain layer in row-major order.
    #[must_use]
    pub fn terrain_cells(&self) -> &[Terrain] {
        &self.terrain
    }

    /// Flattened unit layer in row-major order.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Read-only view over the unit layer.
    #[must_use]
    pub fn unit_view(&self) -> UnitGridView<'_> {
        UnitGridView::new(&self.units, self.width, self.height)
    }

    /// Replaces the unit layer with a flattened row-major grid.
    ///
    /// # Panics
    ///
    /// Panics when `units` does not hold exactly one value per cell.
    pub fn replace_units(&mut self, units: Vec<Unit>) {
        assert_eq!(
            units.len(),
            self.units.len(),
            "unit layer does not match {}x{} map",
            self.width,
            self.height
        );
        self.units = units;
    }

    /// Tallies the hazards on the unit layer.
    #[must_use]
    pub fn hazard_counts(&self) -> HazardCounts {
        HazardCounts::from_units(&self.units)
    }

    /// First cell holding the agent, scanning rows from the north.
    #[must_use]
    pub fn agent_cell(&self) -> Option<CellCoord> {
        self.units
            .iter()
            .position(|unit| *unit == Unit::Agent)
            .map(|index| self.cell_at(index))
    }

    /// Moves the single agent to `cell`, clearing any other agent markers.
    pub fn place_agent(&mut self, cell: CellCoord) {
        let index = self.index(cell);
        for unit in self.units.iter_mut().filter(|unit| **unit == Unit::Agent) {
            *unit = Unit::None;
        }
        self.units[index] = Unit::Agent;
    }

    /// Converts a row-major index back into a cell coordinate.
    ///
    /// # Panics
    ///
    /// Panics when `index` lies outside the map.
    #[must_use]
    pub fn cell_at(&self, index: usize) -> CellCoord {
        assert!(
            index < self.units.len(),
            "index {index} outside {}x{} map",
            self.width,
            self.height
        );
        let width = self.width as usize;
        CellCoord::new((index % width) as u32, (index / width) as u32)
    }

    fn index(&self, cell: CellCoord) -> usize {
        assert!(
            cell.column() < self.width && cell.row() < self.height,
            "cell ({}, {}) outside {}x{} map",
            cell.column(),
            cell.row(),
            self.width,
            self.height
        );
        cell.row() as usize * self.width as usize + cell.column() as usize
    }
}

impl TileMap for GridMap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn blocked(&self, mover: &dyn Mover, cell: CellCoord) -> bool {
        let index = self.index(cell);
        let terrain = self.terrain[index];
        let hazard = self.units[index].is_hazard();

        match mover.personality() {
            Personality::Cautious => {
                terrain == Terrain::Scanned || (terrain == Terrain::Empty && hazard)
            }
            Personality::Reckless => terrain == Terrain::Empty && hazard,
            Personality::Neutral => false,
        }
    }

    fn movement_cost(&self, _mover: &dyn Mover, _from: CellCoord, _to: CellCoord) -> f32 {
        1.0
    }

    fn mark_visited(&mut self, cell: CellCoord) {
        let index = self.index(cell);
        self.visited[index] = true;
    }

    fn clear_visited(&mut self) {
        self.visited.fill(false);
    }
}

/// Per-tier hazard totals of a unit layer, ordered easy to hard.
#[must_use]
pub fn tier_counts(map: &GridMap) -> [(HazardTier, usize); 3] {
    let counts = map.hazard_counts();
    HazardTier::ALL.map(|tier| (tier, counts.count(tier)))
}

fn cell_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapper_core::UnitMover;

    fn budget_for(map: &GridMap) -> HazardBudget {
        HazardBudget::for_cell_count(map.cell_count(), &HazardBudgetConfig::default())
    }

    #[test]
    fn new_map_is_empty() {
        let map = GridMap::new(4, 3);

        assert_eq!(map.dimensions(), (4, 3));
        assert_eq!(map.cell_count(), 12);
        assert!(map.terrain_cells().iter().all(|t| *t == Terrain::Empty));
        assert!(map.units().iter().all(|u| *u == Unit::None));
        assert_eq!(map.visited_count(), 0);
    }

    #[test]
    fn setters_round_trip_through_row_major_storage() {
        let mut map = GridMap::new(4, 3);
        let cell = CellCoord::new(3, 1);

        map.set_unit(cell, Unit::MediumHazard);
        map.set_terrain(cell, Terrain::Unknown);

        assert_eq!(map.unit(cell), Unit::MediumHazard);
        assert_eq!(map.terrain(cell), Terrain::Unknown);
        assert_eq!(map.units()[7], Unit::MediumHazard);
        assert_eq!(map.cell_at(7), cell);
    }

    #[test]
    #[should_panic(expected = "outside 4x3 map")]
    fn out_of_bounds_access_fails_fast() {
        let map = GridMap::new(4, 3);
        let _ = map.unit(CellCoord::new(4, 0));
    }

    #[test]
    fn cautious_mover_blocking_rule() {
        let mut map = GridMap::new(3, 1);
        let mover = UnitMover::new(Personality::Cautious);
        let scanned = CellCoord::new(0, 0);
        let visible_hazard = CellCoord::new(1, 0);
        let hidden_hazard = CellCoord::new(2, 0);

        map.set_terrain(scanned, Terrain::Scanned);
        map.set_unit(visible_hazard, Unit::EasyHazard);
        map.set_terrain(hidden_hazard, Terrain::Unknown);
        map.set_unit(hidden_hazard, Unit::HardHazard);

        assert!(map.blocked(&mover, scanned));
        assert!(map.blocked(&mover, visible_hazard));
        assert!(!map.blocked(&mover, hidden_hazard));
    }

    #[test]
    fn hazard_on_scanned_ground_only_blocks_through_scanned_rule() {
        let mut map = GridMap::new(1, 1);
        let cell = CellCoord::new(0, 0);
        map.set_terrain(cell, Terrain::Scanned);
        map.set_unit(cell, Unit::HardHazard);

        assert!(map.blocked(&UnitMover::new(Personality::Cautious), cell));
        assert!(!map.blocked(&UnitMover::new(Personality::Reckless), cell));
    }

    #[test]
    fn reckless_mover_only_avoids_visible_hazards() {
        let mut map = GridMap::new(3, 1);
        let mover = UnitMover::new(Personality::Reckless);
        map.set_terrain(CellCoord::new(0, 0), Terrain::Scanned);
        map.set_unit(CellCoord::new(1, 0), Unit::MediumHazard);
        map.set_unit(CellCoord::new(2, 0), Unit::Track);

        assert!(!map.blocked(&mover, CellCoord::new(0, 0)));
        assert!(map.blocked(&mover, CellCoord::new(1, 0)));
        assert!(!map.blocked(&mover, CellCoord::new(2, 0)));
    }

    #[test]
    fn neutral_mover_is_never_blocked() {
        let mut map = GridMap::new(2, 1);
        let mover = UnitMover::new(Personality::Neutral);
        map.set_terrain(CellCoord::new(0, 0), Terrain::Scanned);
        map.set_unit(CellCoord::new(1, 0), Unit::HardHazard);

        assert!(!map.blocked(&mover, CellCoord::new(0, 0)));
        assert!(!map.blocked(&mover, CellCoord::new(1, 0)));
    }

    #[test]
    fn mark_visited_is_idempotent() {
        let mut map = GridMap::new(2, 2);
        let cell = CellCoord::new(1, 1);

        map.mark_visited(cell);
        map.mark_visited(cell);

        assert!(map.is_visited(cell));
        assert_eq!(map.visited_count(), 1);

        map.clear_visited();
        assert_eq!(map.visited_count(), 0);
    }

    #[test]
    fn randomize_places_single_agent_at_origin() {
        let mut map = GridMap::new(20, 20);
        let budget = budget_for(&map);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        map.randomize(&budget, &mut rng);

        assert_eq!(map.unit(AGENT_ORIGIN), Unit::Agent);
        assert_eq!(
            map.units().iter().filter(|u| **u == Unit::Agent).count(),
            1
        );
    }

    #[test]
    fn randomize_respects_tier_caps() {
        for seed in 0..16 {
            let map = GridMap::seeded(20, 20, &budget_for(&GridMap::new(20, 20)), seed);
            let budget = budget_for(&map);
            let counts = map.hazard_counts();

            for tier in HazardTier::ALL {
                assert!(
                    counts.count(tier) <= budget.cap(tier),
                    "seed {seed} exceeded {tier:?} cap"
                );
            }
            assert!(counts.total() <= budget.ceiling());
        }
    }

    #[test]
    fn randomize_scatters_scanned_blocks() {
        let map = GridMap::seeded(20, 20, &budget_for(&GridMap::new(20, 20)), 3);

        let scanned = map
            .terrain_cells()
            .iter()
            .filter(|terrain| **terrain == Terrain::Scanned)
            .count();

        assert!(scanned >= 4, "expected at least one 2x2 scanned block");
    }

    #[test]
    fn seeded_maps_are_reproducible() {
        let budget = budget_for(&GridMap::new(12, 9));

        assert_eq!(
            GridMap::seeded(12, 9, &budget, 99),
            GridMap::seeded(12, 9, &budget, 99)
        );
    }

    #[test]
    fn place_agent_keeps_a_single_marker() {
        let mut map = GridMap::new(3, 3);
        map.set_unit(CellCoord::new(0, 0), Unit::Agent);
        map.set_unit(CellCoord::new(2, 2), Unit::Agent);

        map.place_agent(CellCoord::new(1, 1));

        assert_eq!(map.agent_cell(), Some(CellCoord::new(1, 1)));
        assert_eq!(
            map.units().iter().filter(|u| **u == Unit::Agent).count(),
            1
        );
    }

    #[test]
    fn tier_counts_follow_severity_order() {
        let mut map = GridMap::new(3, 1);
        map.set_unit(CellCoord::new(0, 0), Unit::HardHazard);
        map.set_unit(CellCoord::new(1, 0), Unit::HardHazard);
        map.set_unit(CellCoord::new(2, 0), Unit::EasyHazard);

        assert_eq!(
            tier_counts(&map),
            [
                (HazardTier::Easy, 1),
                (HazardTier::Medium, 0),
                (HazardTier::Hard, 2)
            ]
        );
    }
}
