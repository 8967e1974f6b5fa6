use sapper_core::{CellCoord, Unit};
use sapper_system_fitness::{column_fitness, composite_fitness, row_fitness, FitnessWeights};
use sapper_world::{GridMap, HazardBudget, HazardBudgetConfig};

fn random_map(seed: u64) -> GridMap {
    let budget = HazardBudget::for_cell_count(20 * 20, &HazardBudgetConfig::default());
    GridMap::seeded(20, 20, &budget, seed)
}

#[test]
fn clearing_a_cell_never_lowers_column_or_row_fitness() {
    let weights = FitnessWeights::default();

    for seed in 0..4 {
        let map = random_map(seed);
        let column_before = column_fitness(&map.unit_view(), &weights);
        let row_before = row_fitness(&map.unit_view(), &weights);

        for index in 0..map.cell_count() {
            let cell = map.cell_at(index);
            if map.unit(cell) == Unit::None {
                continue;
            }

            let mut cleared = map.clone();
            cleared.set_unit(cell, Unit::None);

            let column_after = column_fitness(&cleared.unit_view(), &weights);
            let row_after = row_fitness(&cleared.unit_view(), &weights);
            assert!(
                column_after >= column_before,
                "seed {seed}: clearing {cell:?} dropped column fitness {column_before} -> {column_after}"
            );
            assert!(
                row_after >= row_before,
                "seed {seed}: clearing {cell:?} dropped row fitness {row_before} -> {row_after}"
            );
        }
    }
}

#[test]
fn adding_a_hazard_to_an_occupied_cell_raises_composite() {
    let weights = FitnessWeights::default();
    let mut map = GridMap::new(5, 5);
    map.set_unit(CellCoord::new(2, 2), Unit::Track);
    let before = composite_fitness(&map.unit_view(), &weights);

    map.set_unit(CellCoord::new(2, 2), Unit::HardHazard);
    let after = composite_fitness(&map.unit_view(), &weights);

    assert!(after > before, "hazard did not raise fitness: {before} -> {after}");
}

#[test]
fn scoring_is_pure() {
    let weights = FitnessWeights::default();
    let map = random_map(11);

    let first = composite_fitness(&map.unit_view(), &weights);
    let second = composite_fitness(&map.unit_view(), &weights);

    assert_eq!(first.to_bits(), second.to_bits());
}
