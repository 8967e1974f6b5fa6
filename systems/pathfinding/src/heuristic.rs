//! Distance estimates plugged into the A* search.

use sapper_core::{CellCoord, Heuristic, Mover};

/// Straight-line distance to the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EuclideanHeuristic;

impl Heuristic for EuclideanHeuristic {
    fn estimate(&self, _mover: &dyn Mover, from: CellCoord, target: CellCoord) -> f32 {
        from.euclidean_distance(target)
    }
}

/// Grid distance to the target along the axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManhattanHeuristic;

impl Heuristic for ManhattanHeuristic {
    fn estimate(&self, _mover: &dyn Mover, from: CellCoord, target: CellCoord) -> f32 {
        from.manhattan_distance(target) as f32
    }
}
