#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic agent traversal that consumes planned paths one step at a time.

use log::debug;
use sapper_core::{CellCoord, Heuristic, Mover, Path, Terrain, TileMap, Unit};
use sapper_system_pathfinding::AStarPathFinder;
use sapper_world::GridMap;

/// Record of a single completed step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    /// Cell the agent left.
    pub from: CellCoord,
    /// Cell the agent now occupies.
    pub to: CellCoord,
    /// Unit that occupied `to` before the agent arrived.
    pub encountered: Unit,
}

/// Result of asking a traversal to advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// The agent moved into the next cell of the path.
    Moved(StepOutcome),
    /// The path holds no further steps.
    Arrived,
    /// The next cell became blocked for the mover; the caller should re-plan.
    Blocked {
        /// Cell the agent refused to enter.
        next: CellCoord,
    },
    /// The head step does not neighbour the agent's cell.
    Diverged,
}

/// Agent walking a grid map along planned paths.
#[derive(Clone, Debug)]
pub struct Traversal<M> {
    cell: CellCoord,
    mover: M,
}

impl<M> Traversal<M>
where
    M: Mover,
{
    /// Creates a traversal for an agent standing on `cell`.
    #[must_use]
    pub const fn new(cell: CellCoord, mover: M) -> Self {
        Self { cell, mover }
    }

    /// Cell the agent currently occupies.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Mover consulted for blocking decisions.
    #[must_use]
    pub const fn mover(&self) -> &M {
        &self.mover
    }

    /// Moves the agent into the next step of `path`.
    ///
    /// Leading steps on the agent's own cell are consumed first, so a path
    /// fresh from the pathfinder can be passed in unchanged. A successful move
    /// clears the unit of the old cell, places the agent on the new cell and
    /// sweeps its terrain back to empty.
    pub fn advance(&mut self, map: &mut GridMap, path: &mut Path) -> Advance {
        while path.head().map(|step| step.cell()) == Some(self.cell) {
            path.remove_step(0);
        }

        let Some(next) = path.head().map(|step| step.cell()) else {
            return Advance::Arrived;
        };
        if !self.cell.is_adjacent(next) {
            debug!(
                "path head ({}, {}) is not adjacent to agent at ({}, {})",
                next.column(),
                next.row(),
                self.cell.column(),
                self.cell.row()
            );
            return Advance::Diverged;
        }
        if map.blocked(&self.mover, next) {
            debug!("next cell ({}, {}) is blocked", next.column(), next.row());
            return Advance::Blocked { next };
        }

        let from = self.cell;
        let encountered = map.unit(next);
        map.set_unit(from, Unit::None);
        map.set_unit(next, Unit::Agent);
        map.set_terrain(next, Terrain::Empty);
        path.remove_step(0);
        self.cell = next;

        Advance::Moved(StepOutcome {
            from,
            to: next,
            encountered,
        })
    }

    /// Plans a fresh route from the agent's cell to `target`.
    pub fn repath<H>(
        &self,
        finder: &mut AStarPathFinder<H>,
        map: &mut GridMap,
        target: CellCoord,
    ) -> Option<Path>
    where
        H: Heuristic,
    {
        finder.find_path(map, &self.mover, self.cell, target)
    }
}
