#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic A* search over any [`TileMap`].
//!
//! The finder keeps one search record per cell and reuses that arena across
//! calls, so a single instance plans one route at a time through `&mut self`.
//! Frontier entries live in a binary heap with lazy deletion: every node
//! remembers the sequence number of its live heap entry and stale entries are
//! discarded when popped. Equal scores are resolved by insertion order, which
//! keeps routes reproducible between runs.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::trace;
use sapper_core::{CellCoord, Direction, Heuristic, Mover, Path, TileMap};
use serde::{Deserialize, Serialize};

mod heuristic;

pub use heuristic::{EuclideanHeuristic, ManhattanHeuristic};

/// Neighbour offsets in expansion order, west column first.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Limits and topology applied to every search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search stops once a discovered node sits this many steps from the start.
    pub max_search_distance: u32,
    /// Whether diagonal neighbours are considered.
    pub allow_diagonal: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_search_distance: 500,
            allow_diagonal: false,
        }
    }
}

/// Counters describing the most recent search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    expanded: usize,
    deepest: u32,
}

impl SearchStats {
    /// Number of nodes moved into the expanded set.
    #[must_use]
    pub const fn expanded(&self) -> usize {
        self.expanded
    }

    /// Largest step count assigned to any discovered node.
    #[must_use]
    pub const fn deepest(&self) -> u32 {
        self.deepest
    }
}

/// A* pathfinder generic over its heuristic.
#[derive(Debug)]
pub struct AStarPathFinder<H = EuclideanHeuristic> {
    config: SearchConfig,
    heuristic: H,
    nodes: Vec<Node>,
    frontier: BinaryHeap<FrontierEntry>,
    next_sequence: u64,
    columns: u32,
    rows: u32,
    stats: SearchStats,
}

impl AStarPathFinder<EuclideanHeuristic> {
    /// Creates a finder that estimates remaining cost by straight-line distance.
    #[must_use]
    pub fn new(config: SearchConfig) -> Self {
        Self::with_heuristic(config, EuclideanHeuristic)
    }
}

impl<H> AStarPathFinder<H>
where
    H: Heuristic,
{
    /// Creates a finder that uses the provided heuristic.
    #[must_use]
    pub fn with_heuristic(config: SearchConfig, heuristic: H) -> Self {
        Self {
            config,
            heuristic,
            nodes: Vec::new(),
            frontier: BinaryHeap::new(),
            next_sequence: 0,
            columns: 0,
            rows: 0,
            stats: SearchStats::default(),
        }
    }

    /// Limits applied to every search.
    #[must_use]
    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Counters recorded by the most recent call to [`Self::find_path`].
    #[must_use]
    pub const fn last_search(&self) -> SearchStats {
        self.stats
    }

    /// Searches for the cheapest route from `start` to `target`.
    ///
    /// Returns `None` when the target is blocked for `mover`, unreachable, or
    /// lies beyond the search distance. The returned path begins at `start`
    /// and ends at `target`. Visited markers left by an earlier search are
    /// cleared once the target is known to be enterable.
    ///
    /// # Panics
    ///
    /// Panics when `start` or `target` lies outside the map.
    pub fn find_path<M>(
        &mut self,
        map: &mut M,
        mover: &dyn Mover,
        start: CellCoord,
        target: CellCoord,
    ) -> Option<Path>
    where
        M: TileMap + ?Sized,
    {
        self.prepare_workspace(map.width(), map.height());
        assert!(
            map.contains(start),
            "start ({}, {}) outside {}x{} map",
            start.column(),
            start.row(),
            self.columns,
            self.rows
        );
        assert!(
            map.contains(target),
            "target ({}, {}) outside {}x{} map",
            target.column(),
            target.row(),
            self.columns,
            self.rows
        );

        if map.blocked(mover, target) {
            trace!(
                "target ({}, {}) blocked for {:?} mover",
                target.column(),
                target.row(),
                mover.personality()
            );
            return None;
        }
        map.clear_visited();

        let start_index = self.index(start);
        let target_index = self.index(target);
        self.nodes[start_index].cost = 0.0;
        self.push_frontier(start_index, 0.0);

        while self.stats.deepest < self.config.max_search_distance {
            let Some(entry) = self.frontier.pop() else {
                break;
            };
            if self.nodes[entry.index].state != NodeState::Frontier(entry.sequence) {
                continue;
            }
            if entry.index == target_index {
                break;
            }

            self.nodes[entry.index].state = NodeState::Expanded;
            self.stats.expanded += 1;
            self.expand(map, mover, entry.index, start, target);
        }

        trace!(
            "searched ({}, {}) -> ({}, {}): expanded {}, deepest {}",
            start.column(),
            start.row(),
            target.column(),
            target.row(),
            self.stats.expanded,
            self.stats.deepest
        );

        if self.nodes[target_index].parent.is_none() {
            return None;
        }
        Some(self.reconstruct(target_index))
    }

    fn expand<M>(
        &mut self,
        map: &mut M,
        mover: &dyn Mover,
        current: usize,
        start: CellCoord,
        target: CellCoord,
    ) where
        M: TileMap + ?Sized,
    {
        let cell = self.cell_at(current);
        let current_cost = self.nodes[current].cost;
        let next_depth = self.nodes[current].depth + 1;

        for (dx, dy) in NEIGHBOR_OFFSETS {
            if !self.config.allow_diagonal && dx != 0 && dy != 0 {
                continue;
            }
            let Some(neighbor) = self.offset(cell, dx, dy) else {
                continue;
            };
            if neighbor != start && map.blocked(mover, neighbor) {
                continue;
            }
            map.mark_visited(neighbor);

            let index = self.index(neighbor);
            let tentative = current_cost + map.movement_cost(mover, cell, neighbor);
            let node = &mut self.nodes[index];
            if tentative < node.cost {
                node.state = NodeState::Unseen;
            }
            if node.state != NodeState::Unseen {
                continue;
            }

            node.cost = tentative;
            node.estimate = self.heuristic.estimate(mover, neighbor, target);
            node.parent = Some(current);
            node.depth = next_depth;
            let total = node.cost + node.estimate;
            self.stats.deepest = self.stats.deepest.max(next_depth);
            self.push_frontier(index, total);
        }
    }

    fn reconstruct(&self, target_index: usize) -> Path {
        let mut path = Path::new();
        let mut child = target_index;
        path.prepend(self.cell_at(child), None);

        while let Some(parent) = self.nodes[child].parent {
            let parent_cell = self.cell_at(parent);
            path.prepend(
                parent_cell,
                Direction::between(parent_cell, self.cell_at(child)),
            );
            child = parent;
        }

        path
    }

    fn prepare_workspace(&mut self, columns: u32, rows: u32) {
        self.columns = columns;
        self.rows = rows;
        self.nodes.clear();
        self.nodes
            .resize(columns as usize * rows as usize, Node::default());
        self.frontier.clear();
        self.next_sequence = 0;
        self.stats = SearchStats::default();
    }

    fn push_frontier(&mut self, index: usize, total: f32) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.nodes[index].state = NodeState::Frontier(sequence);
        self.frontier.push(FrontierEntry {
            total,
            sequence,
            index,
        });
    }

    fn offset(&self, cell: CellCoord, dx: i32, dy: i32) -> Option<CellCoord> {
        let column = cell.column().checked_add_signed(dx)?;
        let row = cell.row().checked_add_signed(dy)?;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        Some(CellCoord::new(column, row))
    }

    fn index(&self, cell: CellCoord) -> usize {
        cell.row() as usize * self.columns as usize + cell.column() as usize
    }

    fn cell_at(&self, index: usize) -> CellCoord {
        let columns = self.columns as usize;
        CellCoord::new((index % columns) as u32, (index / columns) as u32)
    }
}

impl Default for AStarPathFinder<EuclideanHeuristic> {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NodeState {
    Unseen,
    Frontier(u64),
    Expanded,
}

#[derive(Clone, Copy, Debug)]
struct Node {
    cost: f32,
    estimate: f32,
    parent: Option<usize>,
    depth: u32,
    state: NodeState,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            cost: f32::INFINITY,
            estimate: 0.0,
            parent: None,
            depth: 0,
            state: NodeState::Unseen,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct FrontierEntry {
    total: f32,
    sequence: u64,
    index: usize,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    // Reversed so the max-heap pops the lowest score, then the oldest entry.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .total
            .total_cmp(&self.total)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapper_core::{Personality, UnitMover};

    /// Open grid with an explicit wall set and a visit log.
    struct WallGrid {
        width: u32,
        height: u32,
        walls: Vec<CellCoord>,
        visited: Vec<CellCoord>,
    }

    impl WallGrid {
        fn new(width: u32, height: u32, walls: Vec<CellCoord>) -> Self {
            Self {
                width,
                height,
                walls,
                visited: Vec::new(),
            }
        }
    }

    impl TileMap for WallGrid {
        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn blocked(&self, _mover: &dyn Mover, cell: CellCoord) -> bool {
            self.walls.contains(&cell)
        }

        fn movement_cost(&self, _mover: &dyn Mover, _from: CellCoord, _to: CellCoord) -> f32 {
            1.0
        }

        fn mark_visited(&mut self, cell: CellCoord) {
            self.visited.push(cell);
        }

        fn clear_visited(&mut self) {
            self.visited.clear();
        }
    }

    fn mover() -> UnitMover {
        UnitMover::new(Personality::Neutral)
    }

    #[test]
    fn frontier_pops_lowest_score_then_oldest() {
        let mut heap = BinaryHeap::new();
        heap.push(FrontierEntry {
            total: 3.0,
            sequence: 0,
            index: 0,
        });
        heap.push(FrontierEntry {
            total: 2.0,
            sequence: 2,
            index: 1,
        });
        heap.push(FrontierEntry {
            total: 2.0,
            sequence: 1,
            index: 2,
        });

        let order: Vec<_> = std::iter::from_fn(|| heap.pop().map(|entry| entry.index)).collect();

        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn straight_corridor_produces_annotated_steps() {
        let mut grid = WallGrid::new(4, 1, Vec::new());
        let mut finder = AStarPathFinder::default();

        let path = finder
            .find_path(&mut grid, &mover(), CellCoord::new(0, 0), CellCoord::new(3, 0))
            .expect("corridor is open");

        let steps: Vec<_> = path.iter().map(|step| (step.x(), step.action())).collect();
        assert_eq!(
            steps,
            vec![
                (0, Some(Direction::East)),
                (1, Some(Direction::East)),
                (2, Some(Direction::East)),
                (3, None),
            ]
        );
        assert_eq!(finder.last_search().deepest(), 3);
    }

    #[test]
    fn identical_start_and_target_has_no_route() {
        let mut grid = WallGrid::new(3, 3, Vec::new());
        let mut finder = AStarPathFinder::default();
        let cell = CellCoord::new(1, 1);

        assert!(finder.find_path(&mut grid, &mover(), cell, cell).is_none());
    }

    #[test]
    fn blocked_start_is_exempt() {
        let start = CellCoord::new(0, 0);
        let mut grid = WallGrid::new(3, 1, vec![start]);
        let mut finder = AStarPathFinder::default();

        let path = finder.find_path(&mut grid, &mover(), start, CellCoord::new(2, 0));

        assert_eq!(path.map(|path| path.len()), Some(3));
    }

    #[test]
    fn wall_forces_detour() {
        let walls = vec![CellCoord::new(1, 0), CellCoord::new(1, 1)];
        let mut grid = WallGrid::new(3, 3, walls.clone());
        let mut finder = AStarPathFinder::default();

        let path = finder
            .find_path(&mut grid, &mover(), CellCoord::new(0, 0), CellCoord::new(2, 0))
            .expect("detour through the bottom row");

        assert_eq!(path.move_count(), 6);
        for wall in walls {
            assert!(!path.contains_cell(wall));
        }
    }

    #[test]
    fn sealed_target_is_unreachable() {
        let walls = vec![CellCoord::new(1, 0), CellCoord::new(0, 1)];
        let mut grid = WallGrid::new(3, 3, walls);
        let mut finder = AStarPathFinder::default();

        let path = finder.find_path(&mut grid, &mover(), CellCoord::new(2, 2), CellCoord::new(0, 0));

        assert!(path.is_none());
        assert!(finder.last_search().expanded() > 0);
    }

    #[test]
    fn diagonal_search_cuts_corners() {
        let mut grid = WallGrid::new(5, 5, Vec::new());
        let config = SearchConfig {
            allow_diagonal: true,
            ..SearchConfig::default()
        };
        let mut finder = AStarPathFinder::new(config);
        assert!(finder.config().allow_diagonal);

        let path = finder
            .find_path(&mut grid, &mover(), CellCoord::new(0, 0), CellCoord::new(4, 4))
            .expect("open grid");

        assert_eq!(path.move_count(), 4);
        assert_eq!(
            path.head().and_then(|step| step.action()),
            Some(Direction::SouthEast)
        );
    }

    #[test]
    fn workspace_resizes_between_maps() {
        let mut finder = AStarPathFinder::default();
        let mut small = WallGrid::new(2, 2, Vec::new());
        let mut large = WallGrid::new(6, 3, Vec::new());

        let first = finder.find_path(&mut small, &mover(), CellCoord::new(0, 0), CellCoord::new(1, 1));
        let second = finder.find_path(&mut large, &mover(), CellCoord::new(0, 0), CellCoord::new(5, 2));

        assert_eq!(first.map(|path| path.move_count()), Some(2));
        assert_eq!(second.map(|path| path.move_count()), Some(7));
    }

    #[test]
    #[should_panic(expected = "target (9, 0) outside 3x3 map")]
    fn out_of_bounds_target_panics() {
        let mut grid = WallGrid::new(3, 3, Vec::new());
        let mut finder = AStarPathFinder::default();

        let _ = finder.find_path(&mut grid, &mover(), CellCoord::new(0, 0), CellCoord::new(9, 0));
    }

    #[test]
    fn visits_are_reported_to_the_map() {
        let mut grid = WallGrid::new(3, 1, Vec::new());
        let mut finder = AStarPathFinder::default();

        let _ = finder.find_path(&mut grid, &mover(), CellCoord::new(0, 0), CellCoord::new(2, 0));

        assert!(grid.visited.contains(&CellCoord::new(1, 0)));
    }
}
