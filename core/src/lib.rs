#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Sapper engine.
//!
//! This crate defines the vocabulary that connects the authoritative grid map,
//! the pure search and generation systems, and the command-line adapter. Maps
//! implement [`TileMap`] so the pathfinder can stay generic over storage,
//! agents are represented by a [`Mover`] capability token, and searches return
//! a [`Path`] that movement logic consumes one step at a time.

use serde::{Deserialize, Serialize};

mod path;

pub use path::{Path, Step};

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Columns grow eastward and rows grow southward, so `(0, 0)` is the
/// north-west corner of every map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Computes the straight-line distance between two cell coordinates.
    #[must_use]
    pub fn euclidean_distance(self, other: CellCoord) -> f32 {
        let dx = self.column().abs_diff(other.column()) as f32;
        let dy = self.row().abs_diff(other.row()) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Reports whether `other` touches this cell orthogonally or diagonally.
    #[must_use]
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        let column_diff = self.column().abs_diff(other.column());
        let row_diff = self.row().abs_diff(other.row());
        column_diff <= 1 && row_diff <= 1 && column_diff + row_diff > 0
    }

    /// Reports whether `other` shares an edge with this cell.
    #[must_use]
    pub fn is_orthogonally_adjacent(self, other: CellCoord) -> bool {
        self.manhattan_distance(other) == 1
    }
}

/// Movement directions between neighbouring cells.
///
/// Diagonal variants only appear in paths planned with diagonal movement
/// enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
    /// Movement toward decreasing rows and increasing columns.
    NorthEast,
    /// Movement toward decreasing rows and decreasing columns.
    NorthWest,
    /// Movement toward increasing rows and increasing columns.
    SouthEast,
    /// Movement toward increasing rows and decreasing columns.
    SouthWest,
}

impl Direction {
    /// Derives the direction that leads from `from` to the neighbouring `to`.
    ///
    /// Returns `None` when the cells are identical or not adjacent.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Self> {
        if !from.is_adjacent(to) {
            return None;
        }

        let west = to.column() < from.column();
        let east = to.column() > from.column();
        let north = to.row() < from.row();
        let south = to.row() > from.row();

        match (west, north, east, south) {
            (true, true, _, _) => Some(Self::NorthWest),
            (true, _, _, true) => Some(Self::SouthWest),
            (_, true, true, _) => Some(Self::NorthEast),
            (_, _, true, true) => Some(Self::SouthEast),
            (true, _, _, _) => Some(Self::West),
            (_, true, _, _) => Some(Self::North),
            (_, _, true, _) => Some(Self::East),
            (_, _, _, true) => Some(Self::South),
            _ => None,
        }
    }

    /// Reports whether the direction moves along both axes.
    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Self::NorthEast | Self::NorthWest | Self::SouthEast | Self::SouthWest
        )
    }
}

/// Terrain layer value of a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Open ground; hazards lying here are visible.
    #[default]
    Empty,
    /// Ground that has already been swept by a scanner.
    Scanned,
    /// Ground whose contents have not been revealed.
    Unknown,
}

/// Unit layer value describing what occupies a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Nothing occupies the cell.
    #[default]
    None,
    /// The mine-sweeping agent.
    Agent,
    /// Low-yield hazard.
    EasyHazard,
    /// Medium-yield hazard.
    MediumHazard,
    /// High-yield hazard.
    HardHazard,
    /// Straight track segment left behind by the agent.
    Track,
    /// Curved track segment left behind by the agent.
    CurvedTrack,
}

impl Unit {
    /// Values a mutation may write into a unit grid.
    pub const MUTATION_CHOICES: [Unit; 4] = [
        Unit::None,
        Unit::EasyHazard,
        Unit::MediumHazard,
        Unit::HardHazard,
    ];

    /// Hazard tier carried by the unit, if it is a hazard.
    #[must_use]
    pub const fn hazard_tier(self) -> Option<HazardTier> {
        match self {
            Self::EasyHazard => Some(HazardTier::Easy),
            Self::MediumHazard => Some(HazardTier::Medium),
            Self::HardHazard => Some(HazardTier::Hard),
            _ => None,
        }
    }

    /// Reports whether the unit is any hazard tier.
    #[must_use]
    pub const fn is_hazard(self) -> bool {
        self.hazard_tier().is_some()
    }
}

/// Severity class of a hazard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HazardTier {
    /// Low-yield hazards.
    Easy,
    /// Medium-yield hazards.
    Medium,
    /// High-yield hazards.
    Hard,
}

impl HazardTier {
    /// All tiers in ascending severity.
    pub const ALL: [HazardTier; 3] = [HazardTier::Easy, HazardTier::Medium, HazardTier::Hard];

    /// Unit value that represents the tier on a map.
    #[must_use]
    pub const fn unit(self) -> Unit {
        match self {
            Self::Easy => Unit::EasyHazard,
            Self::Medium => Unit::MediumHazard,
            Self::Hard => Unit::HardHazard,
        }
    }
}

/// Traversal class that decides which cells a mover refuses to enter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    /// Avoids scanned ground and every visible hazard.
    #[default]
    Cautious,
    /// Avoids visible hazards only.
    Reckless,
    /// Ignores hazards entirely.
    Neutral,
}

/// Capability token describing the agent a search is planned for.
pub trait Mover {
    /// Traversal class consulted by [`TileMap::blocked`].
    fn personality(&self) -> Personality;
}

/// Plain mover carrying nothing but its personality.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct UnitMover {
    personality: Personality,
}

impl UnitMover {
    /// Creates a mover with the provided personality.
    #[must_use]
    pub const fn new(personality: Personality) -> Self {
        Self { personality }
    }
}

impl Mover for UnitMover {
    fn personality(&self) -> Personality {
        self.personality
    }
}

/// Tile map abstraction consumed by the pathfinder.
///
/// Cells passed to these methods must lie inside the map; implementations
/// are expected to panic otherwise.
pub trait TileMap {
    /// Number of columns in the map.
    fn width(&self) -> u32;

    /// Number of rows in the map.
    fn height(&self) -> u32;

    /// Reports whether `mover` refuses to enter `cell`.
    fn blocked(&self, mover: &dyn Mover, cell: CellCoord) -> bool;

    /// Cost of stepping from `from` into the neighbouring `to`.
    fn movement_cost(&self, mover: &dyn Mover, from: CellCoord, to: CellCoord) -> f32;

    /// Records that the pathfinder examined `cell`.
    fn mark_visited(&mut self, cell: CellCoord);

    /// Forgets every cell recorded by [`Self::mark_visited`].
    fn clear_visited(&mut self) {}

    /// Reports whether `cell` lies inside the map.
    fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width() && cell.row() < self.height()
    }
}

/// Estimate of the remaining cost between a cell and the search target.
pub trait Heuristic {
    /// Estimated cost of travelling from `from` to `target` for `mover`.
    fn estimate(&self, mover: &dyn Mover, from: CellCoord, target: CellCoord) -> f32;
}

/// Read-only row-major view over a unit layer.
#[derive(Clone, Copy, Debug)]
pub struct UnitGridView<'a> {
    cells: &'a [Unit],
    columns: u32,
    rows: u32,
}

impl<'a> UnitGridView<'a> {
    /// Captures a view over `cells` laid out as `columns` by `rows`.
    ///
    /// # Panics
    ///
    /// Panics when the slice length does not match the dimensions.
    #[must_use]
    pub fn new(cells: &'a [Unit], columns: u32, rows: u32) -> Self {
        let expected = columns as usize * rows as usize;
        assert_eq!(
            cells.len(),
            expected,
            "unit grid of {columns}x{rows} needs {expected} cells, got {}",
            cells.len()
        );
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Flattened unit values in row-major order.
    #[must_use]
    pub fn cells(&self) -> &'a [Unit] {
        self.cells
    }

    /// Provides the dimensions of the underlying grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Unit stored at the provided cell, if it lies inside the grid.
    #[must_use]
    pub fn unit(&self, cell: CellCoord) -> Option<Unit> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let index = cell.row() as usize * self.columns as usize + cell.column() as usize;
        self.cells.get(index).copied()
    }

    /// Iterates the units of a single row from west to east.
    pub fn row(&self, row: u32) -> impl Iterator<Item = Unit> + 'a {
        let cells = self.cells;
        let width = self.columns as usize;
        let start = row as usize * width;
        cells[start..start + width].iter().copied()
    }

    /// Iterates the units of a single column from north to south.
    pub fn column(&self, column: u32) -> impl Iterator<Item = Unit> + 'a {
        let cells = self.cells;
        cells
            .iter()
            .skip(column as usize)
            .step_by(self.columns.max(1) as usize)
            .copied()
    }
}
