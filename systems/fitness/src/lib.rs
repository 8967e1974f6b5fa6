#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure scoring functions that judge generated unit layers.
//!
//! Scores combine hazard density with how evenly empty cells are spread
//! across columns and rows. Higher scores are better.

use sapper_core::{HazardTier, Unit, UnitGridView};
use serde::{Deserialize, Serialize};

/// Smoothing weights applied to per-line empty-cell counts.
///
/// Interior lines average themselves with both neighbours over three terms;
/// edge lines average themselves with their single neighbour over two terms.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineWeights {
    /// Weight of an interior line's own count.
    pub interior_self: f64,
    /// Weight of each neighbour of an interior line.
    pub interior_neighbor: f64,
    /// Weight of an edge line's own count.
    pub edge_self: f64,
    /// Weight of an edge line's only neighbour.
    pub edge_neighbor: f64,
}

impl LineWeights {
    /// Weights used for column scoring.
    pub const COLUMNS: Self = Self {
        interior_self: 1.0,
        interior_neighbor: 0.8,
        edge_self: 0.5,
        edge_neighbor: 0.6,
    };

    /// Weights used for row scoring.
    pub const ROWS: Self = Self {
        interior_self: 0.85,
        interior_neighbor: 0.65,
        edge_self: 0.4,
        edge_neighbor: 0.55,
    };

    fn score(&self, counts: &[usize]) -> f64 {
        let count_at = |index: Option<usize>| {
            index
                .and_then(|index| counts.get(index))
                .map_or(0.0, |count| *count as f64)
        };

        (0..counts.len())
            .map(|index| {
                let own = count_at(Some(index));
                let prev = count_at(index.checked_sub(1));
                let next = count_at(Some(index + 1));

                if index == 0 {
                    (self.edge_self * own + self.edge_neighbor * next) / 2.0
                } else if index + 1 == counts.len() {
                    (self.edge_neighbor * prev + self.edge_self * own) / 2.0
                } else {
                    (self.interior_neighbor * prev
                        + self.interior_self * own
                        + self.interior_neighbor * next)
                        / 3.0
                }
            })
            .sum()
    }
}

/// Tunable weights of the composite fitness score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessWeights {
    /// Score contributed by each easy hazard.
    pub easy_hazard: f64,
    /// Score contributed by each medium hazard.
    pub medium_hazard: f64,
    /// Score contributed by each hard hazard.
    pub hard_hazard: f64,
    /// Smoothing weights for column counts.
    pub columns: LineWeights,
    /// Smoothing weights for row counts.
    pub rows: LineWeights,
    /// Share of the column score folded into the composite.
    pub column_share: f64,
    /// Share of the row score folded into the composite.
    pub row_share: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            easy_hazard: 0.2,
            medium_hazard: 0.4,
            hard_hazard: 0.6,
            columns: LineWeights::COLUMNS,
            rows: LineWeights::ROWS,
            column_share: 0.65,
            row_share: 0.4,
        }
    }
}

impl FitnessWeights {
    fn hazard_weight(&self, tier: HazardTier) -> f64 {
        match tier {
            HazardTier::Easy => self.easy_hazard,
            HazardTier::Medium => self.medium_hazard,
            HazardTier::Hard => self.hard_hazard,
        }
    }
}

/// Individual terms of a composite score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitnessBreakdown {
    /// Weighted hazard count.
    pub bomb: f64,
    /// Smoothed empty-cell score over columns.
    pub column: f64,
    /// Smoothed empty-cell score over rows.
    pub row: f64,
    /// Combined score used for selection.
    pub composite: f64,
}

/// Weighted hazard count of a unit layer.
#[must_use]
pub fn bomb_count_fitness(grid: &UnitGridView<'_>, weights: &FitnessWeights) -> f64 {
    grid.cells()
        .iter()
        .filter_map(|unit| unit.hazard_tier())
        .map(|tier| weights.hazard_weight(tier))
        .sum()
}

/// Number of empty unit cells in each column, west to east.
#[must_use]
pub fn empty_counts_per_column(grid: &UnitGridView<'_>) -> Vec<usize> {
    let (columns, _) = grid.dimensions();
    (0..columns)
        .map(|column| grid.column(column).filter(is_empty).count())
        .collect()
}

/// Number of empty unit cells in each row, north to south.
#[must_use]
pub fn empty_counts_per_row(grid: &UnitGridView<'_>) -> Vec<usize> {
    let (_, rows) = grid.dimensions();
    (0..rows)
        .map(|row| grid.row(row).filter(is_empty).count())
        .collect()
}

/// Smoothed empty-cell score over the columns of a unit layer.
#[must_use]
pub fn column_fitness(grid: &UnitGridView<'_>, weights: &FitnessWeights) -> f64 {
    weights.columns.score(&empty_counts_per_column(grid))
}

/// Smoothed empty-cell score over the rows of a unit layer.
#[must_use]
pub fn row_fitness(grid: &UnitGridView<'_>, weights: &FitnessWeights) -> f64 {
    weights.rows.score(&empty_counts_per_row(grid))
}

/// Combined score used to rank individuals during evolution.
#[must_use]
pub fn composite_fitness(grid: &UnitGridView<'_>, weights: &FitnessWeights) -> f64 {
    fitness_breakdown(grid, weights).composite
}

/// Computes every term of the composite score.
#[must_use]
pub fn fitness_breakdown(grid: &UnitGridView<'_>, weights: &FitnessWeights) -> FitnessBreakdown {
    let bomb = bomb_count_fitness(grid, weights);
    let column = column_fitness(grid, weights);
    let row = row_fitness(grid, weights);
    let composite = (bomb + weights.column_share * column + weights.row_share * row) / 3.0;

    FitnessBreakdown {
        bomb,
        column,
        row,
        composite,
    }
}

fn is_empty(unit: &Unit) -> bool {
    *unit == Unit::None
}
