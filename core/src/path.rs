//! Ordered routes produced by the pathfinder.

use std::collections::VecDeque;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::{CellCoord, Direction};

/// Single entry of a [`Path`].
///
/// `action` is the direction the agent takes when leaving this cell toward the
/// next step; the final step of a route carries no action. Two steps compare
/// equal when they name the same cell, regardless of the action.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Step {
    cell: CellCoord,
    action: Option<Direction>,
}

impl Step {
    /// Creates a step at `cell` leaving in `action`.
    #[must_use]
    pub const fn new(cell: CellCoord, action: Option<Direction>) -> Self {
        Self { cell, action }
    }

    /// Cell visited by the step.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Column of the visited cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.cell.column()
    }

    /// Row of the visited cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.cell.row()
    }

    /// Direction taken when leaving the cell, if any.
    #[must_use]
    pub const fn action(&self) -> Option<Direction> {
        self.action
    }
}

impl PartialEq for Step {
    fn eq(&self, other: &Self) -> bool {
        self.cell == other.cell
    }
}

impl Eq for Step {}

impl Hash for Step {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cell.hash(state);
    }
}

/// Ordered sequence of steps where index 0 is the next step to take.
///
/// Routes returned by the pathfinder start at the search origin and end at
/// the target. Consumers advance by removing the head step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    steps: VecDeque<Step>,
}

impl Path {
    /// Creates an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of steps stored in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Reports whether the path holds no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step stored at `index`, if present.
    #[must_use]
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Next step to take, if any.
    #[must_use]
    pub fn head(&self) -> Option<&Step> {
        self.steps.front()
    }

    /// Appends a step to the tail of the path.
    pub fn append(&mut self, cell: CellCoord, action: Option<Direction>) {
        self.steps.push_back(Step::new(cell, action));
    }

    /// Inserts a step ahead of every existing step.
    pub fn prepend(&mut self, cell: CellCoord, action: Option<Direction>) {
        self.steps.push_front(Step::new(cell, action));
    }

    /// Removes the step at `index`; indices past the end are ignored.
    pub fn remove_step(&mut self, index: usize) {
        let _ = self.steps.remove(index);
    }

    /// Reports whether any step visits `cell`.
    #[must_use]
    pub fn contains_cell(&self, cell: CellCoord) -> bool {
        self.steps.iter().any(|step| step.cell == cell)
    }

    /// Iterates the steps from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    /// Iterates the visited cells from head to tail.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.steps.iter().map(Step::cell)
    }

    /// Number of moves between the first and last step.
    #[must_use]
    pub fn move_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Step;
    type IntoIter = std::collections::vec_deque::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
