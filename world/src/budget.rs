//! Hazard budget shared by random layouts and post-crossover repair.

use sapper_core::{HazardTier, Unit};
use serde::{Deserialize, Serialize};

/// Fractions that derive the hazard ceiling and per-tier caps of a map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardBudgetConfig {
    /// Share of all cells that may hold a hazard of any tier.
    pub ceiling_fraction: f64,
    /// Share of the ceiling available to easy hazards.
    pub easy_share: f64,
    /// Share of the ceiling available to medium hazards.
    pub medium_share: f64,
    /// Share of the ceiling available to hard hazards.
    pub hard_share: f64,
}

impl Default for HazardBudgetConfig {
    fn default() -> Self {
        Self {
            ceiling_fraction: 0.55,
            easy_share: 0.7,
            medium_share: 0.2,
            hard_share: 0.1,
        }
    }
}

impl HazardBudgetConfig {
    /// Share of the ceiling available to `tier`.
    #[must_use]
    pub fn share(&self, tier: HazardTier) -> f64 {
        match tier {
            HazardTier::Easy => self.easy_share,
            HazardTier::Medium => self.medium_share,
            HazardTier::Hard => self.hard_share,
        }
    }
}

/// Concrete hazard limits for a map with a known cell count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HazardBudget {
    ceiling: usize,
    caps: [usize; 3],
}

impl HazardBudget {
    /// Resolves the budget for a map holding `cell_count` cells.
    ///
    /// Fractional limits are truncated toward zero.
    #[must_use]
    pub fn for_cell_count(cell_count: usize, config: &HazardBudgetConfig) -> Self {
        let ceiling = scale(cell_count, config.ceiling_fraction);
        let caps = HazardTier::ALL.map(|tier| scale(ceiling, config.share(tier)));
        Self { ceiling, caps }
    }

    /// Hard ceiling on hazards of all tiers combined.
    #[must_use]
    pub const fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Largest hazard total a repaired unit grid may hold.
    #[must_use]
    pub const fn repaired_total(&self) -> usize {
        self.ceiling.saturating_sub(1)
    }

    /// Cap applied to a single tier.
    #[must_use]
    pub const fn cap(&self, tier: HazardTier) -> usize {
        self.caps[tier_slot(tier)]
    }
}

/// Hazard tallies of a unit grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HazardCounts {
    counts: [usize; 3],
}

impl HazardCounts {
    /// Tallies the hazards found in `units`.
    #[must_use]
    pub fn from_units(units: &[Unit]) -> Self {
        let mut counts = [0; 3];
        for tier in units.iter().filter_map(|unit| unit.hazard_tier()) {
            counts[tier_slot(tier)] += 1;
        }
        Self { counts }
    }

    /// Number of hazards of `tier`.
    #[must_use]
    pub const fn count(&self, tier: HazardTier) -> usize {
        self.counts[tier_slot(tier)]
    }

    /// Number of hazards of every tier combined.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Reports whether the tallies satisfy every limit of a repaired grid.
    #[must_use]
    pub fn within(&self, budget: &HazardBudget) -> bool {
        self.total() <= budget.repaired_total()
            && HazardTier::ALL
                .iter()
                .all(|tier| self.count(*tier) <= budget.cap(*tier))
    }
}

const fn tier_slot(tier: HazardTier) -> usize {
    match tier {
        HazardTier::Easy => 0,
        HazardTier::Medium => 1,
        HazardTier::Hard => 2,
    }
}

fn scale(value: usize, fraction: f64) -> usize {
    if fraction <= 0.0 {
        return 0;
    }
    (value as f64 * fraction) as usize
}
