//! Tunables of a generation run.

use sapper_system_fitness::FitnessWeights;
use sapper_world::HazardBudgetConfig;
use serde::{Deserialize, Serialize};

use crate::GenerationError;

/// Parameters shared by every individual a generator evolves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Columns in every generated map.
    pub width: u32,
    /// Rows in every generated map.
    pub height: u32,
    /// Individuals alive in each generation. Must be even.
    pub population_size: usize,
    /// Number of selection and crossover rounds.
    pub generations: usize,
    /// Seed of the generator's random stream.
    pub seed: u64,
    /// Hazard ceiling and per-tier caps.
    pub budget: HazardBudgetConfig,
    /// Weights of the composite fitness score.
    pub fitness: FitnessWeights,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            population_size: 40,
            generations: 50,
            seed: 0,
            budget: HazardBudgetConfig::default(),
            fitness: FitnessWeights::default(),
        }
    }
}

impl GeneratorConfig {
    /// Rejects configurations that cannot produce a population.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.width == 0 || self.height == 0 {
            return Err(GenerationError::ZeroDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.population_size < 2 || self.population_size % 2 != 0 {
            return Err(GenerationError::InvalidPopulation {
                size: self.population_size,
            });
        }
        Ok(())
    }

    /// Number of cells in every generated map.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
