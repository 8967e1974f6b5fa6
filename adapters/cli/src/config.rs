//! Run configuration loaded from TOML and refined by command-line flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::ValueEnum;
use sapper_core::{CellCoord, Heuristic, Mover, Personality};
use sapper_system_generation::GeneratorConfig;
use sapper_system_pathfinding::{EuclideanHeuristic, ManhattanHeuristic, SearchConfig};
use serde::{Deserialize, Serialize};

/// Heuristic selected for path planning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub(crate) enum HeuristicKind {
    /// Straight-line distance.
    #[default]
    Euclidean,
    /// Axis-aligned grid distance.
    Manhattan,
}

impl Heuristic for HeuristicKind {
    fn estimate(&self, mover: &dyn Mover, from: CellCoord, target: CellCoord) -> f32 {
        match self {
            Self::Euclidean => EuclideanHeuristic.estimate(mover, from, target),
            Self::Manhattan => ManhattanHeuristic.estimate(mover, from, target),
        }
    }
}

/// Everything a single `sapper` run needs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct SapperConfig {
    /// Genetic generator parameters.
    pub(crate) generator: GeneratorConfig,
    /// Pathfinder limits.
    pub(crate) search: SearchConfig,
    /// Heuristic used by the pathfinder.
    pub(crate) heuristic: HeuristicKind,
    /// Traversal class of the planned agent.
    pub(crate) personality: Personality,
}

impl SapperConfig {
    /// Reads a configuration file; missing keys keep their defaults.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid sapper config toml")
    }
}
