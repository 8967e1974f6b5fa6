//! Command-line flags of the `sapper` binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use sapper_core::{CellCoord, Personality};

use crate::config::{HeuristicKind, SapperConfig};

/// Evolve a minefield map and plan a sweep across it.
#[derive(Debug, Parser)]
#[command(name = "sapper", version)]
pub(crate) struct CliArgs {
    /// TOML file with generator and search settings
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Columns of the generated map
    #[arg(long)]
    pub(crate) width: Option<u32>,

    /// Rows of the generated map
    #[arg(long)]
    pub(crate) height: Option<u32>,

    /// Individuals per generation (even)
    #[arg(short, long)]
    pub(crate) population: Option<usize>,

    /// Number of generations to evolve
    #[arg(short, long)]
    pub(crate) generations: Option<usize>,

    /// Seed of the random stream
    #[arg(short, long)]
    pub(crate) seed: Option<u64>,

    /// Previously exported map to include in the first generation
    #[arg(long = "seed-map", value_name = "MAP")]
    pub(crate) seed_maps: Vec<String>,

    /// Traversal class of the agent
    #[arg(value_enum, long)]
    pub(crate) personality: Option<PersonalityArg>,

    /// Start cell as `column,row` (defaults to the agent's cell)
    #[arg(long, value_parser = parse_cell)]
    pub(crate) start: Option<CellCoord>,

    /// Target cell as `column,row` (defaults to the far corner)
    #[arg(long, value_parser = parse_cell)]
    pub(crate) target: Option<CellCoord>,

    /// Allow diagonal steps (`--diagonal=false` turns them off)
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub(crate) diagonal: Option<bool>,

    /// Largest step count explored before giving up
    #[arg(long)]
    pub(crate) max_search_distance: Option<u32>,

    /// Distance estimate used by the search
    #[arg(value_enum, long)]
    pub(crate) heuristic: Option<HeuristicKind>,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,
}

impl CliArgs {
    /// Overrides configuration values with the flags that were given.
    pub(crate) fn apply_to(&self, config: &mut SapperConfig) {
        let generator = &mut config.generator;
        if let Some(width) = self.width {
            generator.width = width;
        }
        if let Some(height) = self.height {
            generator.height = height;
        }
        if let Some(population) = self.population {
            generator.population_size = population;
        }
        if let Some(generations) = self.generations {
            generator.generations = generations;
        }
        if let Some(seed) = self.seed {
            generator.seed = seed;
        }

        if let Some(personality) = self.personality {
            config.personality = personality.into();
        }
        if let Some(diagonal) = self.diagonal {
            config.search.allow_diagonal = diagonal;
        }
        if let Some(distance) = self.max_search_distance {
            config.search.max_search_distance = distance;
        }
        if let Some(heuristic) = self.heuristic {
            config.heuristic = heuristic;
        }
    }
}

/// Command-line spelling of [`Personality`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum PersonalityArg {
    /// Avoids scanned ground and visible hazards.
    Cautious,
    /// Avoids visible hazards only.
    Reckless,
    /// Ignores hazards.
    Neutral,
}

impl From<PersonalityArg> for Personality {
    fn from(value: PersonalityArg) -> Self {
        match value {
            PersonalityArg::Cautious => Personality::Cautious,
            PersonalityArg::Reckless => Personality::Reckless,
            PersonalityArg::Neutral => Personality::Neutral,
        }
    }
}

fn parse_cell(value: &str) -> Result<CellCoord, String> {
    let (column, row) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `column,row`, got `{value}`"))?;
    let column = column
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid column `{column}`: {error}"))?;
    let row = row
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid row `{row}`: {error}"))?;
    Ok(CellCoord::new(column, row))
}
