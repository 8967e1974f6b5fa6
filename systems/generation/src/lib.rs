#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Genetic algorithm that evolves grid maps toward a fitness target.
//!
//! Each generation ranks the population by composite fitness, keeps the top
//! half as parents, splices consecutive parent pairs into children, repairs
//! the children's hazard counts and mutates one cell of each. Parents survive
//! into the next generation, so the best score never drops between rounds.
//! All randomness flows from one seeded [`ChaCha8Rng`], making runs
//! reproducible from [`GeneratorConfig::seed`].

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sapper_core::Unit;
use sapper_system_fitness::composite_fitness;
use sapper_world::{GridMap, HazardBudget, AGENT_ORIGIN};

mod config;
mod error;
pub mod operators;

pub use config::GeneratorConfig;
pub use error::GenerationError;

/// Fitness scores of a population ordered from best to worst.
///
/// Every score is paired with the index of its individual, so equal scores
/// are all kept and appear in population order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvaluationTable {
    entries: Vec<(f64, usize)>,
}

impl EvaluationTable {
    /// Scores and ranks `population`.
    #[must_use]
    pub fn rank(population: &[GridMap], config: &GeneratorConfig) -> Self {
        let mut entries: Vec<_> = population
            .iter()
            .enumerate()
            .map(|(index, individual)| {
                (composite_fitness(&individual.unit_view(), &config.fitness), index)
            })
            .collect();
        entries.sort_by(|left, right| right.0.total_cmp(&left.0));
        Self { entries }
    }

    /// Ranked `(score, population index)` pairs.
    #[must_use]
    pub fn entries(&self) -> &[(f64, usize)] {
        &self.entries
    }

    /// Highest scoring entry, if the population was not empty.
    #[must_use]
    pub fn best(&self) -> Option<(f64, usize)> {
        self.entries.first().copied()
    }

    /// Population indices of the `count` best individuals.
    pub fn top(&self, count: usize) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().take(count).map(|(_, index)| *index)
    }
}

/// Outcome of a full evolution run.
#[derive(Clone, Debug, PartialEq)]
pub struct Evolution {
    best: GridMap,
    best_fitness: f64,
    history: Vec<f64>,
}

impl Evolution {
    /// Fittest individual of the final population with the agent placed.
    #[must_use]
    pub fn best(&self) -> &GridMap {
        &self.best
    }

    /// Composite fitness of [`Self::best`] before the agent was placed.
    #[must_use]
    pub const fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    /// Best score of every evaluation, the final one included.
    #[must_use]
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Consumes the record and returns the fittest map.
    #[must_use]
    pub fn into_best(self) -> GridMap {
        self.best
    }
}

/// Evolves maps of a fixed size with a reproducible random stream.
#[derive(Debug)]
pub struct GeneticMapGenerator {
    config: GeneratorConfig,
    budget: HazardBudget,
    rng: ChaCha8Rng,
}

impl GeneticMapGenerator {
    /// Validates `config` and seeds the random stream.
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        let budget = HazardBudget::for_cell_count(config.cell_count(), &config.budget);
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            budget,
            rng,
        })
    }

    /// Parameters used by the generator.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Hazard limits applied to every individual.
    #[must_use]
    pub const fn budget(&self) -> &HazardBudget {
        &self.budget
    }

    /// Evolves a population and returns its fittest map.
    pub fn generate(&mut self, seeds: Vec<GridMap>) -> Result<GridMap, GenerationError> {
        self.evolve(seeds).map(Evolution::into_best)
    }

    /// Evolves a population started from `seeds` topped up with random maps.
    ///
    /// Seeds must match the configured dimensions. When more seeds than the
    /// population size are supplied, only the most recent ones are kept.
    pub fn evolve(&mut self, seeds: Vec<GridMap>) -> Result<Evolution, GenerationError> {
        self.check_seeds(&seeds)?;

        let mut population = self.initial_population(seeds);
        let mut history = Vec::with_capacity(self.config.generations + 1);
        info!(
            "evolving {} maps of {}x{} over {} generations",
            population.len(),
            self.config.width,
            self.config.height,
            self.config.generations
        );

        for generation in 0..self.config.generations {
            let table = EvaluationTable::rank(&population, &self.config);
            if let Some((score, _)) = table.best() {
                debug!("generation {generation}: best fitness {score:.3}");
                history.push(score);
            }
            population = self.next_generation(&population, &table);
        }

        let table = EvaluationTable::rank(&population, &self.config);
        let (best_fitness, best_index) = table.best().unwrap_or((0.0, 0));
        history.push(best_fitness);

        let mut best = population.swap_remove(best_index);
        best.place_agent(AGENT_ORIGIN);
        info!("evolution finished with best fitness {best_fitness:.3}");

        Ok(Evolution {
            best,
            best_fitness,
            history,
        })
    }

    fn check_seeds(&self, seeds: &[GridMap]) -> Result<(), GenerationError> {
        let (width, height) = (self.config.width, self.config.height);
        match seeds
            .iter()
            .position(|seed| seed.dimensions() != (width, height))
        {
            Some(index) => {
                let (found_width, found_height) = seeds[index].dimensions();
                Err(GenerationError::DimensionMismatch {
                    index,
                    width,
                    height,
                    found_width,
                    found_height,
                })
            }
            None => Ok(()),
        }
    }

    fn initial_population(&mut self, mut seeds: Vec<GridMap>) -> Vec<GridMap> {
        let size = self.config.population_size;
        if seeds.len() > size {
            warn!(
                "{} seed maps exceed population of {size}; keeping the last {size}",
                seeds.len()
            );
            let _ = seeds.drain(..seeds.len() - size);
        }

        let mut population = seeds;
        population.reserve(size - population.len());
        while population.len() < size {
            population.push(GridMap::random(
                self.config.width,
                self.config.height,
                &self.budget,
                &mut self.rng,
            ));
        }
        population
    }

    fn next_generation(&mut self, population: &[GridMap], table: &EvaluationTable) -> Vec<GridMap> {
        let parents: Vec<&GridMap> = table
            .top(self.config.population_size / 2)
            .map(|index| &population[index])
            .collect();

        let size = self.config.population_size;
        let mut next: Vec<GridMap> = Vec::with_capacity(size);
        next.extend(parents.iter().map(|parent| (*parent).clone()));
        // An odd parent count pairs the last parent with the first one.
        for slot in (0..parents.len()).step_by(2) {
            let partner = parents[(slot + 1) % parents.len()];
            let (first, second) = self.breed(parents[slot], partner);
            next.push(first);
            if next.len() < size {
                next.push(second);
            }
        }
        next
    }

    fn breed(&mut self, first: &GridMap, second: &GridMap) -> (GridMap, GridMap) {
        let split = operators::split_index(first.cell_count(), &mut self.rng);
        let (first_units, second_units) = operators::crossover(first.units(), second.units(), split);
        (self.child(first_units), self.child(second_units))
    }

    fn child(&mut self, mut units: Vec<Unit>) -> GridMap {
        let _ = operators::repair_hazards(&mut units, &self.budget);
        operators::mutate(&mut units, &mut self.rng);
        let _ = operators::repair_hazards(&mut units, &self.budget);

        let mut child = GridMap::new(self.config.width, self.config.height);
        child.randomize_terrain(&mut self.rng);
        child.replace_units(units);
        child
    }
}
