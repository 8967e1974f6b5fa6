#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that evolves a minefield map and plans a sweep across it.

mod args;
mod config;
mod map_transfer;
mod render;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use sapper_core::{CellCoord, TileMap, UnitMover};
use sapper_system_fitness::fitness_breakdown;
use sapper_system_generation::GeneticMapGenerator;
use sapper_system_pathfinding::AStarPathFinder;
use sapper_world::{tier_counts, GridMap, AGENT_ORIGIN};

use crate::{args::CliArgs, config::SapperConfig, map_transfer::MapSnapshot};

/// Entry point for the Sapper command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.debug);

    let mut config = match &args.config {
        Some(path) => SapperConfig::load(path)?,
        None => SapperConfig::default(),
    };
    args.apply_to(&mut config);

    let seeds = decode_seeds(&args.seed_maps)?;
    let mut generator = GeneticMapGenerator::new(config.generator.clone())
        .context("invalid generator configuration")?;
    let evolution = generator.evolve(seeds).context("map generation failed")?;
    let best_fitness = evolution.best_fitness();
    let generations = evolution.history().len().saturating_sub(1);
    let mut map = evolution.into_best();

    let start = args
        .start
        .or_else(|| map.agent_cell())
        .unwrap_or(AGENT_ORIGIN);
    let target = args.target.unwrap_or_else(|| far_corner(&map));
    ensure_inside(&map, "start", start)?;
    ensure_inside(&map, "target", target)?;

    let mover = UnitMover::new(config.personality);
    let mut finder = AStarPathFinder::with_heuristic(config.search, config.heuristic);
    let path = finder.find_path(&mut map, &mover, start, target);
    let stats = finder.last_search();
    info!(
        "search expanded {} nodes, deepest step {}",
        stats.expanded(),
        stats.deepest()
    );

    let breakdown = fitness_breakdown(&map.unit_view(), &config.generator.fitness);
    let exported = MapSnapshot::capture(&map)
        .encode()
        .context("failed to export map")?;

    print!("{}", render::render_map(&map, path.as_ref()));
    println!("{}", render::LEGEND);
    println!();
    println!(
        "fitness: {best_fitness:.3} after {generations} generations (bomb {:.3}, column {:.3}, row {:.3})",
        breakdown.bomb, breakdown.column, breakdown.row
    );
    let hazards = tier_counts(&map)
        .iter()
        .map(|(tier, count)| format!("{tier:?} {count}").to_lowercase())
        .collect::<Vec<_>>()
        .join(", ");
    println!("hazards: {hazards}");
    match &path {
        Some(path) => {
            println!(
                "path ({:?}): {} moves",
                config.personality,
                path.move_count()
            );
            println!("{}", render::describe_path(path));
        }
        None => println!(
            "path ({:?}): none from ({},{}) to ({},{})",
            config.personality,
            start.column(),
            start.row(),
            target.column(),
            target.row()
        ),
    }
    println!("map: {exported}");

    Ok(())
}

fn init_logging(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn decode_seeds(encoded: &[String]) -> Result<Vec<GridMap>> {
    encoded
        .iter()
        .enumerate()
        .map(|(index, value)| {
            MapSnapshot::decode(value)
                .map(MapSnapshot::into_map)
                .with_context(|| format!("failed to decode seed map {index}"))
        })
        .collect()
}

fn far_corner(map: &GridMap) -> CellCoord {
    CellCoord::new(
        map.width().saturating_sub(1),
        map.height().saturating_sub(1),
    )
}

fn ensure_inside(map: &GridMap, label: &str, cell: CellCoord) -> Result<()> {
    if !map.contains(cell) {
        bail!(
            "{label} ({},{}) lies outside the {}x{} map",
            cell.column(),
            cell.row(),
            map.width(),
            map.height()
        );
    }
    Ok(())
}
