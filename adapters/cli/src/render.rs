//! Plain-text rendering of maps and planned routes.

use std::fmt::Write as _;

use sapper_core::{CellCoord, Direction, Path, Terrain, Unit};
use sapper_world::GridMap;

const ROUTE_GLYPH: char = '*';

/// Draws the map one row per line, overlaying `route` on unoccupied cells.
#[must_use]
pub(crate) fn render_map(map: &GridMap, route: Option<&Path>) -> String {
    let mut output = String::with_capacity((map.width() as usize + 1) * map.height() as usize);

    for row in 0..map.height() {
        for column in 0..map.width() {
            let cell = CellCoord::new(column, row);
            let unit = map.unit(cell);
            let on_route = route.is_some_and(|path| path.contains_cell(cell));
            let glyph = match unit_glyph(unit) {
                Some(glyph) => glyph,
                None if on_route => ROUTE_GLYPH,
                None => terrain_glyph(map.terrain(cell)),
            };
            output.push(glyph);
        }
        output.push('\n');
    }

    output
}

/// Lists the cells of `path` with the direction taken from each.
#[must_use]
pub(crate) fn describe_path(path: &Path) -> String {
    let mut output = String::new();
    for (index, step) in path.iter().enumerate() {
        if index > 0 {
            output.push_str(" -> ");
        }
        let _ = write!(output, "({},{})", step.x(), step.y());
        if let Some(action) = step.action() {
            output.push_str(direction_label(action));
        }
    }
    output
}

/// Legend for the glyphs used by [`render_map`].
pub(crate) const LEGEND: &str =
    "legend: . empty  : scanned  ? unknown  A agent  e/m/h hazard  = ~ track  * route";

fn unit_glyph(unit: Unit) -> Option<char> {
    match unit {
        Unit::None => None,
        Unit::Agent => Some('A'),
        Unit::EasyHazard => Some('e'),
        Unit::MediumHazard => Some('m'),
        Unit::HardHazard => Some('h'),
        Unit::Track => Some('='),
        Unit::CurvedTrack => Some('~'),
    }
}

fn terrain_glyph(terrain: Terrain) -> char {
    match terrain {
        Terrain::Empty => '.',
        Terrain::Scanned => ':',
        Terrain::Unknown => '?',
    }
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::North => "N",
        Direction::East => "E",
        Direction::South => "S",
        Direction::West => "W",
        Direction::NorthEast => "NE",
        Direction::NorthWest => "NW",
        Direction::SouthEast => "SE",
        Direction::SouthWest => "SW",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_take_precedence_over_route_and_terrain() {
        let mut map = GridMap::new(3, 2);
        map.set_unit(CellCoord::new(0, 0), Unit::Agent);
        map.set_unit(CellCoord::new(2, 0), Unit::HardHazard);
        map.set_terrain(CellCoord::new(0, 1), Terrain::Scanned);
        map.set_terrain(CellCoord::new(2, 1), Terrain::Unknown);

        let mut path = Path::new();
        path.append(CellCoord::new(0, 0), Some(Direction::East));
        path.append(CellCoord::new(1, 0), None);

        assert_eq!(render_map(&map, Some(&path)), "A*h\n:.?\n");
        assert_eq!(render_map(&map, None), "A.h\n:.?\n");
    }

    #[test]
    fn path_description_lists_actions() {
        let mut path = Path::new();
        path.append(CellCoord::new(0, 0), Some(Direction::South));
        path.append(CellCoord::new(0, 1), Some(Direction::SouthEast));
        path.append(CellCoord::new(1, 2), None);

        assert_eq!(describe_path(&path), "(0,0)S -> (0,1)SE -> (1,2)");
    }
}
