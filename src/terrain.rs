use core::fmt;
use grid_util::point::Point;

use crate::{CLEAR_COST, FOREST_COST, WALL_COST, WATER_COST};

/// The kind of ground a cell is made of. Variants are ordered by increasing traversal cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Terrain {
    #[default]
    Clear,
    Forest,
    Water,
    Wall,
}

impl Terrain {
    pub const ALL: [Terrain; 4] = [Terrain::Clear, Terrain::Forest, Terrain::Water, Terrain::Wall];

    /// Cost of entering a cell of this terrain. [Terrain::Wall] maps to [WALL_COST], which no
    /// optimal path ever pays since walls are never expanded into.
    pub fn cost(self) -> u32 {
        match self {
            Terrain::Clear => CLEAR_COST,
            Terrain::Forest => FOREST_COST,
            Terrain::Water => WATER_COST,
            Terrain::Wall => WALL_COST,
        }
    }

    pub fn is_passable(self) -> bool {
        self != Terrain::Wall
    }

    /// Single character used in textual maps.
    pub fn symbol(self) -> char {
        match self {
            Terrain::Clear => '.',
            Terrain::Forest => 'F',
            Terrain::Water => '~',
            Terrain::Wall => '#',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Terrain> {
        Terrain::ALL.into_iter().find(|t| t.symbol() == symbol)
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Terrain::Clear => "clear",
            Terrain::Forest => "forest",
            Terrain::Water => "water",
            Terrain::Wall => "wall",
        };
        write!(f, "{}", name)
    }
}

/// Admissible and consistent for 4-directional movement as long as every step costs at least
/// [CLEAR_COST] = 1.
pub fn manhattan_distance(p1: &Point, p2: &Point) -> u32 {
    (p1.x - p2.x).unsigned_abs() + (p1.y - p2.y).unsigned_abs()
}
