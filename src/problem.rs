use core::fmt;
use std::str::FromStr;

use grid_util::point::Point;
use itertools::{iproduct, Itertools};
use log::{debug, info};
use petgraph::unionfind::UnionFind;

use crate::error::SearchError;
use crate::terrain::{manhattan_distance, Terrain};

/// Offsets of the 4-neighbourhood, in the order neighbours are expanded.
const NEUMANN_OFFSETS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// A single grid location. Coordinates are fixed at creation; terrain and the visited flag are
/// only changed through the owning [Problem].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    x: i32,
    y: i32,
    terrain: Terrain,
    visited: bool,
}

impl Cell {
    fn new(x: i32, y: i32) -> Cell {
        Cell {
            x,
            y,
            terrain: Terrain::Clear,
            visited: false,
        }
    }
    pub fn x(&self) -> i32 {
        self.x
    }
    pub fn y(&self) -> i32 {
        self.y
    }
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
    pub fn terrain(&self) -> Terrain {
        self.terrain
    }
    /// Set once the search has expanded this cell, cleared by [Problem::restart].
    pub fn visited(&self) -> bool {
        self.visited
    }
}

/// [Problem] owns an `n x m` arena of [Cell]s stored row-major by `x * m + y`, the optional start
/// and goal cells (as indices into that arena) and the last solution path found on it.
///
/// Like the terrain itself, connected components of passable cells are tracked in a [UnionFind]
/// structure so a host can tell whether a search can succeed before running it. Components are
/// joined eagerly when a cell becomes passable and flagged dirty when a wall is placed, since that
/// may split a component.
#[derive(Clone, Debug)]
pub struct Problem {
    n: usize,
    m: usize,
    cells: Vec<Cell>,
    start: Option<usize>,
    goal: Option<usize>,
    solution: Vec<usize>,
    components: UnionFind<usize>,
    components_dirty: bool,
}

impl Problem {
    /// Creates an all-[Terrain::Clear] grid with `n` columns and `m` rows and no endpoints.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(n: usize, m: usize) -> Problem {
        assert!(n > 0 && m > 0, "grid dimensions must be positive");
        let cells = iproduct!(0..n as i32, 0..m as i32)
            .map(|(x, y)| Cell::new(x, y))
            .collect();
        let mut problem = Problem {
            n,
            m,
            cells,
            start: None,
            goal: None,
            solution: Vec::new(),
            components: UnionFind::new(n * m),
            components_dirty: false,
        };
        problem.generate_components();
        problem
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.n
    }
    /// Number of rows.
    pub fn height(&self) -> usize {
        self.m
    }
    pub fn len(&self) -> usize {
        self.cells.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.n && (y as usize) < self.m
    }
    /// Arena index of `(x, y)`.
    pub fn index(&self, x: i32, y: i32) -> Result<usize, SearchError> {
        if self.in_bounds(x, y) {
            Ok(x as usize * self.m + y as usize)
        } else {
            Err(SearchError::InvalidCoordinate {
                x,
                y,
                width: self.n,
                height: self.m,
            })
        }
    }
    pub fn index_point(&self, point: &Point) -> Result<usize, SearchError> {
        self.index(point.x, point.y)
    }
    pub fn point(&self, ix: usize) -> Point {
        self.cells[ix].point()
    }
    pub fn cell(&self, ix: usize) -> &Cell {
        &self.cells[ix]
    }
    pub fn cell_at(&self, x: i32, y: i32) -> Result<&Cell, SearchError> {
        self.index(x, y).map(|ix| &self.cells[ix])
    }
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
    pub fn terrain(&self, ix: usize) -> Terrain {
        self.cells[ix].terrain
    }
    pub fn start(&self) -> Option<usize> {
        self.start
    }
    pub fn goal(&self) -> Option<usize> {
        self.goal
    }
    /// The last solution found, as arena indices running from start to goal. Empty if none.
    pub fn solution(&self) -> &[usize] {
        &self.solution
    }
    pub fn solution_points(&self) -> Vec<Point> {
        self.solution.iter().map(|&ix| self.point(ix)).collect()
    }

    /// In-bounds 4-neighbours of the cell at `ix`, regardless of terrain.
    pub fn neumann_neighbours(&self, ix: usize) -> impl Iterator<Item = usize> + '_ {
        let Cell { x, y, .. } = self.cells[ix];
        NEUMANN_OFFSETS
            .iter()
            .filter_map(move |(dx, dy)| self.index(x + dx, y + dy).ok())
    }

    /// Heuristic distance from the cell at `ix` to the goal, 0 when no goal is set.
    pub fn heuristic(&self, ix: usize) -> u32 {
        self.goal.map_or(0, |goal| {
            manhattan_distance(&self.point(ix), &self.point(goal))
        })
    }

    /// Sets the terrain of a cell. Turning a current start or goal into a wall is rejected, in which
    /// case `Ok(false)` is returned.
    pub fn set_terrain(&mut self, x: i32, y: i32, terrain: Terrain) -> Result<bool, SearchError> {
        let ix = self.index(x, y)?;
        if !terrain.is_passable() && self.is_endpoint(ix) {
            debug!("Refusing to place {} on an endpoint at ({}, {})", terrain, x, y);
            return Ok(false);
        }
        self.write_terrain(ix, terrain);
        Ok(true)
    }

    /// Designates the start cell. Rejected with `Ok(false)` on walls and on the current goal.
    pub fn set_start(&mut self, x: i32, y: i32) -> Result<bool, SearchError> {
        let ix = self.index(x, y)?;
        if !self.cells[ix].terrain.is_passable() || self.goal == Some(ix) {
            debug!("Rejected start at ({}, {})", x, y);
            return Ok(false);
        }
        self.start = Some(ix);
        Ok(true)
    }

    /// Designates the goal cell. Rejected with `Ok(false)` on walls and on the current start.
    pub fn set_goal(&mut self, x: i32, y: i32) -> Result<bool, SearchError> {
        let ix = self.index(x, y)?;
        if !self.cells[ix].terrain.is_passable() || self.start == Some(ix) {
            debug!("Rejected goal at ({}, {})", x, y);
            return Ok(false);
        }
        self.goal = Some(ix);
        Ok(true)
    }

    /// Resets the cell to [Terrain::Clear] and drops any start or goal designation on it.
    pub fn clear_cell(&mut self, x: i32, y: i32) -> Result<(), SearchError> {
        let ix = self.index(x, y)?;
        self.write_terrain(ix, Terrain::Clear);
        if self.start == Some(ix) {
            self.start = None;
        }
        if self.goal == Some(ix) {
            self.goal = None;
        }
        Ok(())
    }

    /// Forgets the previous search: clears all visited flags and the solution. Terrain and
    /// endpoints are kept.
    pub fn restart(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.visited = false;
        }
        self.solution.clear();
    }

    /// Reinitializes the problem as if freshly created with the same dimensions.
    pub fn reset(&mut self) {
        *self = Problem::new(self.n, self.m);
    }

    pub(crate) fn mark_visited(&mut self, ix: usize) {
        self.cells[ix].visited = true;
    }

    pub(crate) fn set_solution(&mut self, solution: Vec<usize>) {
        self.solution = solution;
    }

    fn is_endpoint(&self, ix: usize) -> bool {
        self.start == Some(ix) || self.goal == Some(ix)
    }

    /// Updates a cell's terrain. Joins newly connected components and flags the components as
    /// dirty if they are (potentially) broken apart.
    fn write_terrain(&mut self, ix: usize, terrain: Terrain) {
        let was_passable = self.cells[ix].terrain.is_passable();
        self.cells[ix].terrain = terrain;
        if was_passable && !terrain.is_passable() {
            self.components_dirty = true;
        } else if terrain.is_passable() {
            let neighbours = self
                .neumann_neighbours(ix)
                .filter(|&n| self.cells[n].terrain.is_passable())
                .collect::<Vec<_>>();
            for n in neighbours {
                self.components.union(ix, n);
            }
        }
    }

    /// Cost of walking `path`: the terrain cost of every cell entered, which is every cell but the
    /// first one.
    pub fn path_cost(&self, path: &[usize]) -> u32 {
        path.iter().skip(1).map(|&ix| self.terrain(ix).cost()).sum()
    }

    /// Whether consecutive cells on `path` are 4-adjacent.
    pub fn is_contiguous(&self, path: &[usize]) -> bool {
        path.iter()
            .tuple_windows()
            .all(|(&a, &b)| manhattan_distance(&self.point(a), &self.point(b)) == 1)
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up passable 4-neighbours.
    pub fn generate_components(&mut self) {
        info!("Generating connected components for {}x{} grid", self.n, self.m);
        self.components = UnionFind::new(self.n * self.m);
        self.components_dirty = false;
        for (x, y) in iproduct!(0..self.n as i32, 0..self.m as i32) {
            let ix = x as usize * self.m + y as usize;
            if !self.cells[ix].terrain.is_passable() {
                continue;
            }
            for (nx, ny) in [(x + 1, y), (x, y + 1)] {
                if let Ok(n) = self.index(nx, ny) {
                    if self.cells[n].terrain.is_passable() {
                        self.components.union(ix, n);
                    }
                }
            }
        }
    }

    /// Retrieves the component id the cell at `ix` belongs to.
    pub fn component(&mut self, ix: usize) -> usize {
        self.update();
        self.components.find(ix)
    }

    /// Checks if the current start and goal are set and lie on the same component.
    pub fn reachable(&mut self) -> bool {
        match (self.start, self.goal) {
            (Some(start), Some(goal)) => {
                self.update();
                self.components.equiv(start, goal)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Problem {
    /// Renders the grid with the highest row first: `S`/`G` for the endpoints, `*` for the
    /// solution, `o` for visited cells and the terrain symbol otherwise.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in (0..self.m).rev() {
            let row = (0..self.n)
                .map(|x| {
                    let ix = x * self.m + y;
                    let cell = &self.cells[ix];
                    if self.start == Some(ix) {
                        'S'
                    } else if self.goal == Some(ix) {
                        'G'
                    } else if self.solution.contains(&ix) {
                        '*'
                    } else if cell.visited {
                        'o'
                    } else {
                        cell.terrain.symbol()
                    }
                })
                .collect::<String>();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseMapError {
    #[error("map has no rows")]
    Empty,
    #[error("row {row} has width {found}, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown map symbol {symbol:?} at ({x}, {y})")]
    UnknownSymbol { symbol: char, x: usize, y: usize },
}

impl FromStr for Problem {
    type Err = ParseMapError;

    /// Parses a map in the notation used by [Display](fmt::Display): one line per row, highest
    /// row first, terrain symbols plus `S` and `G` for clear endpoint cells.
    fn from_str(s: &str) -> Result<Problem, ParseMapError> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        let m = rows.len();
        let n = rows.first().ok_or(ParseMapError::Empty)?.chars().count();
        if n == 0 {
            return Err(ParseMapError::Empty);
        }
        let mut problem = Problem::new(n, m);
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != n {
                return Err(ParseMapError::Ragged {
                    row,
                    expected: n,
                    found,
                });
            }
            let y = m - 1 - row;
            for (x, symbol) in line.chars().enumerate() {
                let ix = x * m + y;
                match symbol {
                    'S' => problem.start = Some(ix),
                    'G' => problem.goal = Some(ix),
                    _ => {
                        let terrain = Terrain::from_symbol(symbol)
                            .ok_or(ParseMapError::UnknownSymbol { symbol, x, y })?;
                        problem.cells[ix].terrain = terrain;
                    }
                }
            }
        }
        problem.generate_components();
        Ok(problem)
    }
}
