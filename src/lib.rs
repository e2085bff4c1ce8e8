//! # grid_sandbox
//!
//! An incremental search engine for an editable terrain grid. A host paints
//! [terrain](terrain::Terrain) on a [Problem], places a start and goal, picks an
//! [Algorithm] ([A*](https://en.wikipedia.org/wiki/A*_search_algorithm) or
//! [Dijkstra](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm)) and then advances the
//! search one expansion at a time with [GridSolver::step], so the search can be shown frame by
//! frame. Movement is 4-directional and every terrain has a positive cost to enter.
//!
//! The [Sandbox] bundles a problem and a solver behind the commands a rendering host issues and
//! paces the stepping by elapsed time.
pub mod error;
pub mod problem;
pub mod sandbox;
pub mod solver;
pub mod terrain;

pub use error::SearchError;
pub use problem::{Cell, ParseMapError, Problem};
pub use sandbox::{Command, Sandbox, SandboxConfig};
pub use solver::{Algorithm, GridSolver, SearchStatus};
pub use terrain::Terrain;

/// Cost of entering a [Terrain::Clear] cell, the cheapest step.
pub const CLEAR_COST: u32 = 1;
pub const FOREST_COST: u32 = 5;
pub const WATER_COST: u32 = 10;
/// Walls are never entered. Their nominal cost still exceeds `n * m * WATER_COST` for grids of up to
/// 400 million cells.
pub const WALL_COST: u32 = u32::MAX;
