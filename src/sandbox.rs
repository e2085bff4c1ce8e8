use std::time::Duration;

use log::{info, warn};

use crate::error::SearchError;
use crate::problem::Problem;
use crate::solver::{Algorithm, GridSolver};
use crate::terrain::Terrain;

/// Settings a host starts a [Sandbox] with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SandboxConfig {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Minimum time between two search steps.
    pub step_interval: Duration,
    pub algorithm: Algorithm,
}

impl Default for SandboxConfig {
    fn default() -> SandboxConfig {
        SandboxConfig {
            width: 20,
            height: 15,
            step_interval: Duration::from_millis(50),
            algorithm: Algorithm::AStar,
        }
    }
}

/// Discrete requests a host derives from pointer and key events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    SetTerrain { x: i32, y: i32, terrain: Terrain },
    SetStart { x: i32, y: i32 },
    SetGoal { x: i32, y: i32 },
    ClearCell { x: i32, y: i32 },
    /// Forget the current search but keep the map.
    Restart,
    /// Wipe the map as well.
    Reset,
    SelectAlgorithm(Algorithm),
    /// Start searching; the search then advances through [Sandbox::tick].
    Begin,
}

impl Command {
    fn edits_problem(&self) -> bool {
        matches!(
            self,
            Command::SetTerrain { .. }
                | Command::SetStart { .. }
                | Command::SetGoal { .. }
                | Command::ClearCell { .. }
                | Command::SelectAlgorithm(_)
        )
    }
}

/// The state a rendering host drives: one [Problem], the selected solver and the pacing of its
/// steps. The grid must not change under an active search, so edits arriving while the solver is
/// searching are ignored.
pub struct Sandbox {
    config: SandboxConfig,
    problem: Problem,
    algorithm: Algorithm,
    solver: Box<dyn GridSolver>,
    since_step: Duration,
    last_cost: Option<u32>,
    last_error: Option<SearchError>,
}

impl Sandbox {
    pub fn new(config: SandboxConfig) -> Sandbox {
        Sandbox {
            problem: Problem::new(config.width, config.height),
            algorithm: config.algorithm,
            solver: config.algorithm.solver(),
            since_step: Duration::ZERO,
            last_cost: None,
            last_error: None,
            config,
        }
    }

    /// Starts from an existing problem instead of an empty grid of the configured size.
    pub fn with_problem(config: SandboxConfig, problem: Problem) -> Sandbox {
        Sandbox {
            problem,
            ..Sandbox::new(config)
        }
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }
    pub fn problem(&self) -> &Problem {
        &self.problem
    }
    pub fn solver(&self) -> &dyn GridSolver {
        self.solver.as_ref()
    }
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
    /// Cost of the last path found since the last [Command::Begin].
    pub fn last_cost(&self) -> Option<u32> {
        self.last_cost
    }
    pub fn last_error(&self) -> Option<SearchError> {
        self.last_error
    }

    /// Applies a command. Failures are returned and also kept for [Sandbox::title].
    pub fn apply(&mut self, command: Command) -> Result<(), SearchError> {
        let result = self.dispatch(command);
        self.last_error = result.err();
        result
    }

    fn dispatch(&mut self, command: Command) -> Result<(), SearchError> {
        if command.edits_problem() && self.solver.solving() {
            warn!("Ignoring {:?} while {} is searching", command, self.algorithm);
            return Ok(());
        }
        match command {
            Command::SetTerrain { x, y, terrain } => {
                self.problem.set_terrain(x, y, terrain)?;
            }
            Command::SetStart { x, y } => {
                self.problem.set_start(x, y)?;
            }
            Command::SetGoal { x, y } => {
                self.problem.set_goal(x, y)?;
            }
            Command::ClearCell { x, y } => self.problem.clear_cell(x, y)?,
            Command::Restart => {
                self.problem.restart();
                self.forget_search();
            }
            Command::Reset => {
                self.problem.reset();
                self.forget_search();
            }
            Command::SelectAlgorithm(algorithm) => {
                info!("Selected {}", algorithm);
                self.algorithm = algorithm;
                self.solver = algorithm.solver();
                self.last_cost = None;
            }
            Command::Begin => {
                self.solver.solve(&mut self.problem)?;
                self.since_step = Duration::ZERO;
                self.last_cost = None;
            }
        }
        Ok(())
    }

    fn forget_search(&mut self) {
        self.solver.reset();
        self.since_step = Duration::ZERO;
        self.last_cost = None;
    }

    /// Advances time by `elapsed`. Steps the search at most once, and only when at least
    /// `step_interval` has passed since the previous step. Returns the path cost on the step that
    /// completes the search.
    pub fn tick(&mut self, elapsed: Duration) -> Result<Option<u32>, SearchError> {
        if !self.solver.solving() {
            return Ok(None);
        }
        self.since_step += elapsed;
        if self.since_step < self.config.step_interval {
            return Ok(None);
        }
        self.since_step = Duration::ZERO;
        let result = self.solver.step(&mut self.problem);
        match result {
            Ok(Some(cost)) => self.last_cost = Some(cost),
            Err(err) => self.last_error = Some(err),
            Ok(None) => {}
        }
        result
    }

    /// Plain text status for a window title: the algorithm name, then the last path cost or the
    /// last failure if there is one.
    pub fn title(&self) -> String {
        match (self.last_error, self.last_cost) {
            (Some(err), _) => format!("{} - {}", self.algorithm, err),
            (None, Some(cost)) => format!("{} - cost: {}", self.algorithm, cost),
            (None, None) if self.solver.solving() => format!("{} - searching", self.algorithm),
            (None, None) => self.algorithm.to_string(),
        }
    }
}
