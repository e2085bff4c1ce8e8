use crate::problem::Problem;
use crate::solver::{GridSolver, SearchState};

/// A* over the terrain grid, guided by the Manhattan distance to the goal. Keeps an f-value
/// (cost plus heuristic) per cell next to the shared tables; the frontier is keyed on it.
#[derive(Clone, Debug, Default)]
pub struct AstarSolver {
    state: SearchState,
    f_value: Vec<Option<u32>>,
}

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver::default()
    }

    /// Cost plus heuristic of the cell at `index`, [None] until the cell has been reached.
    pub fn f_value(&self, index: usize) -> Option<u32> {
        self.f_value.get(index).copied().flatten()
    }
}

impl GridSolver for AstarSolver {
    fn name(&self) -> &'static str {
        "A*"
    }
    fn state(&self) -> &SearchState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut SearchState {
        &mut self.state
    }

    fn begin(&mut self, problem: &Problem) {
        self.f_value = vec![None; problem.len()];
        if let Some(start) = problem.start() {
            self.f_value[start] = Some(problem.heuristic(start));
        }
    }

    fn relax(&mut self, problem: &Problem, from: usize, to: usize, new_cost: u32) -> Option<u32> {
        let f_value = new_cost.saturating_add(problem.heuristic(to));
        if self.f_value[to].is_some_and(|known| known <= f_value) {
            return None;
        }
        self.f_value[to] = Some(f_value);
        self.state.improve(to, from, new_cost);
        Some(f_value)
    }

    fn reset(&mut self) {
        self.state = SearchState::default();
        self.f_value.clear();
    }
}
