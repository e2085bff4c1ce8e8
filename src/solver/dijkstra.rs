use crate::problem::Problem;
use crate::solver::{GridSolver, SearchState};

/// Uninformed search: the frontier is keyed on the accumulated cost alone.
#[derive(Clone, Debug, Default)]
pub struct DijkstraSolver {
    state: SearchState,
}

impl DijkstraSolver {
    pub fn new() -> DijkstraSolver {
        DijkstraSolver::default()
    }
}

impl GridSolver for DijkstraSolver {
    fn name(&self) -> &'static str {
        "Dijkstra"
    }
    fn state(&self) -> &SearchState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut SearchState {
        &mut self.state
    }

    fn begin(&mut self, _: &Problem) {}

    fn relax(&mut self, _: &Problem, from: usize, to: usize, new_cost: u32) -> Option<u32> {
        if self.state.cost(to).is_some_and(|known| known <= new_cost) {
            return None;
        }
        self.state.improve(to, from, new_cost);
        Some(new_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::solver::astar::AstarSolver;

    #[test]
    fn solve_simple_problem() {
        let mut problem = Problem::new(5, 5);
        problem.set_start(0, 0).unwrap();
        problem.set_goal(4, 4).unwrap();
        let mut solver = DijkstraSolver::new();
        assert_eq!(solver.solve_to_completion(&mut problem), Ok(8));
        assert_eq!(problem.solution().len(), 9);
        assert!(problem.is_contiguous(problem.solution()));
        assert_eq!(problem.path_cost(problem.solution()), 8);
    }

    /// Dijkstra explores in rings of equal cost, so it never expands fewer cells than A*.
    #[test]
    fn expands_at_least_as_much_as_astar() {
        let map = "\
            ..F....
            .S#~...
            ..#F...
            ..#...G";
        let mut dijkstra_problem: Problem = map.parse().unwrap();
        let mut astar_problem = dijkstra_problem.clone();
        let mut dijkstra = DijkstraSolver::new();
        let mut astar = AstarSolver::new();
        let dijkstra_cost = dijkstra.solve_to_completion(&mut dijkstra_problem).unwrap();
        let astar_cost = astar.solve_to_completion(&mut astar_problem).unwrap();
        assert_eq!(dijkstra_cost, astar_cost);
        assert!(dijkstra.expansions() >= astar.expansions());
    }

    #[test]
    fn unreachable_goal() {
        let mut problem: Problem = "\
            S#.
            ##G"
            .parse()
            .unwrap();
        let mut solver = DijkstraSolver::new();
        solver.solve(&mut problem).unwrap();
        assert_eq!(solver.step(&mut problem), Ok(None));
        assert_eq!(solver.step(&mut problem), Err(SearchError::Unreachable));
        assert!(!solver.solved());
        assert_eq!(solver.step(&mut problem), Err(SearchError::NotStarted));
    }
}
