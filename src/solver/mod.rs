use core::fmt;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, info, warn};

use crate::error::SearchError;
use crate::problem::Problem;

pub mod astar;
pub mod dijkstra;

use astar::AstarSolver;
use dijkstra::DijkstraSolver;

/// Lifecycle of a search. [SearchStatus::PathReady] means the goal has been popped and the next
/// [GridSolver::step] reconstructs the path; callers that only care about two phases see it as
/// still solving.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchStatus {
    #[default]
    Idle,
    Solving,
    PathReady,
    Solved,
}

/// A frontier entry. The heap is a max-heap, so the ordering is reversed on the key.
#[derive(Clone, Copy, Debug)]
pub struct FrontierEntry {
    pub key: u32,
    pub cost: u32,
    pub index: usize,
    seq: u64,
}

impl Eq for FrontierEntry {}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // First orders per key, then favours the entry with the largest accumulated cost (the one
        // closest to the goal), then the earliest pushed.
        other
            .key
            .cmp(&self.key)
            .then_with(|| self.cost.cmp(&other.cost))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Tables shared by every variant: the frontier, best known cost and parent of each cell, indexed
/// like the cells of the [Problem] they were allocated for.
#[derive(Clone, Debug, Default)]
pub struct SearchState {
    frontier: BinaryHeap<FrontierEntry>,
    cost: Vec<Option<u32>>,
    parent: Vec<Option<usize>>,
    status: SearchStatus,
    pushed: u64,
    expansions: usize,
    last_expanded: Option<usize>,
}

impl SearchState {
    fn begin(&mut self, size: usize, start: usize) {
        *self = SearchState {
            cost: vec![None; size],
            parent: vec![None; size],
            status: SearchStatus::Solving,
            ..SearchState::default()
        };
        self.cost[start] = Some(0);
        self.push(start, 0, 0);
    }

    fn push(&mut self, index: usize, key: u32, cost: u32) {
        self.frontier.push(FrontierEntry {
            key,
            cost,
            index,
            seq: self.pushed,
        });
        self.pushed += 1;
    }

    /// Records a cheaper way to reach `index` through `parent`.
    pub(crate) fn improve(&mut self, index: usize, parent: usize, cost: u32) {
        self.cost[index] = Some(cost);
        self.parent[index] = Some(parent);
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }
    /// Best known accumulated cost to reach the cell at `index`, [None] while unknown.
    pub fn cost(&self, index: usize) -> Option<u32> {
        self.cost.get(index).copied().flatten()
    }
    pub fn parent(&self, index: usize) -> Option<usize> {
        self.parent.get(index).copied().flatten()
    }
    /// Number of entries in the frontier, stale ones included.
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }
    pub fn frontier(&self) -> impl Iterator<Item = &FrontierEntry> {
        self.frontier.iter()
    }
    pub fn expansions(&self) -> usize {
        self.expansions
    }
    pub fn last_expanded(&self) -> Option<usize> {
        self.last_expanded
    }

    /// Walks the parents back from `goal`, returning the path from the start to `goal` and the
    /// cost of walking it.
    fn reconstruct(&self, problem: &Problem, goal: usize) -> (Vec<usize>, u32) {
        let mut path = std::iter::successors(Some(goal), |&ix| self.parent[ix]).collect::<Vec<_>>();
        path.reverse();
        let total_cost = problem.path_cost(&path);
        (path, total_cost)
    }
}

/// The capability set shared by the search variants. A variant supplies its name, its tables and
/// the relaxation rule; starting, stepping and path reconstruction are shared.
pub trait GridSolver {
    fn name(&self) -> &'static str;
    fn state(&self) -> &SearchState;
    fn state_mut(&mut self) -> &mut SearchState;

    /// Allocates any variant specific tables for a fresh search on `problem`.
    fn begin(&mut self, problem: &Problem);

    /// Considers reaching `to` from `from` at accumulated cost `new_cost`. If that improves on what
    /// is known, updates the tables and returns the frontier key `to` should be pushed with.
    fn relax(&mut self, problem: &Problem, from: usize, to: usize, new_cost: u32) -> Option<u32>;

    /// Discards all search tables, returning to [SearchStatus::Idle].
    fn reset(&mut self) {
        *self.state_mut() = SearchState::default();
    }

    fn status(&self) -> SearchStatus {
        self.state().status
    }
    /// Whether a search has started and not yet concluded.
    fn solving(&self) -> bool {
        matches!(
            self.status(),
            SearchStatus::Solving | SearchStatus::PathReady
        )
    }
    fn solved(&self) -> bool {
        self.status() == SearchStatus::Solved
    }
    fn expansions(&self) -> usize {
        self.state().expansions
    }

    /// Starts a new search on `problem`: restarts the problem, discards previous tables and seeds
    /// the frontier with the start cell.
    fn solve(&mut self, problem: &mut Problem) -> Result<(), SearchError> {
        if self.status() != SearchStatus::Idle {
            warn!("{} is already active, reset it before solving again", self.name());
            return Err(SearchError::AlreadyActive);
        }
        let (Some(start), Some(goal)) = (problem.start(), problem.goal()) else {
            return Err(SearchError::MissingEndpoints);
        };
        info!(
            "Solving with {} from {} to {}",
            self.name(),
            problem.point(start),
            problem.point(goal)
        );
        problem.restart();
        self.state_mut().begin(problem.len(), start);
        self.begin(problem);
        Ok(())
    }

    /// Does one bounded unit of work: expands the next cell of the frontier, or, right after the
    /// goal was expanded, reconstructs the path into [Problem::solution] and returns its cost.
    /// Returns `Ok(None)` for every other call, including any made after the search is solved.
    fn step(&mut self, problem: &mut Problem) -> Result<Option<u32>, SearchError> {
        match self.status() {
            SearchStatus::Idle => Err(SearchError::NotStarted),
            SearchStatus::Solved => Ok(None),
            SearchStatus::PathReady => {
                let goal = problem.goal().ok_or(SearchError::MissingEndpoints)?;
                let (path, total_cost) = self.state().reconstruct(problem, goal);
                info!(
                    "{} found a path of {} cells with cost {} after {} expansions",
                    self.name(),
                    path.len(),
                    total_cost,
                    self.expansions()
                );
                problem.set_solution(path);
                self.state_mut().status = SearchStatus::Solved;
                Ok(Some(total_cost))
            }
            SearchStatus::Solving => {
                let goal = problem.goal().ok_or(SearchError::MissingEndpoints)?;
                // Cells are pushed again whenever a cheaper route is found. The stale entries are
                // dropped here as the first pop of a cell always carries its best key.
                let FrontierEntry { index, cost, .. } = loop {
                    match self.state_mut().frontier.pop() {
                        Some(entry) if problem.cell(entry.index).visited() => continue,
                        Some(entry) => break entry,
                        None => {
                            warn!(
                                "{} exhausted the frontier after {} expansions without reaching {}",
                                self.name(),
                                self.expansions(),
                                problem.point(goal)
                            );
                            self.reset();
                            return Err(SearchError::Unreachable);
                        }
                    }
                };
                problem.mark_visited(index);
                let state = self.state_mut();
                state.expansions += 1;
                state.last_expanded = Some(index);
                debug!("{} expanded {} at cost {}", self.name(), problem.point(index), cost);
                if index == goal {
                    self.state_mut().status = SearchStatus::PathReady;
                    return Ok(None);
                }
                let neighbours = problem
                    .neumann_neighbours(index)
                    .filter(|&n| problem.terrain(n).is_passable())
                    .collect::<Vec<_>>();
                for n in neighbours {
                    let new_cost = cost.saturating_add(problem.terrain(n).cost());
                    if let Some(key) = self.relax(problem, index, n, new_cost) {
                        self.state_mut().push(n, key, new_cost);
                    }
                }
                Ok(None)
            }
        }
    }

    /// Starts a search and steps it until it concludes, returning the path cost.
    fn solve_to_completion(&mut self, problem: &mut Problem) -> Result<u32, SearchError> {
        self.solve(problem)?;
        loop {
            if let Some(cost) = self.step(problem)? {
                return Ok(cost);
            }
        }
    }
}

/// Selects which [GridSolver] variant a host instantiates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    #[default]
    AStar,
    Dijkstra,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::AStar, Algorithm::Dijkstra];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::AStar => "A*",
            Algorithm::Dijkstra => "Dijkstra",
        }
    }

    pub fn solver(self) -> Box<dyn GridSolver> {
        match self {
            Algorithm::AStar => Box::new(AstarSolver::new()),
            Algorithm::Dijkstra => Box::new(DijkstraSolver::new()),
        }
    }

    /// The algorithm after this one, wrapping around.
    pub fn next(self) -> Algorithm {
        match self {
            Algorithm::AStar => Algorithm::Dijkstra,
            Algorithm::Dijkstra => Algorithm::AStar,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: u32, cost: u32, seq: u64) -> FrontierEntry {
        FrontierEntry {
            key,
            cost,
            index: 0,
            seq,
        }
    }

    #[test]
    fn frontier_pops_lowest_key_first() {
        let mut heap = BinaryHeap::new();
        heap.push(entry(5, 0, 0));
        heap.push(entry(2, 0, 1));
        heap.push(entry(9, 0, 2));
        assert_eq!(heap.pop().map(|e| e.key), Some(2));
        assert_eq!(heap.pop().map(|e| e.key), Some(5));
    }

    #[test]
    fn frontier_ties_are_deterministic() {
        let mut heap = BinaryHeap::new();
        heap.push(entry(4, 1, 0));
        heap.push(entry(4, 3, 1));
        heap.push(entry(4, 3, 2));
        assert_eq!(heap.pop().map(|e| e.seq), Some(1));
        assert_eq!(heap.pop().map(|e| e.seq), Some(2));
        assert_eq!(heap.pop().map(|e| e.seq), Some(0));
    }

    #[test]
    fn algorithm_selection() {
        for algorithm in Algorithm::ALL {
            let solver = algorithm.solver();
            assert_eq!(solver.name(), algorithm.name());
            assert_eq!(solver.status(), SearchStatus::Idle);
            assert_eq!(algorithm.next().next(), algorithm);
        }
        assert_eq!(Algorithm::default().to_string(), "A*");
    }

    #[test]
    fn step_before_solve_is_not_started() {
        let mut problem = Problem::new(2, 2);
        for algorithm in Algorithm::ALL {
            let mut solver = algorithm.solver();
            assert_eq!(solver.step(&mut problem), Err(SearchError::NotStarted));
        }
    }
}
