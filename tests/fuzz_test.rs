/// Fuzzes the search engine by checking for many random terrain grids that a path is found exactly
/// when the goal shares a connected component with the start, and that both algorithms agree on the
/// cost of that path.
use grid_sandbox::{Algorithm, GridSolver, Problem, SearchError, Terrain};
use rand::prelude::*;

fn random_problem(n: usize, rng: &mut StdRng, wall_probability: f64) -> Problem {
    let mut problem = Problem::new(n, n);
    for x in 0..n as i32 {
        for y in 0..n as i32 {
            let terrain = if rng.gen_bool(wall_probability) {
                Terrain::Wall
            } else {
                *[Terrain::Clear, Terrain::Clear, Terrain::Forest, Terrain::Water]
                    .choose(rng)
                    .unwrap()
            };
            problem.set_terrain(x, y, terrain).unwrap();
        }
    }
    let last = n as i32 - 1;
    problem.clear_cell(0, 0).unwrap();
    problem.clear_cell(last, last).unwrap();
    problem.set_start(0, 0).unwrap();
    problem.set_goal(last, last).unwrap();
    problem
}

fn visualize_problem(problem: &Problem) {
    println!("{}", problem);
}

#[test]
fn fuzz() {
    const N: usize = 10;
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..N_GRIDS {
        let mut problem = random_problem(N, &mut rng, 0.35);
        let reachable = problem.reachable();
        for algorithm in Algorithm::ALL {
            let mut solver = algorithm.solver();
            let result = solver.solve_to_completion(&mut problem);
            // Show the grid if the search disagrees with the components
            if result.is_ok() != reachable {
                visualize_problem(&problem);
            }
            assert_eq!(result.is_ok(), reachable);
            if !reachable {
                assert_eq!(result, Err(SearchError::Unreachable));
                assert!(!solver.solved());
                assert!(problem.solution().is_empty());
            }
        }
    }
}

#[test]
fn fuzz_cost() {
    const N: usize = 8;
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..N_GRIDS {
        let mut problem = random_problem(N, &mut rng, 0.2);
        if !problem.reachable() {
            continue;
        }
        let mut astar_problem = problem.clone();
        let mut astar = Algorithm::AStar.solver();
        let mut dijkstra = Algorithm::Dijkstra.solver();
        let astar_cost = astar.solve_to_completion(&mut astar_problem).unwrap();
        let dijkstra_cost = dijkstra.solve_to_completion(&mut problem).unwrap();
        if astar_cost != dijkstra_cost {
            println!("A* cost: {astar_cost}; Dijkstra cost: {dijkstra_cost}");
            visualize_problem(&astar_problem);
            visualize_problem(&problem);
        }
        assert_eq!(astar_cost, dijkstra_cost);
        assert!(astar.expansions() <= dijkstra.expansions());
        for (p, cost) in [(&astar_problem, astar_cost), (&problem, dijkstra_cost)] {
            let solution = p.solution();
            assert_eq!(solution.first().copied(), p.start());
            assert_eq!(solution.last().copied(), p.goal());
            assert!(p.is_contiguous(solution));
            assert_eq!(p.path_cost(solution), cost);
            assert!(solution.iter().all(|&ix| p.terrain(ix).is_passable()));
        }
    }
}

/// Stepping a restarted search over the same map visits the cells in the same order.
#[test]
fn fuzz_reproducible() {
    const N: usize = 8;
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let mut problem = random_problem(N, &mut rng, 0.2);
        for algorithm in Algorithm::ALL {
            let mut solver = algorithm.solver();
            let trace = |solver: &mut Box<dyn GridSolver>, problem: &mut Problem| {
                let mut order = Vec::new();
                solver.solve(problem).unwrap();
                let result = loop {
                    match solver.step(problem) {
                        Ok(Some(cost)) => break Ok(cost),
                        Ok(None) => order.extend(solver.state().last_expanded()),
                        Err(err) => break Err(err),
                    }
                };
                (order, result, problem.solution().to_vec())
            };
            let first = trace(&mut solver, &mut problem);
            problem.restart();
            solver.reset();
            let second = trace(&mut solver, &mut problem);
            assert_eq!(first, second);
        }
    }
}
