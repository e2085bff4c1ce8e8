use std::time::Duration;

use grid_sandbox::{Algorithm, Command, Problem, Sandbox, SandboxConfig, Terrain};

// A headless host: paints a map, then runs both algorithms on it with simulated 16 ms frames,
// printing the grid whenever the search has advanced by a few steps.
//
// - S marks the start, G the goal
// - # walls, F forest, ~ water
// - o expanded cells, * the final path

const MAP: &str = "\
    ............
    .S....FF....
    .....FFF~~..
    ####..F.~~..
    ......#.....
    .~~~..#...G.
    ......#.....";

const FRAME: Duration = Duration::from_millis(16);

fn main() {
    let problem: Problem = MAP.parse().expect("demo map is well formed");
    let config = SandboxConfig {
        width: problem.width(),
        height: problem.height(),
        step_interval: Duration::from_millis(40),
        algorithm: Algorithm::AStar,
    };
    let mut sandbox = Sandbox::with_problem(config, problem);
    // Edits made through commands, as a pointer would.
    sandbox
        .apply(Command::SetTerrain {
            x: 9,
            y: 3,
            terrain: Terrain::Wall,
        })
        .unwrap();

    for algorithm in Algorithm::ALL {
        sandbox.apply(Command::Restart).unwrap();
        sandbox.apply(Command::SelectAlgorithm(algorithm)).unwrap();
        sandbox.apply(Command::Begin).unwrap();
        let mut frame = 0;
        loop {
            frame += 1;
            match sandbox.tick(FRAME) {
                Ok(Some(_)) => break,
                Ok(None) => {}
                Err(err) => {
                    println!("{err}");
                    break;
                }
            }
            if frame % 20 == 0 {
                println!("{}\n{}", sandbox.title(), sandbox.problem());
            }
        }
        println!(
            "{} after {} expansions\n{}",
            sandbox.title(),
            sandbox.solver().expansions(),
            sandbox.problem()
        );
        println!("Path:");
        for p in sandbox.problem().solution_points() {
            println!("{:?}", p);
        }
    }
}
