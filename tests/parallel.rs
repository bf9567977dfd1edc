//! Multi-threaded search

use cliquecol_rs::solver::{Options, Solver, Status};
use cliquecol_rs::Graph;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

fn random_graph(n: usize, p: f64, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = Graph::new(n);
    for u in 0..n {
        for v in u + 1..n {
            if rng.gen_bool(p) {
                graph.add_edge(u, v);
            }
        }
    }
    graph
}

fn options(threads: usize) -> Options {
    Options {
        threads,
        timeout: None,
        ..Options::default()
    }
}

#[test]
fn threads_find_the_same_chromatic_number() {
    for seed in 0..8 {
        let g = random_graph(20, 0.5, 900 + seed);
        let sequential = Solver::new(options(1)).solve(&g).unwrap();
        let parallel = Solver::new(options(4)).solve(&g).unwrap();
        assert_eq!(parallel.status(), Status::Optimal);
        assert_eq!(parallel.upper_bound(), sequential.upper_bound(), "seed {seed}");
        assert_eq!(g.find_conflict(parallel.coloring()), None);
    }
}

#[test]
fn parallel_search_with_deadline_keeps_a_valid_coloring() {
    let g = random_graph(60, 0.5, 42);
    let options = Options {
        threads: 3,
        timeout: Some(Duration::from_millis(50)),
        ..Options::default()
    };
    let solution = Solver::new(options).solve(&g).unwrap();
    assert_eq!(g.find_conflict(solution.coloring()), None);
    assert!(solution.lower_bound() <= solution.upper_bound());
}
