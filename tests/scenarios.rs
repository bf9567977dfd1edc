//! End-to-end runs on small graphs with known chromatic numbers

use cliquecol_rs::solver::{AttemptResult, Options, Solver, Status, UpperBoundSource};
use cliquecol_rs::Graph;
use std::time::Duration;

fn solve(graph: &Graph) -> cliquecol_rs::Solution {
    Solver::new(Options::default()).solve(graph).unwrap()
}

#[test]
fn path_of_four_vertices() {
    let g = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
    let solution = solve(&g);
    assert_eq!(solution.lower_bound(), 2);
    assert_eq!(solution.upper_bound(), 2);
    assert!(solution.is_optimal());
    let c = solution.coloring();
    assert_ne!(c[0], c[1]);
    assert_eq!(c[0], c[2]);
    assert_eq!(c[1], c[3]);
}

#[test]
fn complete_graph_on_five_vertices() {
    let g = Graph::complete(5);
    let solution = solve(&g);
    assert_eq!(solution.lower_bound(), 5);
    assert_eq!(solution.upper_bound(), 5);
    assert_eq!(solution.status(), Status::Optimal);
    assert_eq!(solution.statistics().cliques(), 1);
    let attempt = &solution.attempts()[0];
    assert_eq!(attempt.colors, 4);
    assert_eq!(attempt.result, AttemptResult::Infeasible);
    let mut colors = solution.coloring().to_vec();
    colors.sort_unstable();
    assert_eq!(colors, vec![0, 1, 2, 3, 4]);
}

#[test]
fn two_disjoint_triangles() {
    let g = Graph::from_edges(6, &[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)]).unwrap();
    let solution = solve(&g);
    assert_eq!(solution.lower_bound(), 3);
    assert_eq!(solution.upper_bound(), 3);
    assert_eq!(solution.statistics().cliques(), 2);
    let c = solution.coloring();
    let mut first: Vec<usize> = c[..3].to_vec();
    let mut second: Vec<usize> = c[3..].to_vec();
    first.sort_unstable();
    second.sort_unstable();
    assert_eq!(first, vec![0, 1, 2]);
    assert_eq!(second, vec![0, 1, 2]);
}

#[test]
fn zero_timeout_reports_the_initial_bound() {
    let g = grotzsch();
    let options = Options {
        timeout: Some(Duration::ZERO),
        ..Options::default()
    };
    let solution = Solver::new(options).solve(&g).unwrap();
    assert_eq!(solution.status(), Status::TimeLimited);
    assert!(solution.attempts().is_empty());
    assert_eq!(g.find_conflict(solution.coloring()), None);
    assert!(solution.upper_bound() >= 4);
    assert!(solution.lower_bound() <= solution.upper_bound());
}

#[test]
fn zero_timeout_with_trivial_bound() {
    let g = grotzsch();
    let options = Options {
        timeout: Some(Duration::ZERO),
        upper_bound: UpperBoundSource::Trivial,
        ..Options::default()
    };
    let solution = Solver::new(options).solve(&g).unwrap();
    assert_eq!(solution.status(), Status::TimeLimited);
    assert_eq!(g.find_conflict(solution.coloring()), None);
}

#[test]
fn triangle_free_graph_needs_search() {
    let g = grotzsch();
    let solution = Solver::new(Options { timeout: None, ..Options::default() }).solve(&g).unwrap();
    assert_eq!(solution.lower_bound(), 2);
    assert_eq!(solution.upper_bound(), 4);
    assert!(solution.is_optimal());
    assert_eq!(g.find_conflict(solution.coloring()), None);
}

#[test]
fn edgeless_and_empty_graphs() {
    let solution = solve(&Graph::new(4));
    assert_eq!(solution.lower_bound(), 1);
    assert_eq!(solution.upper_bound(), 1);
    assert_eq!(solution.coloring(), &[0, 0, 0, 0]);

    let solution = solve(&Graph::new(0));
    assert_eq!(solution.lower_bound(), 0);
    assert_eq!(solution.upper_bound(), 0);
    assert!(solution.is_optimal());
}

#[test]
fn best_clique_is_reported_in_input_numbering() {
    // triangle on the high vertex ids, pendant path elsewhere
    let g = Graph::from_edges(6, &[(0, 1), (1, 2), (3, 4), (4, 5), (3, 5)]).unwrap();
    let solution = solve(&g);
    let mut clique = solution.best_clique().to_vec();
    clique.sort_unstable();
    assert_eq!(clique, vec![3, 4, 5]);
}

#[test]
fn memory_cap_stops_with_a_heuristic_coloring() {
    let g = grotzsch();
    let options = Options {
        memory_limit: Some(1),
        timeout: None,
        ..Options::default()
    };
    let solution = Solver::new(options).solve(&g).unwrap();
    assert_eq!(solution.status(), Status::MemoryLimited);
    assert!(!solution.is_optimal());
    assert_eq!(
        solution.attempts().last().map(|a| a.result),
        Some(AttemptResult::MemoryLimited)
    );
    assert!(solution.upper_bound() >= 4);
    assert_eq!(g.find_conflict(solution.coloring()), None);
}

/// Mycielski graph of C5: triangle-free with chromatic number 4
fn grotzsch() -> Graph {
    let mut edges = Vec::new();
    for i in 0..5 {
        edges.push((i, (i + 1) % 5));
        edges.push((5 + i, (i + 1) % 5));
        edges.push((5 + i, (i + 4) % 5));
        edges.push((10, 5 + i));
    }
    Graph::from_edges(11, &edges).unwrap()
}
