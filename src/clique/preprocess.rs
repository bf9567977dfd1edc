//! Clique preprocessing
//!
//! Covers the edges of the graph with maximal cliques while pruning vertices
//! that cannot belong to a clique larger than the best one found. Produces
//! the lower bound, the best clique C*, the deduplicated clique collection
//! and the reduced graph the heuristic coloring phase works on.
//!
//! Two working copies are kept:
//! - `reduced`: the full graph minus the edges of pruned vertices
//! - `active`: `reduced` minus the edges already covered by a stored clique
//!
//! Degree pruning always removes edges from both copies, and is run to a
//! fixpoint every time the lower bound improves.

use super::{Clique, CliqueOracle};
use crate::graph::Graph;
use log::{debug, info, warn};

/// Result of clique preprocessing
#[derive(Debug, Clone)]
pub struct Preprocessing {
    /// Deduplicated maximal cliques, in discovery order
    pub cliques: Vec<Clique>,
    /// Size of the largest clique found
    pub lower_bound: usize,
    /// A largest clique; among equals, the one with the largest degree sum
    pub best_clique: Clique,
    /// The input graph with the edges of pruned vertices removed
    pub reduced: Graph,
    /// Number of edges dropped by degree pruning
    pub edges_removed: usize,
    /// Number of oracle calls made
    pub oracle_calls: usize,
    /// Number of duplicate cliques discarded
    pub duplicates: usize,
}

impl Preprocessing {
    fn empty(graph: &Graph) -> Self {
        Self {
            cliques: Vec::new(),
            lower_bound: 0,
            best_clique: Clique::empty(graph.num_vertices()),
            reduced: graph.clone(),
            edges_removed: 0,
            oracle_calls: 0,
            duplicates: 0,
        }
    }

    /// Records a clique, returning true if it raised the lower bound
    fn offer(&mut self, clique: Clique) -> bool {
        let improved = clique.size() > self.lower_bound;
        if improved {
            self.lower_bound = clique.size();
            self.best_clique = clique.clone();
        }
        debug!(
            "clique #{} of size {}{}",
            self.cliques.len(),
            clique.size(),
            if improved { " (new lower bound)" } else { "" }
        );
        self.cliques.push(clique);
        improved
    }
}

/// Runs clique preprocessing on `graph`
///
/// An empty graph has lower bound 0; any graph with a vertex has lower bound
/// at least 1 (a singleton clique).
pub fn preprocess(graph: &Graph, oracle: &mut dyn CliqueOracle) -> Preprocessing {
    let mut result = Preprocessing::empty(graph);
    if graph.num_vertices() == 0 {
        return result;
    }
    let mut active = graph.clone();

    let mut seed = oracle.find_clique(&result.reduced);
    result.oracle_calls += 1;
    seed.maximalize(&result.reduced);
    cover(&mut active, &seed);
    result.offer(seed);
    result.edges_removed += reduce(&mut result.reduced, &mut active, result.lower_bound);

    while active.num_edges() > 0 {
        let mut clique = oracle.find_clique(&active);
        result.oracle_calls += 1;
        if !covers_edge(&active, &clique) {
            warn!("clique oracle returned no uncovered edge; falling back to a single edge");
            clique = match active.edges().next() {
                Some((u, v)) => Clique::from_vertices(graph.num_vertices(), [u, v]),
                None => break,
            };
        }
        clique.maximalize(&result.reduced);
        cover(&mut active, &clique);

        if result.offer(clique) {
            result.edges_removed += reduce(&mut result.reduced, &mut active, result.lower_bound);
        }
    }

    result.duplicates = deduplicate(&mut result.cliques);
    select_best_clique(&mut result);

    info!(
        "preprocessing: LB {} edges_removed {} cliques {} (oracle calls {}, duplicates {})",
        result.lower_bound,
        result.edges_removed,
        result.cliques.len(),
        result.oracle_calls,
        result.duplicates
    );
    result
}

/// Removes the edges of `clique` from `active`
fn cover(active: &mut Graph, clique: &Clique) {
    let members: Vec<usize> = clique.vertices().collect();
    for (i, &u) in members.iter().enumerate() {
        for &v in &members[i + 1..] {
            active.remove_edge(u, v);
        }
    }
}

fn covers_edge(active: &Graph, clique: &Clique) -> bool {
    let members: Vec<usize> = clique.vertices().collect();
    members
        .iter()
        .enumerate()
        .any(|(i, &u)| members[i + 1..].iter().any(|&v| active.has_edge(u, v)))
}

/// Drops every edge of vertices whose degree is below `lower_bound - 1`,
/// repeating until no such vertex keeps an edge. Returns the edges removed.
fn reduce(reduced: &mut Graph, active: &mut Graph, lower_bound: usize) -> usize {
    let mut removed = 0;
    loop {
        let mut changed = false;
        for v in 0..reduced.num_vertices() {
            let degree = reduced.degree(v);
            if degree > 0 && degree + 1 < lower_bound {
                for u in reduced.isolate(v) {
                    active.remove_edge(v, u);
                    removed += 1;
                }
                changed = true;
            }
        }
        if !changed {
            return removed;
        }
    }
}

/// Removes cliques equal to an earlier one, returning how many were removed
fn deduplicate(cliques: &mut Vec<Clique>) -> usize {
    let before = cliques.len();
    let mut kept: Vec<Clique> = Vec::with_capacity(before);
    for clique in cliques.drain(..) {
        let duplicate = kept.iter().any(|other| {
            other.size() == clique.size()
                && other.members().intersection_len(clique.members()) == clique.size()
        });
        if !duplicate {
            kept.push(clique);
        }
    }
    *cliques = kept;
    before - cliques.len()
}

fn select_best_clique(result: &mut Preprocessing) {
    let mut best_sum = None;
    for clique in &result.cliques {
        if clique.size() != result.lower_bound {
            continue;
        }
        let sum = clique.degree_sum(&result.reduced);
        if best_sum.map_or(true, |best| sum > best) {
            best_sum = Some(sum);
            result.best_clique = clique.clone();
        }
    }
}
