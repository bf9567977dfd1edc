//! Clique oracles
//!
//! An oracle returns one clique of the graph it is given per call. The
//! preprocessing loop does not enumerate cliques; it repeatedly asks for a
//! single large clique on the part of the graph whose edges are not yet
//! covered.

use super::Clique;
use crate::error::{ColoringError, Result};
use crate::graph::{Graph, VertexSet};
use log::debug;
use std::str::FromStr;

/// Source of single cliques
pub trait CliqueOracle {
    /// Returns a clique of `graph`
    ///
    /// When `graph` has at least one edge the clique must contain one, so
    /// that the caller makes progress covering edges.
    fn find_clique(&mut self, graph: &Graph) -> Clique;
}

/// Which oracle the preprocessor uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OracleKind {
    /// Greedy degree-driven construction
    #[default]
    Greedy,
    /// Branch-and-bound maximum clique, optionally capped at a node budget
    Exact {
        /// Search nodes allowed per call (None = run to completion)
        node_limit: Option<u64>,
    },
}

impl OracleKind {
    /// Instantiates the oracle
    pub fn build(self) -> Box<dyn CliqueOracle> {
        match self {
            OracleKind::Greedy => Box::new(GreedyCliqueOracle),
            OracleKind::Exact { node_limit } => Box::new(ExactCliqueOracle::new(node_limit)),
        }
    }
}

impl FromStr for OracleKind {
    type Err = ColoringError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "greedy" => Ok(OracleKind::Greedy),
            "exact" => Ok(OracleKind::Exact { node_limit: None }),
            _ => match s.strip_prefix("exact:") {
                Some(limit) => limit
                    .parse()
                    .map(|n| OracleKind::Exact { node_limit: Some(n) })
                    .map_err(|_| {
                        ColoringError::InvalidArgument(format!("invalid node limit '{limit}'"))
                    }),
                None => Err(ColoringError::InvalidArgument(format!(
                    "unknown clique oracle '{s}' (expected greedy, exact or exact:<nodes>)"
                ))),
            },
        }
    }
}

/// Greedy clique construction
///
/// Starts from a vertex of maximum degree and repeatedly adds the candidate
/// with the most neighbors among the remaining candidates. Ties go to the
/// smallest index, so the oracle is deterministic.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyCliqueOracle;

impl CliqueOracle for GreedyCliqueOracle {
    fn find_clique(&mut self, graph: &Graph) -> Clique {
        let n = graph.num_vertices();
        let mut clique = Clique::empty(n);
        let start = (0..n).max_by(|&a, &b| graph.degree(a).cmp(&graph.degree(b)).then(b.cmp(&a)));
        let Some(start) = start else {
            return clique;
        };

        clique.push(start);
        let mut candidates = graph.neighbors(start).clone();
        while !candidates.is_empty() {
            let best = candidates
                .iter()
                .max_by(|&a, &b| {
                    let da = graph.neighbors(a).intersection_len(&candidates);
                    let db = graph.neighbors(b).intersection_len(&candidates);
                    da.cmp(&db).then(b.cmp(&a))
                })
                .unwrap_or(start);
            clique.push(best);
            candidates.remove(best);
            candidates.intersect_with(graph.neighbors(best));
        }
        clique
    }
}

/// Maximum clique by branch and bound
///
/// Candidates are expanded in increasing index order and a branch is cut
/// when the current clique plus all remaining candidates cannot beat the
/// incumbent. The greedy clique seeds the incumbent, so with a node limit
/// the oracle degrades to "best clique found so far".
#[derive(Debug, Clone)]
pub struct ExactCliqueOracle {
    node_limit: Option<u64>,
    nodes: u64,
    best: Vec<usize>,
}

impl ExactCliqueOracle {
    /// Creates an oracle with an optional per-call node budget
    pub fn new(node_limit: Option<u64>) -> Self {
        Self {
            node_limit,
            nodes: 0,
            best: Vec::new(),
        }
    }

    fn out_of_budget(&self) -> bool {
        self.node_limit.is_some_and(|limit| self.nodes >= limit)
    }

    fn expand(&mut self, graph: &Graph, current: &mut Vec<usize>, mut candidates: VertexSet) {
        self.nodes += 1;
        if current.len() > self.best.len() {
            self.best = current.clone();
        }

        while let Some(v) = candidates.first() {
            if current.len() + candidates.len() <= self.best.len() || self.out_of_budget() {
                return;
            }
            let mut next = candidates.clone();
            next.intersect_with(graph.neighbors(v));
            current.push(v);
            self.expand(graph, current, next);
            current.pop();
            candidates.remove(v);
        }
    }
}

impl CliqueOracle for ExactCliqueOracle {
    fn find_clique(&mut self, graph: &Graph) -> Clique {
        let n = graph.num_vertices();
        self.nodes = 0;
        self.best = GreedyCliqueOracle.find_clique(graph).vertices().collect();

        let mut current = Vec::new();
        self.expand(graph, &mut current, VertexSet::full(n));
        debug!(
            "exact clique oracle: size {} after {} nodes{}",
            self.best.len(),
            self.nodes,
            if self.out_of_budget() { " (node limit)" } else { "" }
        );
        Clique::from_vertices(n, self.best.iter().copied())
    }
}
