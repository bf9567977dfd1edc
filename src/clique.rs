//! Maximal cliques
//!
//! A clique is stored as a `VertexSet` together with its size. Cliques are
//! immutable once they enter the preprocessing collection; they are the
//! source of both the lower bound and the all-different constraints of the
//! coloring model.

pub mod oracle;
pub mod preprocess;

pub use oracle::{CliqueOracle, ExactCliqueOracle, GreedyCliqueOracle, OracleKind};
pub use preprocess::{preprocess, Preprocessing};

use crate::graph::{Graph, VertexSet};
use std::fmt;

/// A set of pairwise adjacent vertices
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Clique {
    members: VertexSet,
    size: usize,
}

impl Clique {
    /// Creates an empty clique over `0..capacity`
    pub fn empty(capacity: usize) -> Self {
        Self {
            members: VertexSet::new(capacity),
            size: 0,
        }
    }

    /// Wraps a vertex set that the caller knows to be a clique
    pub fn from_set(members: VertexSet) -> Self {
        let size = members.len();
        Self { members, size }
    }

    /// Creates a clique from vertex indices
    pub fn from_vertices<I: IntoIterator<Item = usize>>(capacity: usize, vertices: I) -> Self {
        Self::from_set(VertexSet::from_vertices(capacity, vertices))
    }

    /// Number of vertices in the clique
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true if the clique has no vertices
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns true if `v` belongs to the clique
    pub fn contains(&self, v: usize) -> bool {
        self.members.contains(v)
    }

    /// Members in increasing order
    pub fn vertices(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter()
    }

    /// Underlying vertex set
    pub fn members(&self) -> &VertexSet {
        &self.members
    }

    /// Adds `v` without checking adjacency
    pub(crate) fn push(&mut self, v: usize) {
        if self.members.insert(v) {
            self.size += 1;
        }
    }

    /// Extends the clique until no vertex of `graph` is adjacent to every member
    ///
    /// Candidates are tried in increasing index order. Returns the number of
    /// vertices added.
    pub fn maximalize(&mut self, graph: &Graph) -> usize {
        let n = graph.num_vertices();
        let mut candidates = match self.members.first() {
            Some(first) => graph.neighbors(first).clone(),
            None => VertexSet::full(n),
        };
        for v in self.members.iter() {
            candidates.intersect_with(graph.neighbors(v));
        }

        let mut added = 0;
        while let Some(v) = candidates.first() {
            self.push(v);
            candidates.remove(v);
            candidates.intersect_with(graph.neighbors(v));
            added += 1;
        }
        added
    }

    /// Returns true if no vertex outside the clique is adjacent to all members
    pub fn is_maximal(&self, graph: &Graph) -> bool {
        (0..graph.num_vertices())
            .filter(|&v| !self.contains(v))
            .all(|v| self.vertices().any(|u| !graph.has_edge(u, v)))
    }

    /// Sum of the degrees of the members in `graph`
    pub fn degree_sum(&self, graph: &Graph) -> usize {
        self.vertices().map(|v| graph.degree(v)).sum()
    }
}

impl fmt::Debug for Clique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Clique{:?}", self.members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maximalize_extends_to_maximal() {
        let g = Graph::complete(4);
        let mut c = Clique::from_vertices(4, [2]);
        assert_eq!(c.maximalize(&g), 3);
        assert_eq!(c.size(), 4);
        assert!(c.is_maximal(&g));
    }

    #[test]
    fn maximalize_respects_adjacency() {
        // triangle 0-1-2 plus pendant 3 on vertex 2
        let g = Graph::from_edges(4, &[(0, 1), (1, 2), (0, 2), (2, 3)]).unwrap();
        let mut c = Clique::from_vertices(4, [2, 3]);
        assert_eq!(c.maximalize(&g), 0);
        assert!(c.is_maximal(&g));

        let mut c = Clique::from_vertices(4, [1]);
        c.maximalize(&g);
        assert_eq!(c.vertices().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn empty_clique_grows_from_lowest_vertex() {
        let g = Graph::from_edges(3, &[(1, 2)]).unwrap();
        let mut c = Clique::empty(3);
        c.maximalize(&g);
        assert_eq!(c.vertices().collect::<Vec<_>>(), vec![0]);
        assert!(c.is_maximal(&g));
    }

    #[test]
    fn degree_sum() {
        let g = Graph::from_edges(4, &[(0, 1), (1, 2), (0, 2), (2, 3)]).unwrap();
        let c = Clique::from_vertices(4, [0, 1, 2]);
        assert_eq!(c.degree_sum(&g), 2 + 2 + 3);
    }
}
