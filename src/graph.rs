//! Undirected graph model
//!
//! The graph is stored as one adjacency bitset per vertex. It is mutated only
//! during preprocessing (edge removal) and is read-only once search starts.
//!
//! Key types:
//! - `Graph`: symmetric adjacency without self-loops
//! - `VertexSet`: fixed-width bitset used for cliques and adjacency rows

pub mod dimacs;
pub mod greedy;
mod vertex_set;

pub use vertex_set::VertexSet;

use crate::error::{ColoringError, Result};

/// An undirected simple graph over the vertices `0..n`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    adjacency: Vec<VertexSet>,
    num_edges: usize,
}

impl Graph {
    /// Creates a graph with `n` isolated vertices
    pub fn new(n: usize) -> Self {
        Self {
            adjacency: (0..n).map(|_| VertexSet::new(n)).collect(),
            num_edges: 0,
        }
    }

    /// Creates a graph from an edge list
    ///
    /// # Errors
    /// Returns an error if an endpoint is out of range or an edge is a self-loop.
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Result<Self> {
        let mut graph = Self::new(n);
        for &(u, v) in edges {
            if u >= n || v >= n {
                return Err(ColoringError::InvalidArgument(format!(
                    "edge ({u}, {v}) is out of range for {n} vertices"
                )));
            }
            if u == v {
                return Err(ColoringError::InvalidArgument(format!(
                    "self-loop on vertex {u}"
                )));
            }
            graph.add_edge(u, v);
        }
        Ok(graph)
    }

    /// Returns the complete graph on `n` vertices
    pub fn complete(n: usize) -> Self {
        let mut graph = Self::new(n);
        for u in 0..n {
            for v in u + 1..n {
                graph.add_edge(u, v);
            }
        }
        graph
    }

    /// Number of vertices
    pub fn num_vertices(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Edge density `m / (n (n - 1) / 2)`, zero for graphs with fewer than two vertices
    pub fn density(&self) -> f64 {
        let n = self.num_vertices();
        if n < 2 {
            return 0.0;
        }
        self.num_edges as f64 / (n * (n - 1) / 2) as f64
    }

    /// Adds the edge `{u, v}`, returning true if it was not present
    ///
    /// # Panics
    /// Panics if `u == v` or either endpoint is out of range.
    pub fn add_edge(&mut self, u: usize, v: usize) -> bool {
        assert_ne!(u, v, "self-loops are not allowed");
        if !self.adjacency[u].insert(v) {
            return false;
        }
        self.adjacency[v].insert(u);
        self.num_edges += 1;
        true
    }

    /// Removes the edge `{u, v}`, returning true if it was present
    pub fn remove_edge(&mut self, u: usize, v: usize) -> bool {
        if u >= self.num_vertices() || !self.adjacency[u].remove(v) {
            return false;
        }
        self.adjacency[v].remove(u);
        self.num_edges -= 1;
        true
    }

    /// Removes every edge incident to `v`, returning the removed neighbors
    pub fn isolate(&mut self, v: usize) -> Vec<usize> {
        let neighbors: Vec<usize> = self.adjacency[v].iter().collect();
        for &u in &neighbors {
            self.remove_edge(v, u);
        }
        neighbors
    }

    /// Returns true if `{u, v}` is an edge
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        u < self.num_vertices() && self.adjacency[u].contains(v)
    }

    /// Degree of `v`
    pub fn degree(&self, v: usize) -> usize {
        self.adjacency[v].len()
    }

    /// Neighborhood of `v`
    pub fn neighbors(&self, v: usize) -> &VertexSet {
        &self.adjacency[v]
    }

    /// Iterates over the edges as `(u, v)` with `u < v`
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(u, row)| row.iter().filter(move |&v| v > u).map(move |v| (u, v)))
    }

    /// Returns true if `set` is a clique of this graph
    pub fn is_clique(&self, set: &VertexSet) -> bool {
        let members: Vec<usize> = set.iter().collect();
        members
            .iter()
            .enumerate()
            .all(|(i, &u)| members[i + 1..].iter().all(|&v| self.has_edge(u, v)))
    }

    /// Vertices sorted by non-increasing degree, ties by index
    pub fn degree_ordering(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.num_vertices()).collect();
        order.sort_by(|&a, &b| self.degree(b).cmp(&self.degree(a)).then(a.cmp(&b)));
        order
    }

    /// Renumbers the vertices so that new vertex `i` is old vertex `order[i]`
    ///
    /// # Panics
    /// Panics if `order` is not a permutation of `0..n`.
    pub fn permuted(&self, order: &[usize]) -> Graph {
        let n = self.num_vertices();
        assert_eq!(order.len(), n, "ordering must cover every vertex");
        let mut position = vec![usize::MAX; n];
        for (new, &old) in order.iter().enumerate() {
            position[old] = new;
        }
        let mut graph = Graph::new(n);
        for (u, v) in self.edges() {
            graph.add_edge(position[u], position[v]);
        }
        graph
    }

    /// Checks that `colors` is a proper coloring
    ///
    /// Returns the first monochromatic edge, if any.
    pub fn find_conflict(&self, colors: &[usize]) -> Option<(usize, usize)> {
        self.edges().find(|&(u, v)| colors[u] == colors[v])
    }
}
