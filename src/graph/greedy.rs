//! DSATUR greedy coloring
//!
//! Provides the heuristic starting upper bound: repeatedly color the
//! uncolored vertex with the most distinct neighbor colors (ties by degree,
//! then index) with the smallest color its neighbors do not use.

use super::{Graph, VertexSet};

/// Colors `graph` greedily, returning one color per vertex
pub fn dsatur(graph: &Graph) -> Vec<usize> {
    let n = graph.num_vertices();
    let mut colors = vec![usize::MAX; n];
    let mut neighbor_colors: Vec<VertexSet> = (0..n).map(|_| VertexSet::new(n)).collect();

    for _ in 0..n {
        let next = (0..n)
            .filter(|&v| colors[v] == usize::MAX)
            .max_by(|&a, &b| {
                neighbor_colors[a]
                    .len()
                    .cmp(&neighbor_colors[b].len())
                    .then(graph.degree(a).cmp(&graph.degree(b)))
                    .then(b.cmp(&a))
            });
        let Some(v) = next else {
            break;
        };

        let color = (0..n)
            .find(|&c| !neighbor_colors[v].contains(c))
            .unwrap_or(0);
        colors[v] = color;
        for u in graph.neighbors(v).iter() {
            neighbor_colors[u].insert(color);
        }
    }

    colors
}

/// Number of colors used by `colors` (`max + 1`, zero when empty)
pub fn count_colors(colors: &[usize]) -> usize {
    colors.iter().max().map_or(0, |&c| c + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dsatur_colors_bipartite_graphs_with_two_colors() {
        // even cycle
        let edges: Vec<_> = (0..6).map(|i| (i, (i + 1) % 6)).collect();
        let g = Graph::from_edges(6, &edges).unwrap();
        let colors = dsatur(&g);
        assert_eq!(g.find_conflict(&colors), None);
        assert_eq!(count_colors(&colors), 2);
    }

    #[test]
    fn dsatur_is_proper_on_complete_graph() {
        let g = Graph::complete(5);
        let colors = dsatur(&g);
        assert_eq!(g.find_conflict(&colors), None);
        assert_eq!(count_colors(&colors), 5);
    }

    #[test]
    fn empty_graph() {
        assert!(dsatur(&Graph::new(0)).is_empty());
        assert_eq!(count_colors(&dsatur(&Graph::new(3))), 1);
    }
}
