//! Final certificate pass
//!
//! The heuristic coloring only respects the edges of the reduced graph.
//! This pass keeps the colors of the vertices whose reduced degree is at
//! least the lower bound, frees the others, and completes the coloring
//! exhaustively against every edge of the full graph.

use super::Certifier;
use crate::clique::Preprocessing;
use crate::error::{ColoringError, Result};
use crate::graph::Graph;
use crate::model::ColoringModel;
use crate::search::{self, Outcome, SearchOptions, SearchStatistics};
use log::{debug, info};

pub(super) struct Certified {
    pub(super) coloring: Vec<usize>,
    pub(super) statistics: SearchStatistics,
}

/// Colors every vertex of `graph` with fewer than `colors` colors, keeping
/// the high-degree part of `heuristic`
pub(super) fn certify(
    graph: &Graph,
    pre: &Preprocessing,
    heuristic: Option<&[usize]>,
    colors: usize,
    certifier: Certifier,
) -> Result<Certified> {
    if let Some(coloring) = heuristic {
        if let Some((u, v)) = pre.reduced.find_conflict(coloring) {
            return Err(ColoringError::InvalidCertificate {
                u,
                v,
                color: coloring[u],
            });
        }
    }

    let fixing: Vec<Option<usize>> = (0..graph.num_vertices())
        .map(|v| heuristic.and_then(|h| (pre.reduced.degree(v) >= pre.lower_bound).then_some(h[v])))
        .collect();
    let fixed = fixing.iter().flatten().count();
    debug!(
        "certificate: {} of {} vertices fixed, {} colors",
        fixed,
        graph.num_vertices(),
        colors
    );

    let model = ColoringModel::completion(graph, colors, &fixing);
    let (coloring, statistics) = match certifier {
        Certifier::Search => {
            let result = search::solve(&model, &SearchOptions::default());
            match result.outcome {
                Outcome::Solution(coloring) => (Some(coloring), result.statistics),
                _ => (None, result.statistics),
            }
        }
        #[cfg(feature = "sat")]
        Certifier::Sat => (crate::sat::solve(&model)?, SearchStatistics::default()),
    };

    let Some(coloring) = coloring else {
        return Err(ColoringError::InfeasibleFix { colors, fixed });
    };
    if let Some((u, v)) = graph.find_conflict(&coloring) {
        return Err(ColoringError::InvalidCertificate {
            u,
            v,
            color: coloring[u],
        });
    }
    info!("certificate verified ({} nodes)", statistics.nodes);
    Ok(Certified { coloring, statistics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clique::{preprocess, GreedyCliqueOracle};

    fn pendant_k4() -> Graph {
        let mut edges = vec![(3, 4), (4, 5)];
        for u in 0..4 {
            for v in u + 1..4 {
                edges.push((u, v));
            }
        }
        Graph::from_edges(6, &edges).unwrap()
    }

    #[test]
    fn pruned_vertices_are_recolored() {
        let g = pendant_k4();
        let pre = preprocess(&g, &mut GreedyCliqueOracle);
        // valid on the reduced graph, but 3-4 clash in the full graph
        let heuristic = [0, 1, 2, 3, 3, 3];
        let certified = certify(&g, &pre, Some(&heuristic[..]), 4, Certifier::Search).unwrap();
        assert_eq!(g.find_conflict(&certified.coloring), None);
    }

    #[test]
    fn high_degree_vertices_keep_their_colors() {
        // wheel: hub 0 and rim 1..=5, every reduced degree is at least LB = 3
        let mut edges: Vec<(usize, usize)> = (1..=5).map(|v| (0, v)).collect();
        edges.extend((1..=5).map(|v| (v, v % 5 + 1)));
        let g = Graph::from_edges(6, &edges).unwrap();
        let pre = preprocess(&g, &mut GreedyCliqueOracle);
        assert_eq!(pre.lower_bound, 3);
        let heuristic = [0, 1, 2, 1, 2, 3];
        let certified = certify(&g, &pre, Some(&heuristic[..]), 4, Certifier::Search).unwrap();
        assert_eq!(certified.coloring, heuristic);
    }

    #[test]
    fn without_heuristic_everything_is_free() {
        let g = pendant_k4();
        let pre = preprocess(&g, &mut GreedyCliqueOracle);
        let certified = certify(&g, &pre, None, 4, Certifier::Search).unwrap();
        assert_eq!(g.find_conflict(&certified.coloring), None);
    }

    #[test]
    fn too_few_colors_is_an_infeasible_fix() {
        let g = pendant_k4();
        let pre = preprocess(&g, &mut GreedyCliqueOracle);
        let err = certify(&g, &pre, None, 3, Certifier::Search).err();
        assert!(matches!(err, Some(ColoringError::InfeasibleFix { colors: 3, fixed: 0 })));
    }

    #[test]
    fn heuristic_conflict_is_rejected() {
        let g = pendant_k4();
        let pre = preprocess(&g, &mut GreedyCliqueOracle);
        let heuristic = [0, 0, 2, 3, 1, 0];
        let err = certify(&g, &pre, Some(&heuristic[..]), 4, Certifier::Search).err();
        assert!(matches!(err, Some(ColoringError::InvalidCertificate { u: 0, v: 1, color: 0 })));
    }
}
