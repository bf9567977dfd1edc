//! Upper-bound tightening loop
//!
//! Starting from the initial bound, repeatedly asks the search for a
//! coloring with one color fewer than the best known. A solution lowers the
//! bound to the colors it actually uses; an exhausted attempt proves the
//! bound optimal; a time or memory stop leaves it heuristic.

use super::{Options, Status, UpperBoundSource};
use crate::clique::Preprocessing;
use crate::error::{ColoringError, Result};
use crate::graph::{greedy, Graph};
use crate::model::ColoringModel;
use crate::search::{self, Outcome, RestartPolicy, SearchOptions, SearchStatistics};
use log::{debug, info, warn};
use std::time::{Duration, Instant};

/// The upper bound at one point of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Time since the solver started
    pub elapsed: Duration,
    /// Best known number of colors
    pub upper_bound: usize,
    /// Nodes explored so far
    pub nodes: u64,
}

/// How a single attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptResult {
    /// A coloring was found using `used` colors
    Colored {
        /// Colors actually used
        used: usize,
    },
    /// No coloring with the attempted number of colors exists
    Infeasible,
    /// Stopped by the deadline
    TimeLimited,
    /// Stopped by the memory cap
    MemoryLimited,
}

/// One coloring attempt of the loop
#[derive(Debug, Clone)]
pub struct Attempt {
    /// Number of colors allowed
    pub colors: usize,
    /// How it ended
    pub result: AttemptResult,
    /// Its search counters
    pub statistics: SearchStatistics,
    /// Wall-clock time it took
    pub elapsed: Duration,
}

pub(super) struct BoundResult {
    pub(super) upper_bound: usize,
    /// Best coloring of the reordered graph, if any is known
    pub(super) coloring: Option<Vec<usize>>,
    pub(super) status: Status,
    pub(super) statistics: SearchStatistics,
    pub(super) progress: Vec<Progress>,
    pub(super) attempts: Vec<Attempt>,
}

fn initial_bound(graph: &Graph, source: UpperBoundSource) -> (usize, Option<Vec<usize>>) {
    match source {
        UpperBoundSource::Trivial => {
            let n = graph.num_vertices();
            (n, Some((0..n).collect()))
        }
        UpperBoundSource::Manual(bound) => (bound, None),
        UpperBoundSource::Greedy => {
            let colors = greedy::dsatur(graph);
            (greedy::count_colors(&colors), Some(colors))
        }
    }
}

pub(super) fn run(
    graph: &Graph,
    pre: &Preprocessing,
    options: &Options,
    start: Instant,
    deadline: Option<Instant>,
) -> Result<BoundResult> {
    let (mut upper_bound, mut coloring) = initial_bound(graph, options.upper_bound);
    if upper_bound < pre.lower_bound {
        return Err(ColoringError::InvalidArgument(format!(
            "upper bound {upper_bound} is below the clique lower bound {}",
            pre.lower_bound
        )));
    }
    info!("initial UB {} ({:?})", upper_bound, options.upper_bound);

    let mut statistics = SearchStatistics::default();
    let mut progress = vec![Progress {
        elapsed: start.elapsed(),
        upper_bound,
        nodes: 0,
    }];
    let mut attempts = Vec::new();

    let status = loop {
        if upper_bound == 0 {
            break Status::Optimal;
        }
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            warn!("time limit reached: UB {upper_bound} is only an upper bound");
            break Status::TimeLimited;
        }

        let k = upper_bound - 1;
        let model = ColoringModel::heuristic(
            &pre.reduced,
            k,
            &pre.cliques,
            &pre.best_clique,
            options.branching,
            options.propagation,
        );
        let search_options = SearchOptions {
            restart: Some(RestartPolicy::geometric(options.restart_base, options.restart_scale)),
            nogood_limit: options.nogood_limit,
            deadline,
            memory_limit: options.memory_limit,
            threads: options.threads,
            seed: options.seed.wrapping_mul(k as u64),
        };
        let attempt_start = Instant::now();
        let found = search::solve(&model, &search_options);
        statistics.merge(&found.statistics);

        let result = match found.outcome {
            Outcome::Solution(colors) => {
                let used = greedy::count_colors(&colors);
                upper_bound = used.min(upper_bound);
                coloring = Some(colors);
                progress.push(Progress {
                    elapsed: start.elapsed(),
                    upper_bound,
                    nodes: statistics.nodes,
                });
                info!(
                    "{:>9.3}s  UB {:>4}  nodes {}",
                    start.elapsed().as_secs_f64(),
                    upper_bound,
                    statistics.nodes
                );
                AttemptResult::Colored { used }
            }
            Outcome::Exhausted => AttemptResult::Infeasible,
            Outcome::TimeLimited => AttemptResult::TimeLimited,
            Outcome::MemoryLimited => AttemptResult::MemoryLimited,
        };
        debug!(
            "attempt k={} -> {:?} ({} nodes, {} failures, {} restarts)",
            k, result, found.statistics.nodes, found.statistics.failures, found.statistics.restarts
        );
        attempts.push(Attempt {
            colors: k,
            result,
            statistics: found.statistics,
            elapsed: attempt_start.elapsed(),
        });

        match result {
            AttemptResult::Colored { .. } => {}
            AttemptResult::Infeasible => break Status::Optimal,
            AttemptResult::TimeLimited => {
                warn!("time limit reached: UB {upper_bound} is only an upper bound");
                break Status::TimeLimited;
            }
            AttemptResult::MemoryLimited => {
                warn!("memory limit reached: UB {upper_bound} is only an upper bound");
                break Status::MemoryLimited;
            }
        }
    };

    Ok(BoundResult {
        upper_bound,
        coloring,
        status,
        statistics,
        progress,
        attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clique::{preprocess, GreedyCliqueOracle};

    fn run_on(graph: &Graph, options: &Options) -> BoundResult {
        let pre = preprocess(graph, &mut GreedyCliqueOracle);
        let start = Instant::now();
        let deadline = options.timeout.map(|t| start + t);
        run(graph, &pre, options, start, deadline).unwrap()
    }

    #[test]
    fn trivial_bound_descends_to_optimum() {
        // two triangles sharing vertex 2
        let g = Graph::from_edges(5, &[(0, 1), (1, 2), (0, 2), (2, 3), (3, 4), (2, 4)]).unwrap();
        let options = Options {
            upper_bound: UpperBoundSource::Trivial,
            ..Options::default()
        };
        let result = run_on(&g, &options);
        assert_eq!(result.status, Status::Optimal);
        assert_eq!(result.upper_bound, 3);
        assert_eq!(result.attempts.first().map(|a| a.colors), Some(4));
        assert_eq!(result.attempts.last().map(|a| a.result), Some(AttemptResult::Infeasible));
        for pair in result.progress.windows(2) {
            assert!(pair[1].upper_bound < pair[0].upper_bound);
        }
    }

    #[test]
    fn manual_bound_has_no_coloring_until_found() {
        let g = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
        let options = Options {
            upper_bound: UpperBoundSource::Manual(2),
            ..Options::default()
        };
        let result = run_on(&g, &options);
        assert_eq!(result.status, Status::Optimal);
        assert_eq!(result.upper_bound, 2);
        assert!(result.coloring.is_none());
        assert_eq!(result.attempts.len(), 1);
    }

    #[test]
    fn manual_bound_below_lower_bound_is_rejected() {
        let g = Graph::complete(4);
        let pre = preprocess(&g, &mut GreedyCliqueOracle);
        let options = Options {
            upper_bound: UpperBoundSource::Manual(3),
            ..Options::default()
        };
        assert!(run(&g, &pre, &options, Instant::now(), None).is_err());
    }

    #[test]
    fn zero_timeout_keeps_initial_bound() {
        let g = Graph::complete(6);
        let options = Options {
            timeout: Some(Duration::ZERO),
            ..Options::default()
        };
        let result = run_on(&g, &options);
        assert_eq!(result.status, Status::TimeLimited);
        assert_eq!(result.upper_bound, 6);
        assert!(result.attempts.is_empty());
        assert_eq!(result.progress.len(), 1);
    }
}
