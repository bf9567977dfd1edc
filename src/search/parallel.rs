//! Parallel search over a split frontier
//!
//! The top of the tree is expanded breadth first into a few open nodes per
//! thread. Each open node is searched by its own worker on a rayon pool;
//! the shared bound is the only state the workers have in common, and the
//! first solution within the color budget stops all of them.

use super::propagate::CompiledModel;
use super::space::Space;
use super::stop::StopConditions;
use super::worker::{RunResult, Split, Worker};
use super::{Outcome, SearchOptions, SearchResult, SearchStatistics};
use log::{debug, warn};
use rayon::prelude::*;

const NODES_PER_THREAD: usize = 4;

pub(crate) fn solve(
    model: &CompiledModel,
    root: Space,
    options: &SearchOptions,
    stop: &StopConditions,
) -> SearchResult {
    let mut splitter = Worker::new(model, stop, options.seed, options.nogood_limit);
    let frontier = match splitter.split(root.clone(), options.threads * NODES_PER_THREAD) {
        Split::Solved(colors) => {
            return SearchResult {
                outcome: Outcome::Solution(colors),
                statistics: splitter.stats,
            };
        }
        Split::Frontier(frontier) => frontier,
    };
    let mut statistics = splitter.stats;
    if frontier.is_empty() {
        return SearchResult {
            outcome: Outcome::Exhausted,
            statistics,
        };
    }
    debug!("searching {} open nodes on {} threads", frontier.len(), options.threads);

    let pool = match rayon::ThreadPoolBuilder::new().num_threads(options.threads).build() {
        Ok(pool) => pool,
        Err(e) => {
            warn!(
                "failed to start {} search threads ({e}); searching sequentially",
                options.threads
            );
            let mut worker = Worker::new(model, stop, options.seed, options.nogood_limit);
            let result = worker.run(root, options.restart);
            statistics.merge(&worker.stats);
            return SearchResult {
                outcome: finish(vec![result]),
                statistics,
            };
        }
    };

    let runs: Vec<(RunResult, SearchStatistics)> = pool.install(|| {
        frontier
            .into_par_iter()
            .enumerate()
            .map(|(i, space)| {
                let seed = options.seed.wrapping_add(i as u64 + 1);
                let mut worker = Worker::new(model, stop, seed, options.nogood_limit);
                let result = worker.run(space, options.restart);
                (result, worker.stats)
            })
            .collect()
    });

    let mut results = Vec::with_capacity(runs.len());
    for (result, stats) in runs {
        statistics.merge(&stats);
        results.push(result);
    }
    SearchResult {
        outcome: finish(results),
        statistics,
    }
}

/// Combines the results of disjoint subtrees
///
/// The subtrees partition the search space, so the attempt is exhausted
/// only when every subtree is.
fn finish(results: Vec<RunResult>) -> Outcome {
    let mut best: Option<Vec<usize>> = None;
    let mut memory = false;
    let mut time = false;
    for result in results {
        match result {
            RunResult::Finished(Outcome::Solution(colors)) => {
                let used = color_count(&colors);
                if best.as_ref().map_or(true, |b| used < color_count(b)) {
                    best = Some(colors);
                }
            }
            RunResult::Finished(Outcome::Exhausted) => {}
            RunResult::Finished(Outcome::MemoryLimited) => memory = true,
            RunResult::Finished(Outcome::TimeLimited) | RunResult::Cancelled => time = true,
        }
    }
    match best {
        Some(colors) => Outcome::Solution(colors),
        None if memory => Outcome::MemoryLimited,
        None if time => Outcome::TimeLimited,
        None => Outcome::Exhausted,
    }
}

fn color_count(colors: &[usize]) -> usize {
    colors.iter().max().map_or(0, |&c| c + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_prefers_fewest_colors() {
        let outcome = finish(vec![
            RunResult::Finished(Outcome::Solution(vec![0, 1, 2])),
            RunResult::Cancelled,
            RunResult::Finished(Outcome::Solution(vec![0, 1, 0])),
        ]);
        assert_eq!(outcome, Outcome::Solution(vec![0, 1, 0]));
    }

    #[test]
    fn finish_without_solution() {
        assert_eq!(
            finish(vec![RunResult::Finished(Outcome::Exhausted); 2]),
            Outcome::Exhausted
        );
        assert_eq!(
            finish(vec![
                RunResult::Finished(Outcome::Exhausted),
                RunResult::Finished(Outcome::TimeLimited),
            ]),
            Outcome::TimeLimited
        );
        assert_eq!(
            finish(vec![
                RunResult::Finished(Outcome::TimeLimited),
                RunResult::Finished(Outcome::MemoryLimited),
            ]),
            Outcome::MemoryLimited
        );
    }
}
