//! Constraint search for k-colorings
//!
//! [`solve`] decides whether a [`ColoringModel`] has a solution. Every
//! attempt compiles the model into propagators, builds the root node with
//! the fixings applied and runs a depth-first branch and bound:
//!
//! - propagation to a fixpoint at every node (all-different filtering,
//!   pairwise inequalities, value precedence, restart nogoods)
//! - binary branching chosen by the model's [`BranchingPolicy`]
//! - optional geometric restarts with nogood recording
//! - deadline, memory and cancellation checks between nodes
//!
//! With more than one thread the top of the tree is split breadth first and
//! the open nodes are searched on a rayon pool.
//!
//! [`BranchingPolicy`]: crate::branching::BranchingPolicy

mod alldiff;
mod domain;
mod nogood;
mod parallel;
mod propagate;
mod restart;
mod space;
mod stop;
mod worker;

pub use domain::Domain;
pub use restart::{Cutoffs, RestartPolicy};

use crate::model::ColoringModel;
use propagate::CompiledModel;
use std::sync::Arc;
use std::time::Instant;
use stop::{SharedBound, StopConditions};
use worker::{RunResult, Worker};

/// Search parameters of a single attempt
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Restart schedule (None = plain depth-first search)
    pub restart: Option<RestartPolicy>,
    /// Longest decision prefix recorded for nogoods (0 disables nogoods)
    pub nogood_limit: usize,
    /// Wall-clock deadline
    pub deadline: Option<Instant>,
    /// Estimated memory cap in bytes
    pub memory_limit: Option<usize>,
    /// Number of worker threads
    pub threads: usize,
    /// Seed of the tie-breaking generator
    pub seed: u64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            restart: None,
            nogood_limit: 0,
            deadline: None,
            memory_limit: None,
            threads: 1,
            seed: 13,
        }
    }
}

/// How an attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A coloring satisfying every constraint
    Solution(Vec<usize>),
    /// The whole tree was explored without a solution
    Exhausted,
    /// The deadline passed first
    TimeLimited,
    /// The memory estimate exceeded the cap first
    MemoryLimited,
}

impl Outcome {
    /// Returns true for [`Outcome::TimeLimited`] and [`Outcome::MemoryLimited`]
    pub fn is_limited(&self) -> bool {
        matches!(self, Outcome::TimeLimited | Outcome::MemoryLimited)
    }
}

/// Counters of an attempt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Nodes explored
    pub nodes: u64,
    /// Nodes whose propagation failed
    pub failures: u64,
    /// Restarts performed
    pub restarts: u64,
    /// Nogoods stored
    pub nogoods: u64,
    /// Deepest node explored
    pub max_depth: usize,
    /// Largest memory estimate seen, in bytes
    pub peak_memory: usize,
}

impl SearchStatistics {
    /// Adds the counters of `other`
    pub fn merge(&mut self, other: &SearchStatistics) {
        self.nodes += other.nodes;
        self.failures += other.failures;
        self.restarts += other.restarts;
        self.nogoods += other.nogoods;
        self.max_depth = self.max_depth.max(other.max_depth);
        self.peak_memory = self.peak_memory.max(other.peak_memory);
    }
}

/// Outcome and counters of an attempt
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// How the attempt ended
    pub outcome: Outcome,
    /// Counters
    pub statistics: SearchStatistics,
}

/// Searches for a solution of `model`
pub fn solve(model: &ColoringModel, options: &SearchOptions) -> SearchResult {
    let compiled = CompiledModel::compile(model);
    let stop = StopConditions {
        deadline: options.deadline,
        memory_limit: options.memory_limit,
        shared: Arc::new(SharedBound::new(compiled.colors.saturating_add(1))),
    };

    let Ok(root) = compiled.root() else {
        return SearchResult {
            outcome: Outcome::Exhausted,
            statistics: SearchStatistics {
                nodes: 1,
                failures: 1,
                ..SearchStatistics::default()
            },
        };
    };

    if options.threads > 1 {
        return parallel::solve(&compiled, root, options, &stop);
    }
    let mut worker = Worker::new(&compiled, &stop, options.seed, options.nogood_limit);
    let outcome = match worker.run(root, options.restart) {
        RunResult::Finished(outcome) => outcome,
        // the shared bound starts above the color budget and only this
        // worker lowers it, by returning a solution
        RunResult::Cancelled => Outcome::TimeLimited,
    };
    SearchResult {
        outcome,
        statistics: worker.stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::BranchingPolicy;
    use crate::model::{Constraint, PropagationMode};

    fn wheel(spokes: usize, colors: usize) -> ColoringModel {
        // hub 0, rim 1..=spokes
        let mut m = ColoringModel::new(spokes + 1, colors).with_symmetry_breaking(true);
        for v in 1..=spokes {
            m.add(Constraint::NotEqual(0, v));
            m.add(Constraint::NotEqual(v, v % spokes + 1));
        }
        m
    }

    #[test]
    fn merge_adds_counters_and_keeps_peaks() {
        let mut total = SearchStatistics {
            nodes: 10,
            failures: 3,
            max_depth: 4,
            peak_memory: 800,
            ..SearchStatistics::default()
        };
        total.merge(&SearchStatistics {
            nodes: 5,
            failures: 1,
            restarts: 2,
            max_depth: 7,
            peak_memory: 500,
            ..SearchStatistics::default()
        });
        assert_eq!(total.nodes, 15);
        assert_eq!(total.failures, 4);
        assert_eq!(total.restarts, 2);
        assert_eq!(total.max_depth, 7);
        assert_eq!(total.peak_memory, 800);
    }

    #[test]
    fn odd_wheel_needs_four_colors() {
        let result = solve(&wheel(5, 3), &SearchOptions::default());
        assert_eq!(result.outcome, Outcome::Exhausted);

        let model = wheel(5, 4);
        let result = solve(&model, &SearchOptions::default());
        let Outcome::Solution(colors) = result.outcome else {
            panic!("expected a solution");
        };
        assert!(model.is_satisfied_by(&colors));
    }

    #[test]
    fn every_policy_and_mode_agrees() {
        for policy in BranchingPolicy::ALL {
            for mode in [
                PropagationMode::Bounds,
                PropagationMode::Domain,
                PropagationMode::Pairwise,
            ] {
                let mut m = ColoringModel::new(6, 3)
                    .with_branching(policy)
                    .with_propagation(mode)
                    .with_symmetry_breaking(policy.strategy().symmetry_breaking);
                m.add(Constraint::AllDifferent(vec![0, 1, 2]));
                m.add(Constraint::AllDifferent(vec![2, 3, 4]));
                m.add(Constraint::AllDifferent(vec![4, 5, 0]));
                m.add(Constraint::AllDifferent(vec![1, 3, 5]));
                let result = solve(&m, &SearchOptions::default());
                match result.outcome {
                    Outcome::Solution(colors) => assert!(m.is_satisfied_by(&colors)),
                    other => panic!("{policy} / {mode}: {other:?}"),
                }
            }
        }
    }

    #[test]
    fn infeasible_fixing_fails_at_root() {
        let mut m = ColoringModel::new(2, 2);
        m.add(Constraint::Fix(0, 1));
        m.add(Constraint::Fix(1, 1));
        m.add(Constraint::NotEqual(0, 1));
        let result = solve(&m, &SearchOptions::default());
        assert_eq!(result.outcome, Outcome::Exhausted);
    }

    #[test]
    fn zero_colors() {
        let result = solve(&ColoringModel::new(3, 0), &SearchOptions::default());
        assert_eq!(result.outcome, Outcome::Exhausted);
        let result = solve(&ColoringModel::new(0, 0), &SearchOptions::default());
        assert_eq!(result.outcome, Outcome::Solution(Vec::new()));
    }

    #[test]
    fn expired_deadline_is_time_limited() {
        let options = SearchOptions {
            deadline: Some(Instant::now()),
            ..SearchOptions::default()
        };
        let result = solve(&wheel(7, 3), &options);
        assert_eq!(result.outcome, Outcome::TimeLimited);
    }

    #[test]
    fn tiny_memory_cap_is_memory_limited() {
        let options = SearchOptions {
            memory_limit: Some(1),
            ..SearchOptions::default()
        };
        let result = solve(&wheel(7, 3), &options);
        assert_eq!(result.outcome, Outcome::MemoryLimited);
    }

    #[test]
    fn search_is_deterministic_for_a_seed() {
        let model = wheel(9, 3).with_branching(BranchingPolicy::Random);
        let options = SearchOptions {
            restart: Some(RestartPolicy::geometric(4, 1.4)),
            nogood_limit: 32,
            ..SearchOptions::default()
        };
        let a = solve(&model, &options);
        let b = solve(&model, &options);
        assert_eq!(a.outcome, b.outcome);
        assert_eq!(a.statistics, b.statistics);
    }

    #[test]
    fn threads_find_the_same_answer() {
        let options = SearchOptions {
            threads: 4,
            ..SearchOptions::default()
        };
        assert_eq!(solve(&wheel(7, 3), &options).outcome, Outcome::Exhausted);
        let model = wheel(7, 4);
        let Outcome::Solution(colors) = solve(&model, &options).outcome else {
            panic!("expected a solution");
        };
        assert!(model.is_satisfied_by(&colors));
    }
}
