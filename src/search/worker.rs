//! Depth-first branch and bound worker
//!
//! A worker explores one subtree with an explicit stack of pending nodes.
//! Each node is a cloned `Space`; popping a node propagates it to a
//! fixpoint, then branches on `x = v` (explored first) and `x != v`.

use super::nogood::{Literal, NogoodStore};
use super::propagate::CompiledModel;
use super::restart::RestartPolicy;
use super::space::{Conflict, Space};
use super::stop::{Halt, StopConditions};
use super::{Outcome, SearchStatistics};
use crate::branching::VarView;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

struct Pending {
    space: Space,
    path: Vec<Literal>,
    depth: usize,
    full: bool,
}

enum Dfs {
    Solution(Vec<usize>),
    Exhausted,
    Cutoff(Vec<Literal>),
    Halted(Halt),
}

/// How a worker run ended
#[derive(Debug, Clone)]
pub(crate) enum RunResult {
    Finished(Outcome),
    /// Another worker already found a solution within the color budget
    Cancelled,
}

/// Result of expanding the top of the tree breadth first
pub(crate) enum Split {
    Solved(Vec<usize>),
    Frontier(Vec<Space>),
}

pub(crate) struct Worker<'a> {
    model: &'a CompiledModel,
    stop: &'a StopConditions,
    afc: Vec<f64>,
    var_afc: Vec<f64>,
    activity: Vec<f64>,
    rng: StdRng,
    seed: u64,
    nogoods: NogoodStore,
    nogood_limit: usize,
    queue: VecDeque<usize>,
    queued: Vec<bool>,
    ties: Vec<usize>,
    space_bytes: usize,
    pub(crate) stats: SearchStatistics,
}

impl<'a> Worker<'a> {
    pub(crate) fn new(
        model: &'a CompiledModel,
        stop: &'a StopConditions,
        seed: u64,
        nogood_limit: usize,
    ) -> Self {
        Self {
            model,
            stop,
            afc: vec![1.0; model.propagators.len()],
            var_afc: model.degree.iter().map(|&d| d as f64).collect(),
            activity: vec![0.0; model.num_vars],
            rng: StdRng::seed_from_u64(seed),
            seed,
            nogoods: NogoodStore::default(),
            nogood_limit,
            queue: VecDeque::new(),
            queued: vec![false; model.propagators.len()],
            ties: Vec::new(),
            space_bytes: model.space_bytes(),
            stats: SearchStatistics::default(),
        }
    }

    /// Searches the subtree below `root`, restarting on the given schedule
    pub(crate) fn run(&mut self, root: Space, restart: Option<RestartPolicy>) -> RunResult {
        let mut cutoffs = restart.map(|policy| policy.cutoffs());
        loop {
            let cutoff = cutoffs.as_mut().and_then(Iterator::next);
            match self.dfs(root.clone(), cutoff) {
                Dfs::Solution(colors) => return RunResult::Finished(Outcome::Solution(colors)),
                Dfs::Exhausted => return RunResult::Finished(Outcome::Exhausted),
                Dfs::Halted(Halt::Time) => return RunResult::Finished(Outcome::TimeLimited),
                Dfs::Halted(Halt::Memory) => return RunResult::Finished(Outcome::MemoryLimited),
                Dfs::Halted(Halt::Cancelled) => return RunResult::Cancelled,
                Dfs::Cutoff(path) => {
                    self.stats.restarts += 1;
                    let added = self.nogoods.derive(&path);
                    self.stats.nogoods = self.nogoods.len() as u64;
                    debug!(
                        "restart {} after {} nodes: {} new nogoods",
                        self.stats.restarts, self.stats.nodes, added
                    );
                    self.rng = StdRng::seed_from_u64(self.seed.wrapping_add(self.stats.restarts));
                }
            }
        }
    }

    fn dfs(&mut self, root: Space, cutoff: Option<u64>) -> Dfs {
        let mut stack = vec![Pending {
            space: root,
            path: Vec::new(),
            depth: 0,
            full: true,
        }];
        let mut explored = 0u64;

        loop {
            let Some(node) = stack.pop() else {
                break;
            };
            let memory = (stack.len() + 1) * self.space_bytes + self.nogoods.byte_size();
            self.stats.peak_memory = self.stats.peak_memory.max(memory);
            if let Some(halt) = self.stop.check(self.model.colors, memory) {
                return Dfs::Halted(halt);
            }
            if cutoff.is_some_and(|limit| explored >= limit) {
                return Dfs::Cutoff(node.path);
            }
            explored += 1;
            self.stats.nodes += 1;
            self.stats.max_depth = self.stats.max_depth.max(node.depth);

            let Pending { mut space, path, depth, full } = node;
            if self.propagate(&mut space, full).is_err() {
                self.stats.failures += 1;
                continue;
            }
            if let Some(colors) = space.values() {
                let used = colors.iter().max().map_or(0, |&c| c + 1);
                self.stop.shared.offer(used);
                return Dfs::Solution(colors);
            }
            let Some((x, v)) = self.select(&space) else {
                continue;
            };

            let mut right = space.clone();
            if right.remove(x, v).is_ok() {
                stack.push(Pending {
                    space: right,
                    path: self.extend(&path, Literal::neq(x, v)),
                    depth: depth + 1,
                    full: false,
                });
            }
            let mut left = space;
            if left.assign(x, v).is_ok() {
                stack.push(Pending {
                    space: left,
                    path: self.extend(&path, Literal::eq(x, v)),
                    depth: depth + 1,
                    full: false,
                });
            }
        }
        Dfs::Exhausted
    }

    /// Expands nodes breadth first until `target` open nodes exist
    pub(crate) fn split(&mut self, root: Space, target: usize) -> Split {
        let mut frontier = VecDeque::from([(root, true)]);
        while frontier.len() < target {
            let Some((mut space, full)) = frontier.pop_front() else {
                break;
            };
            self.stats.nodes += 1;
            if self.propagate(&mut space, full).is_err() {
                self.stats.failures += 1;
                continue;
            }
            if let Some(colors) = space.values() {
                return Split::Solved(colors);
            }
            let Some((x, v)) = self.select(&space) else {
                continue;
            };
            let mut right = space.clone();
            if right.remove(x, v).is_ok() {
                frontier.push_back((right, false));
            }
            let mut left = space;
            if left.assign(x, v).is_ok() {
                frontier.push_back((left, false));
            }
        }
        Split::Frontier(frontier.into_iter().map(|(space, _)| space).collect())
    }

    fn extend(&self, path: &[Literal], literal: Literal) -> Vec<Literal> {
        if path.len() >= self.nogood_limit {
            return path.to_vec();
        }
        let mut extended = Vec::with_capacity(path.len() + 1);
        extended.extend_from_slice(path);
        extended.push(literal);
        extended
    }

    /// Runs propagators until no domain changes
    ///
    /// With `full` every propagator runs at least once; otherwise only those
    /// watching a variable modified since the last fixpoint.
    pub(crate) fn propagate(&mut self, space: &mut Space, full: bool) -> Result<(), Conflict> {
        let model = self.model;
        if full {
            for p in 0..model.propagators.len() {
                self.enqueue(p);
            }
        }
        self.enqueue_modified(space);
        loop {
            while let Some(p) = self.queue.pop_front() {
                self.queued[p] = false;
                if let Err(conflict) = model.propagators[p].propagate(space) {
                    self.record_failure(p);
                    self.clear_queue();
                    return Err(conflict);
                }
                self.enqueue_modified(space);
            }
            match self.nogoods.propagate(space) {
                Ok(true) => self.enqueue_modified(space),
                Ok(false) => return Ok(()),
                Err(conflict) => return Err(conflict),
            }
        }
    }

    fn enqueue(&mut self, p: usize) {
        if !self.queued[p] {
            self.queued[p] = true;
            self.queue.push_back(p);
        }
    }

    fn enqueue_modified(&mut self, space: &mut Space) {
        let model = self.model;
        for x in space.take_modified() {
            self.activity[x] += 1.0;
            for &p in &model.watches[x] {
                self.enqueue(p);
            }
        }
    }

    fn clear_queue(&mut self) {
        for p in self.queue.drain(..) {
            self.queued[p] = false;
        }
    }

    fn record_failure(&mut self, p: usize) {
        self.afc[p] += 1.0;
        for &x in self.model.propagators[p].vars() {
            self.var_afc[x] += 1.0;
        }
    }

    /// Picks the branching variable and value
    fn select(&mut self, space: &Space) -> Option<(usize, usize)> {
        let model = self.model;
        let strategy = &model.strategy;
        let domains = space.domains();

        if let Some(&x) = model.priority.iter().find(|&&x| !domains[x].is_assigned()) {
            return (strategy.value)(&domains[x]).map(|v| (x, v));
        }

        let view = VarView {
            domains,
            afc: &self.var_afc,
            activity: &self.activity,
            degree: &model.degree,
        };
        let mut best = f64::NEG_INFINITY;
        self.ties.clear();
        for x in (0..space.num_vars()).filter(|&x| !domains[x].is_assigned()) {
            let merit = (strategy.merit)(&view, x);
            if merit > best {
                best = merit;
                self.ties.clear();
                self.ties.push(x);
            } else if merit == best {
                self.ties.push(x);
            }
        }
        let x = match self.ties.len() {
            0 => return None,
            1 => self.ties[0],
            len => self.ties[self.rng.gen_range(0..len)],
        };
        (strategy.value)(&domains[x]).map(|v| (x, v))
    }
}
