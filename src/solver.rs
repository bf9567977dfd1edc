//! Main solver API
//!
//! The solver renumbers the graph by degree, runs clique preprocessing,
//! tightens the upper bound with repeated (k-1)-coloring attempts, and
//! finally certifies the best coloring on the full edge set.

mod certificate;
mod upper_bound;

pub use upper_bound::{Attempt, AttemptResult, Progress};

use crate::branching::BranchingPolicy;
use crate::clique::{preprocess, OracleKind};
use crate::error::{ColoringError, Result};
use crate::graph::{greedy, Graph};
use crate::model::PropagationMode;
use crate::search::SearchStatistics;
use log::info;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Where the initial upper bound comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpperBoundSource {
    /// n colors, one per vertex
    Trivial,
    /// A user-supplied bound without a coloring
    Manual(usize),
    /// DSATUR greedy coloring
    #[default]
    Greedy,
}

impl FromStr for UpperBoundSource {
    type Err = ColoringError;

    /// `trivial`, `greedy`, or a number for a manual bound
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "trivial" => Ok(UpperBoundSource::Trivial),
            "greedy" => Ok(UpperBoundSource::Greedy),
            _ => s.parse().map(UpperBoundSource::Manual).map_err(|_| {
                ColoringError::InvalidArgument(format!(
                    "invalid upper bound '{s}' (expected trivial, greedy or a number)"
                ))
            }),
        }
    }
}

/// Backend of the final certificate pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Certifier {
    /// Exhaustive constraint search
    #[default]
    Search,
    /// SAT solving of the CNF encoding
    #[cfg(feature = "sat")]
    Sat,
}

impl FromStr for Certifier {
    type Err = ColoringError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "search" => Ok(Certifier::Search),
            #[cfg(feature = "sat")]
            "sat" => Ok(Certifier::Sat),
            #[cfg(not(feature = "sat"))]
            "sat" => Err(ColoringError::InvalidArgument(
                "the sat certifier needs the `sat` feature".into(),
            )),
            _ => Err(ColoringError::InvalidArgument(format!("unknown certifier '{s}'"))),
        }
    }
}

/// Solver options
#[derive(Debug, Clone)]
pub struct Options {
    /// Variable/value selection policy of the heuristic search
    pub branching: BranchingPolicy,
    /// Growth factor of the restart cutoffs
    pub restart_scale: f64,
    /// Node cutoff of the first restart
    pub restart_base: u64,
    /// Filtering strength of the clique constraints
    pub propagation: PropagationMode,
    /// Initial upper bound
    pub upper_bound: UpperBoundSource,
    /// Longest decision prefix turned into restart nogoods (0 = none)
    pub nogood_limit: usize,
    /// Total budget of the upper-bound loop (None = no timeout)
    pub timeout: Option<Duration>,
    /// Cap on the estimated search memory in bytes (None = no cap)
    pub memory_limit: Option<usize>,
    /// Number of search threads
    pub threads: usize,
    /// Base seed; the attempt with k colors uses `seed * k`
    pub seed: u64,
    /// Clique oracle of the preprocessing phase
    pub oracle: OracleKind,
    /// Backend of the certificate pass
    pub certifier: Certifier,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            branching: BranchingPolicy::AfcSizeMax,
            restart_scale: 1.4,
            restart_base: 1000,
            propagation: PropagationMode::Domain,
            upper_bound: UpperBoundSource::Greedy,
            nogood_limit: 0,
            timeout: Some(Duration::from_secs(600)),
            memory_limit: None,
            threads: 1,
            seed: 13,
            oracle: OracleKind::Greedy,
            certifier: Certifier::Search,
        }
    }
}

impl Options {
    /// Rejects option values the solver cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(ColoringError::InvalidArgument("threads must be at least 1".into()));
        }
        if !(self.restart_scale.is_finite() && self.restart_scale >= 1.0) {
            return Err(ColoringError::InvalidArgument(format!(
                "restart scale must be at least 1, got {}",
                self.restart_scale
            )));
        }
        if self.restart_base == 0 {
            return Err(ColoringError::InvalidArgument("restart base must be positive".into()));
        }
        Ok(())
    }
}

/// How far the delivered bound is proven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No coloring with fewer colors exists
    Optimal,
    /// The time budget ran out; the bound is heuristic
    TimeLimited,
    /// The memory cap was hit; the bound is heuristic
    MemoryLimited,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Optimal => "optimal",
            Status::TimeLimited => "time limit",
            Status::MemoryLimited => "memory limit",
        })
    }
}

/// Statistics collected during solving
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    preprocessing_time: Duration,
    search_time: Duration,
    certificate_time: Duration,
    search: SearchStatistics,
    cliques: usize,
    edges_removed: usize,
    oracle_calls: usize,
}

impl Statistics {
    /// Time spent in clique preprocessing
    pub fn preprocessing_time(&self) -> Duration {
        self.preprocessing_time
    }

    /// Time spent in the upper-bound loop
    pub fn search_time(&self) -> Duration {
        self.search_time
    }

    /// Time spent in the certificate pass
    pub fn certificate_time(&self) -> Duration {
        self.certificate_time
    }

    /// Total time
    pub fn total_time(&self) -> Duration {
        self.preprocessing_time + self.search_time + self.certificate_time
    }

    /// Search counters summed over all attempts and the certificate pass
    pub fn search(&self) -> &SearchStatistics {
        &self.search
    }

    /// Number of nodes explored
    pub fn nodes(&self) -> u64 {
        self.search.nodes
    }

    /// Number of cliques kept by preprocessing
    pub fn cliques(&self) -> usize {
        self.cliques
    }

    /// Number of edges dropped by degree pruning
    pub fn edges_removed(&self) -> usize {
        self.edges_removed
    }

    /// Number of clique oracle calls
    pub fn oracle_calls(&self) -> usize {
        self.oracle_calls
    }
}

/// Result of a solver run
#[derive(Debug, Clone)]
pub struct Solution {
    coloring: Vec<usize>,
    lower_bound: usize,
    upper_bound: usize,
    status: Status,
    best_clique: Vec<usize>,
    statistics: Statistics,
    progress: Vec<Progress>,
    attempts: Vec<Attempt>,
}

impl Solution {
    /// Color of every vertex, in input numbering
    pub fn coloring(&self) -> &[usize] {
        &self.coloring
    }

    /// Number of colors the certificate uses
    pub fn num_colors(&self) -> usize {
        greedy::count_colors(&self.coloring)
    }

    /// Size of the largest clique found
    pub fn lower_bound(&self) -> usize {
        self.lower_bound
    }

    /// Best proven or heuristic upper bound
    pub fn upper_bound(&self) -> usize {
        self.upper_bound
    }

    /// Whether the upper bound is proven optimal
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns true if the coloring is minimum
    pub fn is_optimal(&self) -> bool {
        self.status == Status::Optimal
    }

    /// The clique behind the lower bound, in input numbering
    pub fn best_clique(&self) -> &[usize] {
        &self.best_clique
    }

    /// Returns the statistics
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Upper bound after the initial estimate and after every improvement
    pub fn progress(&self) -> &[Progress] {
        &self.progress
    }

    /// One record per coloring attempt
    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }
}

/// Graph coloring solver
pub struct Solver {
    options: Options,
}

impl Solver {
    /// Creates a new solver with the given options
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// Returns the options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Colors `graph` with as few colors as the budget allows
    ///
    /// Time and memory limits are not errors: they end the search early and
    /// show up as the [`Status`] of the solution.
    pub fn solve(&self, graph: &Graph) -> Result<Solution> {
        self.options.validate()?;
        let start = Instant::now();
        let deadline = self.options.timeout.map(|timeout| start + timeout);

        // Step 1: renumber by degree and preprocess
        let order = graph.degree_ordering();
        let reordered = graph.permuted(&order);
        let mut oracle = self.options.oracle.build();
        let pre = preprocess(&reordered, oracle.as_mut());
        let preprocessing_time = start.elapsed();
        info!(
            "n {} m {} density {:.3}: LB {} edges_removed {} cliques {}",
            graph.num_vertices(),
            graph.num_edges(),
            graph.density(),
            pre.lower_bound,
            pre.edges_removed,
            pre.cliques.len()
        );
        info!(
            "branching {} propagation {} restart {}x{} nogoods {} threads {}",
            self.options.branching,
            self.options.propagation,
            self.options.restart_base,
            self.options.restart_scale,
            self.options.nogood_limit,
            self.options.threads
        );

        // Step 2: tighten the upper bound
        let search_start = Instant::now();
        let bound = upper_bound::run(&reordered, &pre, &self.options, start, deadline)?;
        let search_time = search_start.elapsed();

        // Step 3: certify on the full edge set
        let certificate_start = Instant::now();
        let certified = certificate::certify(
            &reordered,
            &pre,
            bound.coloring.as_deref(),
            bound.upper_bound,
            self.options.certifier,
        )?;
        let certificate_time = certificate_start.elapsed();

        let mut coloring = vec![0; graph.num_vertices()];
        for (new, &old) in order.iter().enumerate() {
            coloring[old] = certified.coloring[new];
        }
        if let Some((u, v)) = graph.find_conflict(&coloring) {
            return Err(ColoringError::InvalidCertificate {
                u,
                v,
                color: coloring[u],
            });
        }

        let mut search = bound.statistics;
        search.merge(&certified.statistics);
        let statistics = Statistics {
            preprocessing_time,
            search_time,
            certificate_time,
            search,
            cliques: pre.cliques.len(),
            edges_removed: pre.edges_removed,
            oracle_calls: pre.oracle_calls,
        };
        let solution = Solution {
            upper_bound: greedy::count_colors(&coloring),
            coloring,
            lower_bound: pre.lower_bound,
            status: bound.status,
            best_clique: pre.best_clique.vertices().map(|v| order[v]).collect(),
            statistics,
            progress: bound.progress,
            attempts: bound.attempts,
        };
        info!(
            "Nodes: {} Time: {:.3}s status: {} X(G) = {}",
            solution.statistics.nodes(),
            solution.statistics.total_time().as_secs_f64(),
            solution.status,
            solution.upper_bound
        );
        Ok(solution)
    }
}
