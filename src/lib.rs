//! # cliquecol-rs
//!
//! Minimum graph coloring by clique preprocessing and constraint search.
//!
//! The solver first covers the graph with maximal cliques. The largest one
//! gives a lower bound on the chromatic number, and the collection becomes a
//! set of all-different constraints. A depth-first branch and bound with
//! restarts then repeatedly looks for a coloring with one color fewer than
//! the best known, until an attempt is proven infeasible or the budget runs
//! out. A final exhaustive pass completes the best coloring against every
//! edge of the input and verifies it.
//!
//! ## Example
//!
//! ```rust
//! use cliquecol_rs::graph::Graph;
//! use cliquecol_rs::solver::{Options, Solver};
//!
//! // 5-cycle: needs 3 colors
//! let graph = Graph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)])?;
//! let solution = Solver::new(Options::default()).solve(&graph)?;
//!
//! assert!(solution.is_optimal());
//! assert_eq!(solution.num_colors(), 3);
//! # Ok::<(), cliquecol_rs::ColoringError>(())
//! ```

#![warn(missing_docs)]
#![warn(rust_2024_compatibility)]

/// Graphs, vertex sets, DIMACS input and greedy coloring
pub mod graph;

/// Maximal cliques, clique oracles and preprocessing
pub mod clique;

/// Coloring models and constraints
pub mod model;

/// Branching policies
pub mod branching;

/// Constraint search engine
pub mod search;

/// Main solver API
pub mod solver;

/// CNF encoding of coloring models
pub mod cnf;

/// SAT solver backends
pub mod sat;

/// Error types
pub mod error {
    //! Error types for cliquecol-rs

    use thiserror::Error;

    /// Errors that can occur while reading or coloring a graph
    #[derive(Error, Debug)]
    pub enum ColoringError {
        /// Malformed DIMACS input
        #[error("line {line}: {message}")]
        InputFormat {
            /// 1-based line number (0 when the problem line is missing)
            line: usize,
            /// What was wrong
            message: String,
        },

        /// The certificate pass could not complete the heuristic coloring
        #[error("no {colors}-coloring extends the {fixed} fixed vertices")]
        InfeasibleFix {
            /// Colors available
            colors: usize,
            /// Vertices whose color was fixed
            fixed: usize,
        },

        /// A coloring gives both ends of an edge the same color
        #[error("invalid coloring: edge {u}-{v} has color {color} at both ends")]
        InvalidCertificate {
            /// First endpoint
            u: usize,
            /// Second endpoint
            v: usize,
            /// The shared color
            color: usize,
        },

        /// Invalid argument
        #[error("invalid argument: {0}")]
        InvalidArgument(String),

        /// Reading or writing failed
        #[error(transparent)]
        Io(#[from] std::io::Error),
    }

    /// Result type for cliquecol-rs operations
    pub type Result<T> = std::result::Result<T, ColoringError>;
}

// Re-export commonly used types
pub use error::{ColoringError, Result};
pub use graph::Graph;
pub use solver::{Options, Solution, Solver, Status};
