//! Coloring models
//!
//! A model asks for a coloring of `n` vertices with colors `0..k` subject to
//! a list of constraints. Two models are built per run:
//! - the heuristic model: one all-different per preprocessing clique on the
//!   reduced graph, optionally with value precedence and a pinned C*
//! - the completion model: pairwise inequalities over every edge of the full
//!   graph, with part of the heuristic coloring fixed

use crate::branching::BranchingPolicy;
use crate::clique::Clique;
use crate::error::{ColoringError, Result};
use crate::graph::Graph;
use rustc_hash::FxHashSet;
use std::fmt;
use std::str::FromStr;

/// How strongly the clique constraints are propagated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PropagationMode {
    /// Hall-interval bounds filtering
    Bounds,
    /// Full domain filtering by matching
    #[default]
    Domain,
    /// Each clique decomposed into pairwise inequalities
    Pairwise,
}

impl PropagationMode {
    /// Looks a mode up by numeric id (0 bounds, 1 domain, 2 pairwise)
    pub fn from_id(id: usize) -> Result<Self> {
        match id {
            0 => Ok(PropagationMode::Bounds),
            1 => Ok(PropagationMode::Domain),
            2 => Ok(PropagationMode::Pairwise),
            _ => Err(ColoringError::InvalidArgument(format!(
                "unknown propagation id {id} (expected 0, 1 or 2)"
            ))),
        }
    }

    /// Short name used on the command line and in logs
    pub fn name(self) -> &'static str {
        match self {
            PropagationMode::Bounds => "bounds",
            PropagationMode::Domain => "domain",
            PropagationMode::Pairwise => "pairwise",
        }
    }
}

impl fmt::Display for PropagationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PropagationMode {
    type Err = ColoringError;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(id) = s.parse::<usize>() {
            return Self::from_id(id);
        }
        match s {
            "bounds" => Ok(PropagationMode::Bounds),
            "domain" => Ok(PropagationMode::Domain),
            "pairwise" => Ok(PropagationMode::Pairwise),
            _ => Err(ColoringError::InvalidArgument(format!(
                "unknown propagation mode '{s}'"
            ))),
        }
    }
}

/// A coloring constraint over vertex indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// The listed vertices take pairwise distinct colors
    AllDifferent(Vec<usize>),
    /// Two vertices take different colors
    NotEqual(usize, usize),
    /// A vertex takes the given color
    Fix(usize, usize),
}

impl Constraint {
    /// Returns true if `colors` satisfies the constraint
    pub fn is_satisfied_by(&self, colors: &[usize]) -> bool {
        match self {
            Constraint::AllDifferent(vars) => {
                let mut used = FxHashSet::default();
                vars.iter().all(|&x| used.insert(colors[x]))
            }
            Constraint::NotEqual(a, b) => colors[*a] != colors[*b],
            Constraint::Fix(x, c) => colors[*x] == *c,
        }
    }
}

/// A k-coloring problem
#[derive(Debug, Clone)]
pub struct ColoringModel {
    num_vertices: usize,
    colors: usize,
    constraints: Vec<Constraint>,
    propagation: PropagationMode,
    branching: BranchingPolicy,
    symmetry_breaking: bool,
    priority: Vec<usize>,
}

impl ColoringModel {
    /// An unconstrained model over `num_vertices` vertices and `colors` colors
    pub fn new(num_vertices: usize, colors: usize) -> Self {
        Self {
            num_vertices,
            colors,
            constraints: Vec::new(),
            propagation: PropagationMode::default(),
            branching: BranchingPolicy::default(),
            symmetry_breaking: false,
            priority: Vec::new(),
        }
    }

    /// The model of the upper-bound loop
    ///
    /// Every clique with more than one vertex becomes an all-different (or
    /// its pairwise decomposition). Value precedence is added when the
    /// policy asks for it; `CliquePinned` instead fixes the i-th vertex of
    /// `best_clique` to color `i`.
    pub fn heuristic(
        graph: &Graph,
        colors: usize,
        cliques: &[Clique],
        best_clique: &Clique,
        branching: BranchingPolicy,
        propagation: PropagationMode,
    ) -> Self {
        let strategy = branching.strategy();
        let mut model = Self::new(graph.num_vertices(), colors)
            .with_branching(branching)
            .with_propagation(propagation);

        let mut pairs = FxHashSet::default();
        for clique in cliques.iter().filter(|c| c.size() > 1) {
            let vars: Vec<usize> = clique.vertices().collect();
            if propagation == PropagationMode::Pairwise {
                for (i, &u) in vars.iter().enumerate() {
                    for &v in &vars[i + 1..] {
                        if pairs.insert((u, v)) {
                            model.add(Constraint::NotEqual(u, v));
                        }
                    }
                }
            } else {
                model.add(Constraint::AllDifferent(vars));
            }
        }

        if strategy.pin_clique {
            for (color, v) in best_clique.vertices().enumerate() {
                model.add(Constraint::Fix(v, color));
            }
        }
        if strategy.clique_priority {
            model.priority = best_clique.vertices().collect();
        }
        model.symmetry_breaking = strategy.symmetry_breaking && !model.has_fixings();
        model
    }

    /// The completion model of the final pass
    ///
    /// One inequality per edge of `graph`, plus a fixing for every vertex
    /// with `Some` color.
    pub fn completion(graph: &Graph, colors: usize, fixing: &[Option<usize>]) -> Self {
        let mut model = Self::new(graph.num_vertices(), colors)
            .with_branching(BranchingPolicy::SizeMin)
            .with_propagation(PropagationMode::Pairwise);
        for (v, color) in fixing.iter().enumerate() {
            if let Some(c) = color {
                model.add(Constraint::Fix(v, *c));
            }
        }
        for (u, v) in graph.edges() {
            model.add(Constraint::NotEqual(u, v));
        }
        model
    }

    /// Adds a constraint
    pub fn add(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Sets the branching policy
    pub fn with_branching(mut self, branching: BranchingPolicy) -> Self {
        self.branching = branching;
        self
    }

    /// Sets the propagation mode
    pub fn with_propagation(mut self, propagation: PropagationMode) -> Self {
        self.propagation = propagation;
        self
    }

    /// Enables or disables value precedence
    pub fn with_symmetry_breaking(mut self, enabled: bool) -> Self {
        self.symmetry_breaking = enabled;
        self
    }

    /// Number of vertices
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Number of available colors k
    pub fn colors(&self) -> usize {
        self.colors
    }

    /// All constraints in insertion order
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Propagation mode for all-different constraints
    pub fn propagation(&self) -> PropagationMode {
        self.propagation
    }

    /// Branching policy
    pub fn branching(&self) -> BranchingPolicy {
        self.branching
    }

    /// Whether value precedence is posted
    pub fn symmetry_breaking(&self) -> bool {
        self.symmetry_breaking
    }

    /// Vertices to branch on before any other, in order
    pub fn priority(&self) -> &[usize] {
        &self.priority
    }

    /// Returns true if the model fixes any vertex
    pub fn has_fixings(&self) -> bool {
        self.constraints.iter().any(|c| matches!(c, Constraint::Fix(..)))
    }

    /// Returns true if `colors` is a valid solution of the model
    pub fn is_satisfied_by(&self, colors: &[usize]) -> bool {
        colors.len() == self.num_vertices
            && colors.iter().all(|&c| c < self.colors)
            && self.constraints.iter().all(|c| c.is_satisfied_by(colors))
    }
}
