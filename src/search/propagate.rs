//! Propagators and the compiled model
//!
//! A `ColoringModel` is compiled once per attempt into a flat list of
//! propagators with per-variable watch lists. Workers share the compiled
//! model read-only; all mutable search state lives in the `Space` and in the
//! worker.

use super::alldiff;
use super::space::{Conflict, Space};
use crate::branching::Strategy;
use crate::model::{ColoringModel, Constraint, PropagationMode};

/// Filtering strength of an all-different propagator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Consistency {
    /// Value elimination only
    Value,
    /// Value elimination plus Hall intervals
    Bounds,
    /// Value elimination plus matching-based filtering
    Domain,
}

impl From<PropagationMode> for Consistency {
    fn from(mode: PropagationMode) -> Self {
        match mode {
            PropagationMode::Bounds => Consistency::Bounds,
            PropagationMode::Domain => Consistency::Domain,
            PropagationMode::Pairwise => Consistency::Value,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Propagator {
    AllDifferent {
        vars: Vec<usize>,
        consistency: Consistency,
    },
    NotEqual {
        vars: [usize; 2],
    },
    /// Color `c` may only be used once color `c - 1` is used by an earlier
    /// vertex; removes color permutation symmetry
    ValuePrecedence {
        vars: Vec<usize>,
    },
}

impl Propagator {
    pub(crate) fn vars(&self) -> &[usize] {
        match self {
            Propagator::AllDifferent { vars, .. } => vars,
            Propagator::NotEqual { vars } => vars,
            Propagator::ValuePrecedence { vars } => vars,
        }
    }

    pub(crate) fn propagate(&self, space: &mut Space) -> Result<(), Conflict> {
        match self {
            Propagator::AllDifferent { vars, consistency } => {
                alldiff::eliminate_values(vars, space)?;
                match consistency {
                    Consistency::Value => Ok(()),
                    Consistency::Bounds => alldiff::filter_bounds(vars, space),
                    Consistency::Domain => alldiff::filter_domain(vars, space),
                }
            }
            Propagator::NotEqual { vars: [a, b] } => {
                if let Some(v) = space.domain(*a).value() {
                    space.remove(*b, v)?;
                }
                if let Some(v) = space.domain(*b).value() {
                    space.remove(*a, v)?;
                }
                Ok(())
            }
            Propagator::ValuePrecedence { vars } => {
                let Some(last_color) = vars
                    .first()
                    .and_then(|&x| space.domain(x).colors().checked_sub(1))
                else {
                    return Ok(());
                };
                let mut highest: Option<usize> = None;
                for &x in vars {
                    let allowed = highest.map_or(0, |h| h + 1);
                    if allowed >= last_color {
                        break;
                    }
                    space.restrict_max(x, allowed)?;
                    if let Some(ub) = space.domain(x).max() {
                        highest = Some(highest.map_or(ub, |h| h.max(ub)));
                    }
                }
                Ok(())
            }
        }
    }
}

/// A model ready for search
#[derive(Debug, Clone)]
pub(crate) struct CompiledModel {
    pub(crate) num_vars: usize,
    pub(crate) colors: usize,
    pub(crate) propagators: Vec<Propagator>,
    /// Propagators watching each variable
    pub(crate) watches: Vec<Vec<usize>>,
    /// Number of propagators watching each variable
    pub(crate) degree: Vec<usize>,
    pub(crate) fixed: Vec<(usize, usize)>,
    pub(crate) strategy: Strategy,
    /// Variables branched on first, in order
    pub(crate) priority: Vec<usize>,
}

impl CompiledModel {
    pub(crate) fn compile(model: &ColoringModel) -> Self {
        let n = model.num_vertices();
        let consistency = Consistency::from(model.propagation());
        let mut propagators = Vec::new();
        let mut fixed = Vec::new();
        for constraint in model.constraints() {
            match constraint {
                Constraint::AllDifferent(vars) if vars.len() > 1 => {
                    propagators.push(Propagator::AllDifferent {
                        vars: vars.clone(),
                        consistency,
                    });
                }
                Constraint::AllDifferent(_) => {}
                Constraint::NotEqual(a, b) => {
                    propagators.push(Propagator::NotEqual { vars: [*a, *b] });
                }
                Constraint::Fix(x, c) => fixed.push((*x, *c)),
            }
        }
        if model.symmetry_breaking() && n > 1 {
            propagators.push(Propagator::ValuePrecedence {
                vars: (0..n).collect(),
            });
        }

        let mut watches = vec![Vec::new(); n];
        for (p, propagator) in propagators.iter().enumerate() {
            for &x in propagator.vars() {
                watches[x].push(p);
            }
        }
        let degree = watches.iter().map(Vec::len).collect();

        Self {
            num_vars: n,
            colors: model.colors(),
            propagators,
            watches,
            degree,
            fixed,
            strategy: model.branching().strategy(),
            priority: model.priority().to_vec(),
        }
    }

    /// The root space with fixings applied
    pub(crate) fn root(&self) -> Result<Space, Conflict> {
        let mut space = Space::new(self.num_vars, self.colors);
        if self.num_vars > 0 && self.colors == 0 {
            return Err(Conflict);
        }
        for &(x, c) in &self.fixed {
            space.assign(x, c)?;
        }
        Ok(space)
    }

    /// Approximate footprint of one search node
    pub(crate) fn space_bytes(&self) -> usize {
        Space::new(self.num_vars, self.colors).byte_size()
    }
}
