//! SAT backends for the certificate pass
//!
//! A coloring model is encoded with [`crate::cnf`], handed to any
//! [`SatSolver`], and the model of a satisfiable formula is decoded back
//! into a coloring.

#[cfg(feature = "sat")]
pub mod rustsat_adapter;

use crate::cnf;
use crate::error::Result;
use crate::model::ColoringModel;
use log::debug;

/// Core SAT solver trait
///
/// Variables are 1-indexed, and literals are represented as signed integers
/// (positive for true, negative for false).
pub trait SatSolver {
    /// Adds the given number of variables to the solver
    fn add_variables(&mut self, num_vars: u32);

    /// Adds a clause to the solver
    ///
    /// Returns false if the clause is trivially unsatisfiable
    fn add_clause(&mut self, lits: &[i32]) -> bool;

    /// Solves the current formula
    ///
    /// Returns true if satisfiable, false if unsatisfiable
    fn solve(&mut self) -> bool;

    /// Returns the assignment of a variable in the solution
    ///
    /// Only valid after solve() returns true.
    fn value_of(&self, var: u32) -> bool;

    /// Returns the number of variables in the solver
    fn num_variables(&self) -> u32;

    /// Returns the number of clauses added
    fn num_clauses(&self) -> u32;
}

/// Solves `model` with `solver`, returning a coloring if one exists
pub fn solve_with<S: SatSolver>(
    solver: &mut S,
    model: &ColoringModel,
) -> Result<Option<Vec<usize>>> {
    let formula = cnf::encode(model)?;
    debug!(
        "sat: {} variables, {} clauses",
        formula.num_variables,
        formula.num_clauses()
    );
    solver.add_variables(formula.num_variables);
    for clause in &formula.clauses {
        if !solver.add_clause(clause) {
            return Ok(None);
        }
    }
    if !solver.solve() {
        return Ok(None);
    }
    Ok(cnf::decode(model, |var| solver.value_of(var)))
}

/// Solves `model` with the bundled batsat backend
#[cfg(feature = "sat")]
pub fn solve(model: &ColoringModel) -> Result<Option<Vec<usize>>> {
    let mut solver = rustsat_adapter::RustSatAdapter::new(rustsat_batsat::BasicSolver::default());
    solve_with(&mut solver, model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Constraint;

    /// Tries every assignment; only for formulas with a handful of variables
    #[derive(Default)]
    struct ExhaustiveSolver {
        num_vars: u32,
        clauses: Vec<Vec<i32>>,
        model: Vec<bool>,
    }

    impl SatSolver for ExhaustiveSolver {
        fn add_variables(&mut self, num_vars: u32) {
            self.num_vars += num_vars;
        }

        fn add_clause(&mut self, lits: &[i32]) -> bool {
            self.clauses.push(lits.to_vec());
            !lits.is_empty()
        }

        fn solve(&mut self) -> bool {
            let n = self.num_vars as usize;
            for bits in 0u64..(1 << n) {
                let value = |lit: i32| {
                    let on = bits >> (lit.unsigned_abs() - 1) & 1 == 1;
                    if lit > 0 { on } else { !on }
                };
                if self.clauses.iter().all(|c| c.iter().any(|&l| value(l))) {
                    self.model = (0..n).map(|i| bits >> i & 1 == 1).collect();
                    return true;
                }
            }
            false
        }

        fn value_of(&self, var: u32) -> bool {
            var >= 1 && self.model.get(var as usize - 1).copied().unwrap_or(false)
        }

        fn num_variables(&self) -> u32 {
            self.num_vars
        }

        fn num_clauses(&self) -> u32 {
            self.clauses.len() as u32
        }
    }

    fn triangle(colors: usize) -> ColoringModel {
        let mut m = ColoringModel::new(3, colors);
        m.add(Constraint::AllDifferent(vec![0, 1, 2]));
        m
    }

    #[test]
    fn triangle_with_three_colors() {
        let model = triangle(3);
        let coloring = solve_with(&mut ExhaustiveSolver::default(), &model).unwrap().unwrap();
        assert!(model.is_satisfied_by(&coloring));
    }

    #[test]
    fn triangle_with_two_colors() {
        let result = solve_with(&mut ExhaustiveSolver::default(), &triangle(2)).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn fixings_are_respected() {
        let mut model = triangle(3);
        model.add(Constraint::Fix(1, 0));
        let coloring = solve_with(&mut ExhaustiveSolver::default(), &model).unwrap().unwrap();
        assert_eq!(coloring[1], 0);
        assert!(model.is_satisfied_by(&coloring));
    }

    #[cfg(feature = "sat")]
    #[test]
    fn batsat_backend() {
        let model = triangle(3);
        let coloring = solve(&model).unwrap().unwrap();
        assert!(model.is_satisfied_by(&coloring));
        assert_eq!(solve(&triangle(2)).unwrap(), None);
    }
}
