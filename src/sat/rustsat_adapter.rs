//! Adapter for rustsat solver backends

use super::SatSolver;
use log::error;

/// Wraps a rustsat solver to implement [`SatSolver`]
///
/// ```ignore
/// use rustsat_batsat::BasicSolver;
/// let solver = RustSatAdapter::new(BasicSolver::default());
/// ```
pub struct RustSatAdapter<S> {
    solver: S,
    num_vars: u32,
    num_clauses: u32,
}

impl<S> RustSatAdapter<S> {
    /// Creates a new adapter wrapping the given solver
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            num_vars: 0,
            num_clauses: 0,
        }
    }
}

impl<S: rustsat::solvers::Solve> SatSolver for RustSatAdapter<S> {
    fn add_variables(&mut self, num_vars: u32) {
        // rustsat creates variables on first use
        self.num_vars += num_vars;
    }

    fn add_clause(&mut self, lits: &[i32]) -> bool {
        use rustsat::types::{Clause, Lit, Var};

        let mut clause_lits: Vec<Lit> = Vec::with_capacity(lits.len());
        for &lit in lits {
            let Some(var_idx) = lit.unsigned_abs().checked_sub(1) else {
                error!("literal 0 is not a valid DIMACS literal");
                return false;
            };
            if var_idx > Var::MAX_IDX {
                error!("variable index {var_idx} (literal {lit}) exceeds {}", Var::MAX_IDX);
                return false;
            }
            let var = Var::new(var_idx);
            clause_lits.push(if lit > 0 { var.pos_lit() } else { var.neg_lit() });
        }

        self.num_clauses += 1;
        self.solver.add_clause(Clause::from(&clause_lits[..])).is_ok()
    }

    fn solve(&mut self) -> bool {
        use rustsat::solvers::SolverResult;
        matches!(self.solver.solve(), Ok(SolverResult::Sat))
    }

    fn value_of(&self, var: u32) -> bool {
        use rustsat::types::{TernaryVal, Var};
        if var == 0 || var > self.num_vars {
            return false;
        }
        let v = Var::new(var - 1);
        match self.solver.solution(v) {
            Ok(assignment) => matches!(assignment.var_value(v), TernaryVal::True),
            Err(_) => false,
        }
    }

    fn num_variables(&self) -> u32 {
        self.num_vars
    }

    fn num_clauses(&self) -> u32 {
        self.num_clauses
    }
}
