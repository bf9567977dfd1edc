//! Coloring model to CNF encoding
//!
//! Uses the direct encoding: one boolean `x(v, c)` per vertex and color,
//! numbered `v * k + c + 1`, with
//! - at least one color per vertex
//! - at most one color per vertex
//! - one conflict clause per color for every pair of vertices that must
//!   differ (inequalities and all-different scopes)
//! - a unit clause per fixing
//!
//! Value precedence is not encoded; it removes symmetric solutions only.

use crate::error::{ColoringError, Result};
use crate::model::{ColoringModel, Constraint};
use std::io::Write;

/// CNF representation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CNF {
    /// Number of variables
    pub num_variables: u32,
    /// CNF clauses (each clause is a vec of literals, negative = negated)
    pub clauses: Vec<Vec<i32>>,
}

impl CNF {
    /// Creates a new empty CNF
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a clause to the CNF
    pub fn add_clause(&mut self, clause: Vec<i32>) {
        for &lit in &clause {
            self.num_variables = self.num_variables.max(lit.unsigned_abs());
        }
        self.clauses.push(clause);
    }

    /// Number of clauses
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Writes the formula in DIMACS CNF format
    pub fn write_dimacs<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "p cnf {} {}", self.num_variables, self.clauses.len())?;
        for clause in &self.clauses {
            for lit in clause {
                write!(writer, "{lit} ")?;
            }
            writeln!(writer, "0")?;
        }
        Ok(())
    }
}

/// Encodes coloring models as CNF
pub struct CnfEncoder<'a> {
    model: &'a ColoringModel,
    cnf: CNF,
}

impl<'a> CnfEncoder<'a> {
    /// Creates an encoder for `model`
    ///
    /// Fails if the model has more vertex/color pairs than DIMACS literals
    /// can address.
    pub fn new(model: &'a ColoringModel) -> Result<Self> {
        let pairs = model.num_vertices().checked_mul(model.colors());
        if pairs.map_or(true, |p| p >= i32::MAX as usize) {
            return Err(ColoringError::InvalidArgument(format!(
                "{} vertices x {} colors is too large for a CNF encoding",
                model.num_vertices(),
                model.colors()
            )));
        }
        Ok(Self {
            model,
            cnf: CNF::new(),
        })
    }

    /// Literal of "vertex `v` takes color `c`"
    pub fn literal(&self, v: usize, c: usize) -> i32 {
        (v * self.model.colors() + c + 1) as i32
    }

    /// Encodes the whole model
    pub fn encode(mut self) -> CNF {
        let n = self.model.num_vertices();
        let k = self.model.colors();
        self.cnf.num_variables = (n * k) as u32;
        for v in 0..n {
            self.encode_vertex(v);
        }
        for constraint in self.model.constraints() {
            match constraint {
                Constraint::AllDifferent(vars) => {
                    for (i, &u) in vars.iter().enumerate() {
                        for &w in &vars[i + 1..] {
                            self.encode_not_equal(u, w);
                        }
                    }
                }
                Constraint::NotEqual(u, w) => self.encode_not_equal(*u, *w),
                Constraint::Fix(v, c) if *c < k => {
                    let lit = self.literal(*v, *c);
                    self.cnf.add_clause(vec![lit]);
                }
                Constraint::Fix(..) => self.cnf.add_clause(Vec::new()),
            }
        }
        self.cnf
    }

    /// Exactly one color per vertex
    ///
    /// - (x(v,0) ∨ .. ∨ x(v,k-1))
    /// - (¬x(v,a) ∨ ¬x(v,b)) for every a < b
    fn encode_vertex(&mut self, v: usize) {
        let k = self.model.colors();
        let lits: Vec<i32> = (0..k).map(|c| self.literal(v, c)).collect();
        for (i, &a) in lits.iter().enumerate() {
            for &b in &lits[i + 1..] {
                self.cnf.add_clause(vec![-a, -b]);
            }
        }
        self.cnf.add_clause(lits);
    }

    /// (¬x(u,c) ∨ ¬x(w,c)) for every color c
    fn encode_not_equal(&mut self, u: usize, w: usize) {
        for c in 0..self.model.colors() {
            let clause = vec![-self.literal(u, c), -self.literal(w, c)];
            self.cnf.add_clause(clause);
        }
    }
}

/// Encodes `model` as CNF
pub fn encode(model: &ColoringModel) -> Result<CNF> {
    Ok(CnfEncoder::new(model)?.encode())
}

/// Reads a coloring back from a satisfying assignment
///
/// `value_of` reports the truth value of a 1-based variable. Returns None if
/// some vertex has no true color variable.
pub fn decode<F: Fn(u32) -> bool>(model: &ColoringModel, value_of: F) -> Option<Vec<usize>> {
    let k = model.colors();
    (0..model.num_vertices())
        .map(|v| (0..k).find(|&c| value_of((v * k + c + 1) as u32)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cnf_add_clause() {
        let mut cnf = CNF::new();
        cnf.add_clause(vec![1, -2, 3]);
        assert_eq!(cnf.num_variables, 3);
        assert_eq!(cnf.num_clauses(), 1);
    }

    #[test]
    fn clause_counts() {
        let mut m = ColoringModel::new(3, 2);
        m.add(Constraint::NotEqual(0, 1));
        m.add(Constraint::AllDifferent(vec![0, 1, 2]));
        m.add(Constraint::Fix(2, 1));
        let cnf = encode(&m).unwrap();
        assert_eq!(cnf.num_variables, 6);
        // 3 vertices x (1 ALO + 1 AMO), 2 for the inequality, 3 pairs x 2
        // colors for the all-different, 1 unit
        assert_eq!(cnf.num_clauses(), 6 + 2 + 6 + 1);
        assert!(cnf.clauses.contains(&vec![6]));
    }

    #[test]
    fn fixing_outside_the_palette_is_unsatisfiable() {
        let mut m = ColoringModel::new(1, 2);
        m.add(Constraint::Fix(0, 4));
        let cnf = encode(&m).unwrap();
        assert!(cnf.clauses.contains(&Vec::new()));
    }

    #[test]
    fn decode_assignment() {
        let m = ColoringModel::new(2, 3);
        // vertex 0 -> color 2 (var 3), vertex 1 -> color 0 (var 4)
        assert_eq!(decode(&m, |var| var == 3 || var == 4), Some(vec![2, 0]));
        assert_eq!(decode(&m, |var| var == 3), None);
    }

    #[test]
    fn dimacs_output() {
        let mut m = ColoringModel::new(2, 1);
        m.add(Constraint::NotEqual(0, 1));
        let mut out = Vec::new();
        encode(&m).unwrap().write_dimacs(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "p cnf 2 3\n1 0\n2 0\n-1 -2 0\n");
    }
}
