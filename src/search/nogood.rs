//! Restart nogoods
//!
//! When a restart interrupts the search, every subtree to the left of the
//! interrupted node has been explored completely. For a decision path
//! `d1, .., dn`, each negative decision `di = (x != v)` means the subtree
//! `d1 .. d(i-1), x = v` holds no solution, so that conjunction is recorded
//! as a nogood and enforced in all later search.

use super::space::{Conflict, Space};
use rustc_hash::FxHashSet;

/// A branching decision `x = v` or `x != v`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Literal {
    pub(crate) var: usize,
    pub(crate) value: usize,
    pub(crate) equal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Truth {
    True,
    False,
    Unknown,
}

impl Literal {
    pub(crate) fn eq(var: usize, value: usize) -> Self {
        Self { var, value, equal: true }
    }

    pub(crate) fn neq(var: usize, value: usize) -> Self {
        Self { var, value, equal: false }
    }

    fn negate(self) -> Self {
        Self { equal: !self.equal, ..self }
    }

    fn truth(&self, space: &Space) -> Truth {
        let domain = space.domain(self.var);
        let possible = domain.contains(self.value);
        let certain = domain.value() == Some(self.value);
        match (self.equal, possible, certain) {
            (true, _, true) | (false, false, _) => Truth::True,
            (true, false, _) | (false, _, true) => Truth::False,
            _ => Truth::Unknown,
        }
    }

    fn enforce(&self, space: &mut Space) -> Result<bool, Conflict> {
        if self.equal {
            space.assign(self.var, self.value)
        } else {
            space.remove(self.var, self.value)
        }
    }
}

/// Conjunctions of decisions known to have no solution
#[derive(Debug, Default, Clone)]
pub(crate) struct NogoodStore {
    nogoods: Vec<Vec<Literal>>,
    seen: FxHashSet<Vec<Literal>>,
    literals: usize,
}

impl NogoodStore {
    pub(crate) fn len(&self) -> usize {
        self.nogoods.len()
    }

    /// Records `nogood` unless it is already known
    pub(crate) fn add(&mut self, nogood: Vec<Literal>) -> bool {
        if nogood.is_empty() || self.seen.contains(&nogood) {
            return false;
        }
        self.literals += nogood.len();
        self.seen.insert(nogood.clone());
        self.nogoods.push(nogood);
        true
    }

    /// Derives the nogoods of an interrupted decision path, returning how
    /// many were new
    pub(crate) fn derive(&mut self, path: &[Literal]) -> usize {
        let mut added = 0;
        for (i, literal) in path.iter().enumerate() {
            if literal.equal {
                continue;
            }
            let mut nogood = path[..i].to_vec();
            nogood.push(literal.negate());
            if self.add(nogood) {
                added += 1;
            }
        }
        added
    }

    /// Enforces every nogood with a single undecided literal
    ///
    /// Returns whether any domain changed, or a conflict when a nogood is
    /// fully satisfied.
    pub(crate) fn propagate(&self, space: &mut Space) -> Result<bool, Conflict> {
        let mut changed = false;
        for nogood in &self.nogoods {
            let mut open = None;
            let mut open_count = 0;
            let mut falsified = false;
            for literal in nogood {
                match literal.truth(space) {
                    Truth::False => {
                        falsified = true;
                        break;
                    }
                    Truth::Unknown => {
                        open_count += 1;
                        open = Some(*literal);
                    }
                    Truth::True => {}
                }
            }
            if falsified || open_count > 1 {
                continue;
            }
            match open {
                None => return Err(Conflict),
                Some(literal) => changed |= literal.negate().enforce(space)?,
            }
        }
        Ok(changed)
    }

    /// Approximate footprint in bytes
    pub(crate) fn byte_size(&self) -> usize {
        // stored twice, once in the list and once in the dedup set
        2 * (self.literals * std::mem::size_of::<Literal>()
            + self.nogoods.len() * std::mem::size_of::<Vec<Literal>>())
    }
}
