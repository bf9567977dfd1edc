//! Color domains
//!
//! A domain is the set of colors a vertex may still take, stored as a bitset
//! over `0..k` with a cached cardinality.

use bitvec::prelude::*;
use std::fmt;

/// Remaining colors of one variable
#[derive(Clone, PartialEq, Eq)]
pub struct Domain {
    values: BitVec,
    size: usize,
}

impl Domain {
    /// The full domain `{0, .., colors - 1}`
    pub fn full(colors: usize) -> Self {
        Self {
            values: BitVec::repeat(true, colors),
            size: colors,
        }
    }

    /// Number of colors the domain ranges over
    pub fn colors(&self) -> usize {
        self.values.len()
    }

    /// Number of remaining values
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true if no value remains
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns true if exactly one value remains
    pub fn is_assigned(&self) -> bool {
        self.size == 1
    }

    /// The assigned value, if the domain is a singleton
    pub fn value(&self) -> Option<usize> {
        if self.is_assigned() {
            self.values.first_one()
        } else {
            None
        }
    }

    /// Returns true if `v` is still possible
    pub fn contains(&self, v: usize) -> bool {
        v < self.values.len() && self.values[v]
    }

    /// Smallest remaining value
    pub fn min(&self) -> Option<usize> {
        self.values.first_one()
    }

    /// Largest remaining value
    pub fn max(&self) -> Option<usize> {
        self.values.last_one()
    }

    /// Remaining values in increasing order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.values.iter_ones()
    }

    /// Removes `v`, returning true if the domain changed
    pub(crate) fn remove(&mut self, v: usize) -> bool {
        if !self.contains(v) {
            return false;
        }
        self.values.set(v, false);
        self.size -= 1;
        true
    }

    /// Reduces the domain to `{v}` (or to empty if `v` is absent)
    ///
    /// Returns true if the domain changed.
    pub(crate) fn assign(&mut self, v: usize) -> bool {
        let present = self.contains(v);
        if present && self.size == 1 {
            return false;
        }
        self.values.fill(false);
        if present {
            self.values.set(v, true);
            self.size = 1;
        } else {
            self.size = 0;
        }
        true
    }

    /// Removes every value above `bound`, returning true if the domain changed
    pub(crate) fn restrict_max(&mut self, bound: usize) -> bool {
        let mut changed = false;
        for v in bound.saturating_add(1)..self.values.len() {
            changed |= self.remove(v);
        }
        changed
    }

    /// Removes every value below `bound`, returning true if the domain changed
    pub(crate) fn restrict_min(&mut self, bound: usize) -> bool {
        let mut changed = false;
        for v in 0..bound.min(self.values.len()) {
            changed |= self.remove(v);
        }
        changed
    }

    /// Approximate heap and inline footprint in bytes
    pub fn byte_size(&self) -> usize {
        std::mem::size_of::<Self>() + self.values.len().div_ceil(8)
    }
}

impl fmt::Debug for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
