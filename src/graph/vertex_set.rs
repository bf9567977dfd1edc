//! Fixed-width vertex sets
//!
//! Cliques, adjacency rows and candidate sets are all subsets of `0..n` for a
//! fixed `n`, so they are stored as bitsets with O(1) membership.

use bitvec::prelude::*;
use std::fmt;

const WORD: usize = usize::BITS as usize;

/// A subset of the vertices `0..capacity`
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct VertexSet {
    bits: BitVec,
}

impl VertexSet {
    /// Creates an empty set over `0..capacity`
    pub fn new(capacity: usize) -> Self {
        Self {
            bits: BitVec::repeat(false, capacity),
        }
    }

    /// Creates the set `{0, .., capacity - 1}`
    pub fn full(capacity: usize) -> Self {
        Self {
            bits: BitVec::repeat(true, capacity),
        }
    }

    /// Creates a set over `0..capacity` holding the given vertices
    ///
    /// # Panics
    /// Panics if a vertex is not below `capacity`.
    pub fn from_vertices<I: IntoIterator<Item = usize>>(capacity: usize, vertices: I) -> Self {
        let mut set = Self::new(capacity);
        for v in vertices {
            set.insert(v);
        }
        set
    }

    /// Number of vertices the set ranges over
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Adds `v`, returning true if it was not present
    pub fn insert(&mut self, v: usize) -> bool {
        let was = self.bits[v];
        self.bits.set(v, true);
        !was
    }

    /// Removes `v`, returning true if it was present
    pub fn remove(&mut self, v: usize) -> bool {
        if !self.contains(v) {
            return false;
        }
        self.bits.set(v, false);
        true
    }

    /// Returns true if `v` is in the set
    pub fn contains(&self, v: usize) -> bool {
        v < self.bits.len() && self.bits[v]
    }

    /// Number of vertices in the set
    pub fn len(&self) -> usize {
        self.bits.count_ones()
    }

    /// Returns true if the set has no vertices
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Iterates over the members in increasing order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Smallest member, if any
    pub fn first(&self) -> Option<usize> {
        self.bits.first_one()
    }

    /// Removes every member
    pub fn clear(&mut self) {
        self.bits.fill(false);
    }

    /// Size of `self ∩ other`
    pub fn intersection_len(&self, other: &VertexSet) -> usize {
        self.words(other)
            .map(|(a, b)| (a & b).count_ones() as usize)
            .sum()
    }

    /// Returns true if every member of `self` is in `other`
    pub fn is_subset(&self, other: &VertexSet) -> bool {
        self.words(other).all(|(a, b)| a & !b == 0)
    }

    /// Keeps only the members that are also in `other`
    pub fn intersect_with(&mut self, other: &VertexSet) {
        self.bits &= other.bits.as_bitslice();
    }

    /// Both sets as aligned machine words
    fn words<'a>(&'a self, other: &'a VertexSet) -> impl Iterator<Item = (usize, usize)> + 'a {
        self.bits
            .chunks(WORD)
            .zip(other.bits.chunks(WORD))
            .map(|(a, b)| (a.load_le::<usize>(), b.load_le::<usize>()))
    }
}

impl fmt::Debug for VertexSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
