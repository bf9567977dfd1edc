//! Search nodes
//!
//! A `Space` owns the domains of every variable at one node of the search
//! tree. Branching clones the space, so sibling subtrees never share mutable
//! state. Every domain change is recorded in a modification list that the
//! propagation loop drains to wake the affected propagators.

use super::domain::Domain;

/// A domain was wiped out or an impossible assignment was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Conflict;

/// Variable domains at one search node
#[derive(Clone, Debug)]
pub(crate) struct Space {
    domains: Vec<Domain>,
    modified: Vec<usize>,
}

impl Space {
    /// Every variable ranges over `0..colors`
    pub(crate) fn new(num_vars: usize, colors: usize) -> Self {
        Self {
            domains: vec![Domain::full(colors); num_vars],
            modified: Vec::new(),
        }
    }

    pub(crate) fn num_vars(&self) -> usize {
        self.domains.len()
    }

    pub(crate) fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub(crate) fn domain(&self, x: usize) -> &Domain {
        &self.domains[x]
    }

    /// The coloring, once every variable is assigned
    pub(crate) fn values(&self) -> Option<Vec<usize>> {
        self.domains.iter().map(Domain::value).collect()
    }

    pub(crate) fn remove(&mut self, x: usize, v: usize) -> Result<bool, Conflict> {
        let changed = self.domains[x].remove(v);
        self.changed(x, changed)
    }

    pub(crate) fn assign(&mut self, x: usize, v: usize) -> Result<bool, Conflict> {
        let changed = self.domains[x].assign(v);
        self.changed(x, changed)
    }

    pub(crate) fn restrict_max(&mut self, x: usize, bound: usize) -> Result<bool, Conflict> {
        let changed = self.domains[x].restrict_max(bound);
        self.changed(x, changed)
    }

    pub(crate) fn restrict_min(&mut self, x: usize, bound: usize) -> Result<bool, Conflict> {
        let changed = self.domains[x].restrict_min(bound);
        self.changed(x, changed)
    }

    fn changed(&mut self, x: usize, changed: bool) -> Result<bool, Conflict> {
        if self.domains[x].is_empty() {
            return Err(Conflict);
        }
        if changed {
            self.modified.push(x);
        }
        Ok(changed)
    }

    /// Variables modified since the last call
    pub(crate) fn take_modified(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.modified)
    }

    /// Approximate footprint of one space in bytes
    pub(crate) fn byte_size(&self) -> usize {
        std::mem::size_of::<Self>() + self.domains.iter().map(Domain::byte_size).sum::<usize>()
    }
}
