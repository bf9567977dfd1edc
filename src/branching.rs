//! Branching policies
//!
//! A policy decides which unassigned vertex to branch on next and which
//! color to try first. Every policy branches binarily on `x = v` / `x != v`
//! with `v` the smallest remaining color; they differ in the variable merit:
//!
//! | id | name            | merit (maximized)             | symmetry breaking |
//! |----|-----------------|-------------------------------|-------------------|
//! | 0  | `size`          | smallest domain               | no                |
//! | 1  | `size-sym`      | smallest domain               | yes               |
//! | 2  | `afc`           | accumulated failure count     | yes               |
//! | 3  | `activity`      | activity                      | yes               |
//! | 4  | `activity-size` | activity / domain size        | yes               |
//! | 5  | `degree-size`   | degree / domain size          | yes               |
//! | 6  | `clique`        | C* first, then afc / size     | yes               |
//! | 7  | `afc-size`      | afc / domain size             | yes               |
//! | 8  | `clique-pinned` | C* fixed to 0..\|C*\|, afc / size | no            |
//! | 9  | `random`        | uniform                       | yes               |
//!
//! Merit ties are broken by a seeded random generator.

use crate::error::{ColoringError, Result};
use crate::search::Domain;
use std::fmt;
use std::str::FromStr;

/// Per-variable statistics a merit function may read
#[derive(Debug, Clone, Copy)]
pub struct VarView<'a> {
    /// Current domains
    pub domains: &'a [Domain],
    /// Accumulated failure count of each variable
    pub afc: &'a [f64],
    /// Number of times each variable's domain was reduced
    pub activity: &'a [f64],
    /// Number of propagators on each variable
    pub degree: &'a [usize],
}

impl VarView<'_> {
    /// Domain size of `x` as a float
    pub fn size(&self, x: usize) -> f64 {
        self.domains[x].size() as f64
    }
}

/// Variable merit; the unassigned variable with the largest merit is chosen
pub type VarMerit = fn(&VarView<'_>, usize) -> f64;

/// First value to try for a chosen variable
pub type ValueOrder = fn(&Domain) -> Option<usize>;

/// Everything the search needs to know about a policy
#[derive(Clone, Copy)]
pub struct Strategy {
    /// Variable merit
    pub merit: VarMerit,
    /// Value choice
    pub value: ValueOrder,
    /// Whether color symmetry is broken by value precedence
    pub symmetry_breaking: bool,
    /// Whether the vertices of C* are branched on before all others
    pub clique_priority: bool,
    /// Whether C* is fixed to the first colors before search
    pub pin_clique: bool,
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy")
            .field("symmetry_breaking", &self.symmetry_breaking)
            .field("clique_priority", &self.clique_priority)
            .field("pin_clique", &self.pin_clique)
            .finish_non_exhaustive()
    }
}

fn size_min(view: &VarView<'_>, x: usize) -> f64 {
    -view.size(x)
}

fn afc_max(view: &VarView<'_>, x: usize) -> f64 {
    view.afc[x]
}

fn activity_max(view: &VarView<'_>, x: usize) -> f64 {
    view.activity[x]
}

fn activity_size_max(view: &VarView<'_>, x: usize) -> f64 {
    view.activity[x] / view.size(x)
}

fn degree_size_max(view: &VarView<'_>, x: usize) -> f64 {
    view.degree[x] as f64 / view.size(x)
}

fn afc_size_max(view: &VarView<'_>, x: usize) -> f64 {
    view.afc[x] / view.size(x)
}

fn uniform(_: &VarView<'_>, _: usize) -> f64 {
    0.0
}

fn smallest_value(domain: &Domain) -> Option<usize> {
    domain.min()
}

const fn strategy(merit: VarMerit, symmetry_breaking: bool) -> Strategy {
    Strategy {
        merit,
        value: smallest_value,
        symmetry_breaking,
        clique_priority: false,
        pin_clique: false,
    }
}

const STRATEGIES: [Strategy; 10] = [
    strategy(size_min, false),
    strategy(size_min, true),
    strategy(afc_max, true),
    strategy(activity_max, true),
    strategy(activity_size_max, true),
    strategy(degree_size_max, true),
    Strategy {
        clique_priority: true,
        ..strategy(afc_size_max, true)
    },
    strategy(afc_size_max, true),
    Strategy {
        pin_clique: true,
        ..strategy(afc_size_max, false)
    },
    strategy(uniform, true),
];

/// Variable/value selection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BranchingPolicy {
    /// Smallest domain, no symmetry breaking
    SizeMin,
    /// Smallest domain with value precedence
    SizeMinSymmetric,
    /// Largest accumulated failure count
    AfcMax,
    /// Largest activity
    ActivityMax,
    /// Largest activity per remaining value
    ActivitySizeMax,
    /// Largest degree per remaining value
    DegreeSizeMax,
    /// The best clique first, then largest afc per remaining value
    CliqueMerit,
    /// Largest afc per remaining value
    #[default]
    AfcSizeMax,
    /// The best clique fixed to the first colors, then afc per remaining value
    CliquePinned,
    /// Uniformly random variable
    Random,
}

impl BranchingPolicy {
    /// All policies in id order
    pub const ALL: [BranchingPolicy; 10] = [
        BranchingPolicy::SizeMin,
        BranchingPolicy::SizeMinSymmetric,
        BranchingPolicy::AfcMax,
        BranchingPolicy::ActivityMax,
        BranchingPolicy::ActivitySizeMax,
        BranchingPolicy::DegreeSizeMax,
        BranchingPolicy::CliqueMerit,
        BranchingPolicy::AfcSizeMax,
        BranchingPolicy::CliquePinned,
        BranchingPolicy::Random,
    ];

    /// Numeric id used on the command line
    pub fn id(self) -> usize {
        self as usize
    }

    /// Looks a policy up by numeric id
    pub fn from_id(id: usize) -> Result<Self> {
        Self::ALL.get(id).copied().ok_or_else(|| {
            ColoringError::InvalidArgument(format!(
                "unknown branching id {id} (expected 0..{})",
                Self::ALL.len() - 1
            ))
        })
    }

    /// Short name used on the command line and in logs
    pub fn name(self) -> &'static str {
        match self {
            BranchingPolicy::SizeMin => "size",
            BranchingPolicy::SizeMinSymmetric => "size-sym",
            BranchingPolicy::AfcMax => "afc",
            BranchingPolicy::ActivityMax => "activity",
            BranchingPolicy::ActivitySizeMax => "activity-size",
            BranchingPolicy::DegreeSizeMax => "degree-size",
            BranchingPolicy::CliqueMerit => "clique",
            BranchingPolicy::AfcSizeMax => "afc-size",
            BranchingPolicy::CliquePinned => "clique-pinned",
            BranchingPolicy::Random => "random",
        }
    }

    /// The selection functions and flags of this policy
    pub fn strategy(self) -> Strategy {
        STRATEGIES[self.id()]
    }
}

impl fmt::Display for BranchingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BranchingPolicy {
    type Err = ColoringError;

    /// Accepts a policy name or its numeric id
    fn from_str(s: &str) -> Result<Self> {
        if let Ok(id) = s.parse::<usize>() {
            return Self::from_id(id);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|policy| policy.name() == s)
            .ok_or_else(|| {
                ColoringError::InvalidArgument(format!("unknown branching policy '{s}'"))
            })
    }
}
