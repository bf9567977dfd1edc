//! Geometric restart schedule

/// Node cutoffs growing geometrically: `base`, `base * scale`, ...
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestartPolicy {
    /// Nodes explored before the first restart
    pub base: u64,
    /// Growth factor between consecutive cutoffs
    pub scale: f64,
}

impl RestartPolicy {
    /// Creates a geometric schedule
    pub fn geometric(base: u64, scale: f64) -> Self {
        Self { base, scale }
    }

    /// The successive cutoffs
    pub fn cutoffs(&self) -> Cutoffs {
        Cutoffs {
            next: self.base.max(1) as f64,
            scale: self.scale.max(1.0),
        }
    }
}

/// Iterator over the cutoffs of a [`RestartPolicy`]
#[derive(Debug, Clone)]
pub struct Cutoffs {
    next: f64,
    scale: f64,
}

impl Iterator for Cutoffs {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let cutoff = if self.next >= u64::MAX as f64 {
            u64::MAX
        } else {
            self.next.round() as u64
        };
        self.next *= self.scale;
        Some(cutoff)
    }
}
