//! Decision-variable identity.

use std::fmt;

/// Identity of one binary assignment variable.
///
/// Reads as "facility occupies location at step". The 3-tuple index is
/// the variable's identity everywhere in the crate; no string keys are
/// parsed anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VarId {
    /// Facility index.
    pub facility: usize,
    /// Location index.
    pub location: usize,
    /// Timestep index (0-based).
    pub step: usize,
}

impl VarId {
    /// Creates a variable identity.
    pub fn new(facility: usize, location: usize, step: usize) -> Self {
        Self {
            facility,
            location,
            step,
        }
    }
}

impl fmt::Display for VarId {
    /// Renders the legacy flat-key form, for diagnostics only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x_{}_{}_{}", self.facility, self.location, self.step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_id_identity() {
        let a = VarId::new(1, 2, 0);
        let b = VarId::new(1, 2, 0);
        let c = VarId::new(2, 1, 0);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display() {
        assert_eq!(VarId::new(3, 0, 2).to_string(), "x_3_0_2");
    }
}
