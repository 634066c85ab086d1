//! Support conditions

use serde::{Deserialize, Serialize};

use super::ElementKind;

/// Support conditions at a node of a 1-D model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Support {
    /// Restrained in axial translation
    pub u: bool,
    /// Restrained in transverse translation (deflection)
    pub v: bool,
    /// Restrained in rotation
    pub theta: bool,
}

impl Support {
    /// Create a fully fixed (clamped) support
    pub const fn fixed() -> Self {
        Self {
            u: true,
            v: true,
            theta: true,
        }
    }

    /// Create a pinned support (translations restrained, rotation free)
    pub const fn pinned() -> Self {
        Self {
            u: true,
            v: true,
            theta: false,
        }
    }

    /// Create a guided (sliding) support: rotation restrained, deflection free
    pub const fn guided() -> Self {
        Self {
            u: false,
            v: false,
            theta: true,
        }
    }

    /// Restraint flags in the DOF order of the given element kind
    pub fn restraints(&self, kind: ElementKind) -> &'static [bool] {
        match kind {
            ElementKind::Bar => {
                if self.u {
                    &[true]
                } else {
                    &[false]
                }
            }
            ElementKind::Beam => match (self.v, self.theta) {
                (true, true) => &[true, true],
                (true, false) => &[true, false],
                (false, true) => &[false, true],
                (false, false) => &[false, false],
            },
        }
    }

    /// Check if any DOF of the element kind is restrained
    pub fn is_supported(&self, kind: ElementKind) -> bool {
        self.num_restrained(kind) > 0
    }

    /// Count restrained DOFs for the element kind
    pub fn num_restrained(&self, kind: ElementKind) -> usize {
        self.restraints(kind).iter().filter(|&&r| r).count()
    }
}
