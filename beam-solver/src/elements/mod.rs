//! Structural elements module

mod material;
mod section;
mod support;

use serde::{Deserialize, Serialize};

pub use material::Material;
pub use section::{Section, SectionShape};
pub use support::Support;

/// Physical element type, which fixes the DOF layout of a whole computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    /// Two-node axial bar, DOFs per node: [u]
    Bar,
    /// Two-node Euler-Bernoulli beam with cubic Hermite shape functions, DOFs per node: [v, theta]
    Beam,
}

impl ElementKind {
    /// Degrees of freedom per node (D)
    pub const fn dofs_per_node(&self) -> usize {
        match self {
            ElementKind::Bar => 1,
            ElementKind::Beam => 2,
        }
    }

    /// Degrees of freedom per element
    pub const fn dofs_per_element(&self) -> usize {
        2 * self.dofs_per_node()
    }

    /// Number of independent rigid-body modes of an unconstrained straight line of elements
    pub const fn rigid_body_modes(&self) -> usize {
        match self {
            ElementKind::Bar => 1,
            ElementKind::Beam => 2,
        }
    }

    /// Offset of the translational DOF within a node (u for bars, v for beams)
    pub const fn translation_dof(&self) -> usize {
        0
    }
}
