//! Uniform distributed loads

use serde::{Deserialize, Serialize};

use crate::elements::ElementKind;
use crate::math::{self, Vec as FEVec};
use crate::mesh::Mesh;

/// A uniform line load over the full member length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributedLoad {
    /// Intensity (N/m), signed along +u or +v
    pub w: f64,
}

impl DistributedLoad {
    /// Create a uniform distributed load
    pub fn uniform(w: f64) -> Self {
        Self { w }
    }

    /// Combine with another uniform load
    pub fn combined(&self, other: &DistributedLoad) -> Self {
        Self::uniform(self.w + other.w)
    }

    /// Scatter consistent nodal loads of every element into `f`
    pub(crate) fn add_to(&self, f: &mut FEVec, mesh: &Mesh, kind: ElementKind) {
        let d = kind.dofs_per_node();
        for element in mesh.elements() {
            let fe = math::consistent_uniform_load(kind, self.w, element.length);
            for (local_node, &node) in element.nodes.iter().enumerate() {
                for k in 0..d {
                    f[node * d + k] += fe[local_node * d + k];
                }
            }
        }
    }
}
