//! Concentrated loads at nodes

use serde::{Deserialize, Serialize};

use crate::elements::ElementKind;
use crate::error::{FemError, FemResult};
use crate::math::Vec as FEVec;
use crate::mesh::Mesh;

/// A concentrated load acting on one DOF of a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeLoad {
    /// Node index
    pub node: usize,
    /// DOF offset within the node (0 = translation, 1 = rotation for beams)
    pub dof: usize,
    /// Signed magnitude (N or N·m)
    pub magnitude: f64,
}

impl NodeLoad {
    /// Create a new node load
    pub fn new(node: usize, dof: usize, magnitude: f64) -> Self {
        Self {
            node,
            dof,
            magnitude,
        }
    }

    /// Force on the translational DOF
    pub fn force(node: usize, magnitude: f64) -> Self {
        Self::new(node, 0, magnitude)
    }

    /// Moment on the rotational DOF (beams only)
    pub fn moment(node: usize, magnitude: f64) -> Self {
        Self::new(node, 1, magnitude)
    }

    /// Global DOF index this load acts on
    pub fn global_dof(&self, mesh: &Mesh, kind: ElementKind) -> FemResult<usize> {
        let d = kind.dofs_per_node();
        if self.node >= mesh.node_count() {
            return Err(FemError::InvalidInput(format!(
                "load node {} outside mesh of {} nodes",
                self.node,
                mesh.node_count()
            )));
        }
        if self.dof >= d {
            return Err(FemError::InvalidInput(format!(
                "load DOF {} not available on {:?} elements",
                self.dof, kind
            )));
        }
        Ok(self.node * d + self.dof)
    }

    pub(crate) fn add_to(&self, f: &mut FEVec, mesh: &Mesh, kind: ElementKind) -> FemResult<()> {
        let dof = self.global_dof(mesh, kind)?;
        f[dof] += self.magnitude;
        Ok(())
    }
}
